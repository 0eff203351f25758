use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::AppState;
use crate::error::Result;
use crate::models::{CreatePlaylistRequest, Pagination, PlaylistDetail, UpdatePlaylistRequest};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn playlist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route(
            "/playlists/:id",
            get(get_playlist).patch(update_playlist).delete(delete_playlist),
        )
        .route(
            "/playlists/:id/musics/:music_id",
            post(add_music).delete(remove_music),
        )
}

/// Public playlists only.
async fn list_playlists(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<PlaylistDetail>>> {
    page.validate()?;

    let playlists = state.playlist_service.list_public(page).await?;
    Ok(Json(playlists))
}

async fn create_playlist(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePlaylistRequest>,
) -> Result<Json<PlaylistDetail>> {
    req.validate()?;

    tracing::debug!(
        "Creating playlist '{}' with {} music ids",
        req.name,
        req.music_ids.len()
    );

    let playlist = state.playlist_service.create(req).await?;
    Ok(Json(playlist))
}

async fn get_playlist(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PlaylistDetail>> {
    let playlist = state.playlist_service.get(id).await?;
    Ok(Json(playlist))
}

async fn update_playlist(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdatePlaylistRequest>,
) -> Result<Json<PlaylistDetail>> {
    let req = req.normalized();
    req.validate()?;

    let playlist = state.playlist_service.update(id, req).await?;
    Ok(Json(playlist))
}

async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PlaylistDetail>> {
    let playlist = state.playlist_service.delete(id).await?;
    Ok(Json(playlist))
}

async fn add_music(
    State(state): State<Arc<AppState>>,
    ApiPath((id, music_id)): ApiPath<(i64, i64)>,
) -> Result<Json<PlaylistDetail>> {
    let playlist = state.playlist_service.add_music(id, music_id).await?;
    Ok(Json(playlist))
}

async fn remove_music(
    State(state): State<Arc<AppState>>,
    ApiPath((id, music_id)): ApiPath<(i64, i64)>,
) -> Result<Json<PlaylistDetail>> {
    let playlist = state.playlist_service.remove_music(id, music_id).await?;
    Ok(Json(playlist))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_shows_only_public() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/playlists", None).await;
        assert_eq!(status, StatusCode::OK);
        let playlists = body.as_array().unwrap();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0]["name"], "Seed Playlist 1");
        assert_eq!(playlists[0]["musics"][0]["title"], "Seed Song");
    }

    #[tokio::test]
    async fn test_create_playlist_defaults_to_public() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/playlists",
            Some(json!({ "name": "Focus", "owner_id": 1, "music_ids": [2] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);
        assert_eq!(body["private"], false);
        assert_eq!(body["musics"][0]["id"], 2);

        let (_, body) = send(&app, "GET", "/api/v1/playlists", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_playlist_errors() {
        let (app, _pool) = test_app().await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/playlists",
            Some(json!({ "name": "", "owner_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/playlists",
            Some(json!({ "name": "Ghost", "owner_id": 1, "music_ids": [1, 50] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Music not found");
    }

    #[tokio::test]
    async fn test_create_playlist_rejects_oversized_track_list() {
        let (app, _pool) = test_app().await;

        let music_ids: Vec<i64> = (1..=40_000).collect();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/playlists",
            Some(json!({ "name": "Everything", "owner_id": 1, "music_ids": music_ids })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("music_ids"));
    }

    #[tokio::test]
    async fn test_private_playlist_is_fetchable_by_id() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/playlists/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["private"], true);
        assert_eq!(body["owner_id"], 1);
    }

    #[tokio::test]
    async fn test_playlist_music_membership() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(&app, "POST", "/api/v1/playlists/1/musics/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["musics"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, "POST", "/api/v1/playlists/1/musics/2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Music already in playlist");

        let (status, body) = send(&app, "DELETE", "/api/v1/playlists/1/musics/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["musics"][0]["id"], 2);

        let (status, _) = send(&app, "DELETE", "/api/v1/playlists/9/musics/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_playlist() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(
            &app,
            "PATCH",
            "/api/v1/playlists/2",
            Some(json!({ "name": "Now Shared", "private": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Now Shared");
        assert_eq!(body["private"], false);

        let (status, _) = send(&app, "DELETE", "/api/v1/playlists/2", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/v1/playlists/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Playlist not found");
    }
}
