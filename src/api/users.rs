use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::AppState;
use crate::error::Result;
use crate::models::{CreateUserRequest, Music, Pagination, PlaylistDetail, UpdateUserRequest, UserInfo};
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).patch(update_user).delete(delete_user))
        .route("/users/:id/musics", get(user_musics))
        .route("/users/:id/playlists", get(user_playlists))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<UserInfo>>> {
    page.validate()?;

    let users = state.user_service.list(page).await?;
    Ok(Json(users.into_iter().map(UserInfo::from).collect()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<UserInfo>> {
    req.validate()?;

    let user = state.user_service.create(req).await?;
    Ok(Json(user.into()))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserInfo>> {
    let user = state.user_service.get(id).await?;
    Ok(Json(user.into()))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserInfo>> {
    let req = req.normalized();
    req.validate()?;

    let user = state.user_service.update(id, req).await?;
    Ok(Json(user.into()))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserInfo>> {
    let user = state.user_service.delete(id).await?;
    Ok(Json(user.into()))
}

async fn user_musics(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<Music>>> {
    let musics = state.music_service.list_by_user(id).await?;
    Ok(Json(musics))
}

/// Includes private playlists; visibility is only applied to the shared listing.
async fn user_playlists(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<PlaylistDetail>>> {
    let playlists = state.playlist_service.list_by_owner(id).await?;
    Ok(Json(playlists))
}
