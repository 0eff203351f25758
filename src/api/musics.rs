use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::AppState;
use crate::error::Result;
use crate::models::{CreateMusicRequest, Music, Pagination, UpdateMusicRequest};
use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

pub fn music_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/musics", get(list_musics).post(create_music))
        .route("/musics/:id", get(get_music).patch(update_music).delete(delete_music))
}

async fn list_musics(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Music>>> {
    page.validate()?;

    let musics = state.music_service.list(page).await?;
    Ok(Json(musics))
}

async fn create_music(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateMusicRequest>,
) -> Result<Json<Music>> {
    req.validate()?;

    let music = state.music_service.create(req).await?;
    Ok(Json(music))
}

async fn get_music(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Music>> {
    let music = state.music_service.get(id).await?;
    Ok(Json(music))
}

async fn update_music(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateMusicRequest>,
) -> Result<Json<Music>> {
    req.clone().normalized().validate()?;

    let music = state.music_service.update(id, req).await?;
    Ok(Json(music))
}

async fn delete_music(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Music>> {
    let music = state.music_service.delete(id).await?;
    Ok(Json(music))
}
