pub mod extract;
pub mod musics;
pub mod playlists;
pub mod users;

use crate::services::{MusicService, PlaylistService, UserService};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

pub use musics::music_routes;
pub use playlists::playlist_routes;
pub use users::user_routes;

pub struct AppState {
    pub user_service: Arc<UserService>,
    pub music_service: Arc<MusicService>,
    pub playlist_service: Arc<PlaylistService>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            user_service: Arc::new(UserService::new(db.clone())),
            music_service: Arc::new(MusicService::new(db.clone())),
            playlist_service: Arc::new(PlaylistService::new(db)),
        }
    }
}

/// All API routes, mounted under `/api/v1`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().nest(
        "/api/v1",
        Router::new()
            .merge(user_routes())
            .merge(music_routes())
            .merge(playlist_routes())
            .with_state(state),
    )
}
