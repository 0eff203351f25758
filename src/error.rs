use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AlreadyExists(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

// SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE
const SQLITE_DUPLICATE_CODES: [&str; 2] = ["1555", "2067"];

/// True when the error is a UNIQUE or composite PRIMARY KEY constraint failure.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || db_err
                    .code()
                    .is_some_and(|code| SQLITE_DUPLICATE_CODES.contains(&code.as_ref()))
                || db_err.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_pool, PUBLIC_SEED_PLAYLIST_ID, SEED_MUSIC_IN_PLAYLIST_ID};

    #[tokio::test]
    async fn test_duplicate_playlist_entry_is_unique_violation() {
        let pool = seeded_pool().await;

        let err = sqlx::query("INSERT INTO playlist_music (playlist_id, music_id) VALUES (?, ?)")
            .bind(PUBLIC_SEED_PLAYLIST_ID)
            .bind(SEED_MUSIC_IN_PLAYLIST_ID)
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let pool = seeded_pool().await;

        let err = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind("seed_user")
            .bind("fresh@email.com")
            .bind("hash")
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));

        let other = sqlx::query("INSERT INTO musics (title, artist, added_by) VALUES (?, ?, ?)")
            .bind("Orphan")
            .bind("Nobody")
            .bind(404_i64)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(!is_unique_violation(&other));
    }

    #[test]
    fn test_not_found_message() {
        assert!(matches!(
            AppError::not_found("Playlist"),
            AppError::NotFound(ref m) if m == "Playlist not found"
        ));
    }
}
