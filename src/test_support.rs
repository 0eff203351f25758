//! Fixtures for tests: every call builds a fresh in-memory database, applies the
//! migrations and seeds a small known data set.

use crate::api::{self, AppState};
use crate::db;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub const SEED_USER_ID: i64 = 1;
pub const SEED_MUSIC_IN_PLAYLIST_ID: i64 = 1;
pub const SEED_MUSIC_LEFT_OUT_ID: i64 = 2;
pub const PUBLIC_SEED_PLAYLIST_ID: i64 = 1;
pub const PRIVATE_SEED_PLAYLIST_ID: i64 = 2;

// Opaque; nothing verifies the seed user's password.
const SEED_PASSWORD_HASH: &str = "$2a$12$TDJFaiwRleVEBYnvd/CVbuGIjbu/zVhImLgXuGlQgDrV8a734kK.2";

pub async fn empty_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    db::migrate(&pool).await.expect("migrations");
    pool
}

pub async fn seeded_pool() -> SqlitePool {
    let pool = empty_pool().await;
    seed(&pool).await.expect("seed data");
    pool
}

/// One user owning two tracks and two playlists (one public, one private),
/// both playlists holding only the first track.
async fn seed(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO users (id, username, email, password) VALUES (?, ?, ?, ?)")
        .bind(SEED_USER_ID)
        .bind("seed_user")
        .bind("seed_user@email.com")
        .bind(SEED_PASSWORD_HASH)
        .execute(&mut *tx)
        .await?;

    let musics = [
        (
            SEED_MUSIC_IN_PLAYLIST_ID,
            "Seed Song",
            "Seed Artist",
            "https://example.com/seed",
        ),
        (
            SEED_MUSIC_LEFT_OUT_ID,
            "When Orange is the Sky",
            "Fabrizio Paterlini",
            "https://open.spotify.com/track/67u3IsSI1tmEsF7jZWPQWc?si=cbaf4b10c6de485c",
        ),
    ];
    for (id, title, artist, link) in musics {
        sqlx::query("INSERT INTO musics (id, title, artist, link, added_by) VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(title)
            .bind(artist)
            .bind(link)
            .bind(SEED_USER_ID)
            .execute(&mut *tx)
            .await?;
    }

    let playlists = [
        (PUBLIC_SEED_PLAYLIST_ID, "Seed Playlist 1", false),
        (PRIVATE_SEED_PLAYLIST_ID, "Seed Playlist 2", true),
    ];
    for (id, name, private) in playlists {
        sqlx::query("INSERT INTO playlists (id, name, private, owner_id) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(private)
            .bind(SEED_USER_ID)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO playlist_music (playlist_id, music_id) VALUES (?, ?)")
            .bind(id)
            .bind(SEED_MUSIC_IN_PLAYLIST_ID)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = seeded_pool().await;
    let app = api::router(Arc::new(AppState::new(pool.clone())));
    (app, pool)
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_each_pool_is_isolated() {
        let first = seeded_pool().await;
        sqlx::query("DELETE FROM users").execute(&first).await.unwrap();

        let second = seeded_pool().await;
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }

    #[tokio::test]
    async fn test_empty_pool_has_schema() {
        let pool = empty_pool().await;
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["musics", "playlist_music", "playlists", "users"]);
    }
}
