use crate::error::{AppError, Result};
use crate::models::{CreateMusicRequest, Music, Pagination, UpdateMusicRequest};
use crate::services::users::user_exists;
use sqlx::SqlitePool;

const MUSIC_COLUMNS: &str = "id, title, artist, link, added_by";

pub struct MusicService {
    db: SqlitePool,
}

impl MusicService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateMusicRequest) -> Result<Music> {
        user_exists(&self.db, req.added_by).await?;

        let music = sqlx::query_as::<_, Music>(&format!(
            "INSERT INTO musics (title, artist, link, added_by) VALUES (?, ?, ?, ?) RETURNING {}",
            MUSIC_COLUMNS
        ))
        .bind(&req.title)
        .bind(&req.artist)
        .bind(&req.link)
        .bind(req.added_by)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            music_id = music.id,
            added_by = music.added_by,
            "Added music '{}' by {}",
            music.title,
            music.artist
        );
        Ok(music)
    }

    pub async fn get(&self, id: i64) -> Result<Music> {
        sqlx::query_as::<_, Music>(&format!("SELECT {} FROM musics WHERE id = ?", MUSIC_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Music"))
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<Music>> {
        let musics = sqlx::query_as::<_, Music>(&format!(
            "SELECT {} FROM musics ORDER BY id LIMIT ? OFFSET ?",
            MUSIC_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.skip())
        .fetch_all(&self.db)
        .await?;

        Ok(musics)
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Music>> {
        user_exists(&self.db, user_id).await?;

        let musics = sqlx::query_as::<_, Music>(&format!(
            "SELECT {} FROM musics WHERE added_by = ? ORDER BY id",
            MUSIC_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(musics)
    }

    pub async fn update(&self, id: i64, req: UpdateMusicRequest) -> Result<Music> {
        let mut music = self.get(id).await?;
        let clear_link = req.clears_link();
        let req = req.normalized();

        if req.title.is_none() && req.artist.is_none() && req.link.is_none() && !clear_link {
            return Ok(music);
        }
        if let Some(title) = req.title {
            music.title = title;
        }
        if let Some(artist) = req.artist {
            music.artist = artist;
        }
        if let Some(link) = req.link {
            music.link = Some(link);
        } else if clear_link {
            music.link = None;
        }

        let music = sqlx::query_as::<_, Music>(&format!(
            "UPDATE musics SET title = ?, artist = ?, link = ? WHERE id = ? RETURNING {}",
            MUSIC_COLUMNS
        ))
        .bind(&music.title)
        .bind(&music.artist)
        .bind(&music.link)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!(music_id = id, "Updated music");
        Ok(music)
    }

    /// Delete a track; it disappears from every playlist that contained it.
    pub async fn delete(&self, id: i64) -> Result<Music> {
        let music = self.get(id).await?;

        sqlx::query("DELETE FROM musics WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!(music_id = id, "Deleted music '{}'", music.title);
        Ok(music)
    }
}
