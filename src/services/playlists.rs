use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{
    CreatePlaylistRequest, Music, Pagination, Playlist, PlaylistDetail, UpdatePlaylistRequest,
};
use crate::services::users::user_exists;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PLAYLIST_COLUMNS: &str = "id, name, private, owner_id";
const MUSIC_ID_CHUNK: usize = 500;

pub struct PlaylistService {
    db: SqlitePool,
}

impl PlaylistService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a playlist and its initial track list in one transaction.
    pub async fn create(&self, req: CreatePlaylistRequest) -> Result<PlaylistDetail> {
        user_exists(&self.db, req.owner_id).await?;

        let mut music_ids = req.music_ids;
        music_ids.sort_unstable();
        music_ids.dedup();
        self.ensure_musics_exist(&music_ids).await?;

        let mut tx = self.db.begin().await?;

        let playlist = sqlx::query_as::<_, Playlist>(&format!(
            "INSERT INTO playlists (name, private, owner_id) VALUES (?, ?, ?) RETURNING {}",
            PLAYLIST_COLUMNS
        ))
        .bind(&req.name)
        .bind(req.private)
        .bind(req.owner_id)
        .fetch_one(&mut *tx)
        .await?;

        for music_id in &music_ids {
            sqlx::query("INSERT INTO playlist_music (playlist_id, music_id) VALUES (?, ?)")
                .bind(playlist.id)
                .bind(music_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            playlist_id = playlist.id,
            owner_id = playlist.owner_id,
            private = playlist.private,
            "Created playlist '{}' with {} tracks",
            playlist.name,
            music_ids.len()
        );

        self.with_musics(playlist).await
    }

    pub async fn get(&self, id: i64) -> Result<PlaylistDetail> {
        let playlist = self.get_row(id).await?;
        self.with_musics(playlist).await
    }

    /// Shared listing: private playlists are left out.
    pub async fn list_public(&self, page: Pagination) -> Result<Vec<PlaylistDetail>> {
        let playlists = sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {} FROM playlists WHERE private = 0 ORDER BY id LIMIT ? OFFSET ?",
            PLAYLIST_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.skip())
        .fetch_all(&self.db)
        .await?;

        self.all_with_musics(playlists).await
    }

    /// Every playlist owned by `owner_id`, private ones included.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<PlaylistDetail>> {
        user_exists(&self.db, owner_id).await?;

        let playlists = sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {} FROM playlists WHERE owner_id = ? ORDER BY id",
            PLAYLIST_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        self.all_with_musics(playlists).await
    }

    pub async fn update(&self, id: i64, req: UpdatePlaylistRequest) -> Result<PlaylistDetail> {
        let mut playlist = self.get_row(id).await?;
        let req = req.normalized();

        if req.name.is_none() && req.private.is_none() {
            return self.with_musics(playlist).await;
        }
        if let Some(name) = req.name {
            playlist.name = name;
        }
        if let Some(private) = req.private {
            playlist.private = private;
        }

        let playlist = sqlx::query_as::<_, Playlist>(&format!(
            "UPDATE playlists SET name = ?, private = ? WHERE id = ? RETURNING {}",
            PLAYLIST_COLUMNS
        ))
        .bind(&playlist.name)
        .bind(playlist.private)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!(playlist_id = id, private = playlist.private, "Updated playlist");
        self.with_musics(playlist).await
    }

    pub async fn delete(&self, id: i64) -> Result<PlaylistDetail> {
        let detail = self.get(id).await?;

        sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!(playlist_id = id, "Deleted playlist '{}'", detail.playlist.name);
        Ok(detail)
    }

    pub async fn add_music(&self, playlist_id: i64, music_id: i64) -> Result<PlaylistDetail> {
        let playlist = self.get_row(playlist_id).await?;
        self.ensure_musics_exist(&[music_id]).await?;

        let already: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM playlist_music WHERE playlist_id = ? AND music_id = ?",
        )
        .bind(playlist_id)
        .bind(music_id)
        .fetch_one(&self.db)
        .await?;

        if already > 0 {
            return Err(already_in_playlist());
        }

        sqlx::query("INSERT INTO playlist_music (playlist_id, music_id) VALUES (?, ?)")
            .bind(playlist_id)
            .bind(music_id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    already_in_playlist()
                } else {
                    AppError::Database(e)
                }
            })?;

        tracing::debug!(playlist_id, music_id, "Added music to playlist");
        self.with_musics(playlist).await
    }

    pub async fn remove_music(&self, playlist_id: i64, music_id: i64) -> Result<PlaylistDetail> {
        let playlist = self.get_row(playlist_id).await?;

        let result = sqlx::query("DELETE FROM playlist_music WHERE playlist_id = ? AND music_id = ?")
            .bind(playlist_id)
            .bind(music_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Music not in playlist".to_string()));
        }

        tracing::debug!(playlist_id, music_id, "Removed music from playlist");
        self.with_musics(playlist).await
    }

    async fn get_row(&self, id: i64) -> Result<Playlist> {
        sqlx::query_as::<_, Playlist>(&format!(
            "SELECT {} FROM playlists WHERE id = ?",
            PLAYLIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Playlist"))
    }

    async fn with_musics(&self, playlist: Playlist) -> Result<PlaylistDetail> {
        let musics = sqlx::query_as::<_, Music>(
            r#"
            SELECT m.id, m.title, m.artist, m.link, m.added_by
            FROM musics m
            JOIN playlist_music pm ON pm.music_id = m.id
            WHERE pm.playlist_id = ?
            ORDER BY m.id
            "#,
        )
        .bind(playlist.id)
        .fetch_all(&self.db)
        .await?;

        Ok(PlaylistDetail { playlist, musics })
    }

    async fn all_with_musics(&self, playlists: Vec<Playlist>) -> Result<Vec<PlaylistDetail>> {
        let mut details = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            details.push(self.with_musics(playlist).await?);
        }
        Ok(details)
    }

    /// `ids` must be free of duplicates. Checked in chunks to stay under
    /// SQLite's bound-parameter limit.
    async fn ensure_musics_exist(&self, ids: &[i64]) -> Result<()> {
        for chunk in ids.chunks(MUSIC_ID_CHUNK) {
            let mut qb: QueryBuilder<Sqlite> =
                QueryBuilder::new("SELECT COUNT(*) FROM musics WHERE id IN (");
            let mut separated = qb.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            let (found,): (i64,) = qb.build_query_as().fetch_one(&self.db).await?;
            if found as usize != chunk.len() {
                return Err(AppError::not_found("Music"));
            }
        }
        Ok(())
    }
}

fn already_in_playlist() -> AppError {
    AppError::AlreadyExists("Music already in playlist".to_string())
}
