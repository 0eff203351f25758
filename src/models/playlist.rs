use super::{non_blank, Music};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub private: bool,
    pub owner_id: i64,
}

/// A playlist together with its tracks, ordered by music id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub musics: Vec<Music>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub private: bool,
    pub owner_id: i64,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub music_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlaylistRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub private: Option<bool>,
}

impl UpdatePlaylistRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            private: self.private,
        }
    }
}
