use super::non_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Music {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub link: Option<String>,
    pub added_by: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMusicRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub artist: String,
    #[validate(url)]
    pub link: Option<String>,
    pub added_by: i64,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct UpdateMusicRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub artist: Option<String>,
    #[validate(url)]
    pub link: Option<String>,
}

impl UpdateMusicRequest {
    /// An explicit empty `link` removes the stored link.
    pub fn clears_link(&self) -> bool {
        matches!(self.link.as_deref(), Some(link) if link.trim().is_empty())
    }

    pub fn normalized(self) -> Self {
        Self {
            title: non_blank(self.title),
            artist: non_blank(self.artist),
            link: non_blank(self.link),
        }
    }
}
