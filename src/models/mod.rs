pub mod music;
pub mod pagination;
pub mod playlist;
pub mod user;

pub use music::{CreateMusicRequest, Music, UpdateMusicRequest};
pub use pagination::Pagination;
pub use playlist::{CreatePlaylistRequest, Playlist, PlaylistDetail, UpdatePlaylistRequest};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserInfo};

/// Treat a blank string the same as a field that was never sent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
