pub mod musics;
pub mod password;
pub mod playlists;
pub mod users;

pub use musics::MusicService;
pub use playlists::PlaylistService;
pub use users::UserService;
