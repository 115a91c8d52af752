//! Public API surface for the analysis backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::models::DateRange;
pub use crate::models::LikeCounts;
pub use crate::models::LikedSong;
pub use crate::models::NewSong;
pub use crate::models::Song;
pub use crate::models::SongId;
pub use crate::models::UserId;
pub use crate::models::UserSongLike;
pub use crate::routes::analysis::DailyLikeCounts;
pub use crate::routes::library::LikeList;
pub use crate::routes::library::SongList;

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
