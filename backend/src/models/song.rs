//! Song catalog and like records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::define_id_type;

define_id_type!(i64, SongId);

/// User identifier as issued by the account service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        UserId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        UserId(value)
    }
}

/// Catalog entry for a song. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Free-form category; compared case-sensitively.
    pub genre: String,
    pub release_date: NaiveDate,
    /// Ranking attribute used by top-N queries.
    pub popularity: f64,
}

/// Song payload before the catalog assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub popularity: f64,
}

impl NewSong {
    pub fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            title: self.title,
            artist: self.artist,
            genre: self.genre,
            release_date: self.release_date,
            popularity: self.popularity,
        }
    }
}

/// A user's like on a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSongLike {
    pub user_id: UserId,
    pub song_id: SongId,
    pub liked_at: DateTime<Utc>,
}

/// A like resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedSong {
    pub song: Song,
    pub liked_at: DateTime<Utc>,
}

impl LikedSong {
    pub fn new(song: Song, liked_at: DateTime<Utc>) -> Self {
        Self { song, liked_at }
    }
}

/// Summary counters over a set of likes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCounts {
    pub liked_songs: usize,
    pub distinct_genres: usize,
    pub distinct_artists: usize,
}
