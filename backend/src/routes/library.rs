use serde::{Deserialize, Serialize};

use crate::models::{Song, UserSongLike};

// =========================================================
// Catalog and like listings
// =========================================================

/// A list of songs with its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongList {
    pub songs: Vec<Song>,
    pub total: usize,
}

impl From<Vec<Song>> for SongList {
    fn from(songs: Vec<Song>) -> Self {
        let total = songs.len();
        Self { songs, total }
    }
}

/// A user's like records with their count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeList {
    pub likes: Vec<UserSongLike>,
    pub total: usize,
}

impl From<Vec<UserSongLike>> for LikeList {
    fn from(likes: Vec<UserSongLike>) -> Self {
        let total = likes.len();
        Self { likes, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SongId, UserId};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_song_list_counts_songs() {
        let song = Song {
            id: SongId::new(1),
            title: "Intro".to_string(),
            artist: "Ada".to_string(),
            genre: "Pop".to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 2, 2).unwrap(),
            popularity: 3.0,
        };
        let list = SongList::from(vec![song.clone(), song]);
        assert_eq!(list.total, 2);

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["songs"][0]["release_date"], "2020-02-02");
    }

    #[test]
    fn test_like_list_serializes_ids_as_plain_values() {
        let list = LikeList::from(vec![UserSongLike {
            user_id: UserId::from("u1"),
            song_id: SongId::new(9),
            liked_at: Utc.with_ymd_and_hms(2023, 1, 5, 9, 0, 0).unwrap(),
        }]);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["likes"][0]["user_id"], "u1");
        assert_eq!(json["likes"][0]["song_id"], 9);
        assert_eq!(json["total"], 1);
    }
}
