use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{songs, user_song_likes};
use crate::models::{NewSong, Song, SongId, UserId, UserSongLike};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SongRow {
    pub song_id: i64,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub popularity: f64,
}

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Song {
            id: SongId(row.song_id),
            title: row.title,
            artist: row.artist,
            genre: row.genre,
            release_date: row.release_date,
            popularity: row.popularity,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = songs)]
pub struct NewSongRow {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub release_date: NaiveDate,
    pub popularity: f64,
}

impl From<&NewSong> for NewSongRow {
    fn from(song: &NewSong) -> Self {
        NewSongRow {
            title: song.title.clone(),
            artist: song.artist.clone(),
            genre: song.genre.clone(),
            release_date: song.release_date,
            popularity: song.popularity,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_song_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LikeRow {
    pub user_id: String,
    pub song_id: i64,
    pub liked_at: DateTime<Utc>,
}

impl From<LikeRow> for UserSongLike {
    fn from(row: LikeRow) -> Self {
        UserSongLike {
            user_id: UserId(row.user_id),
            song_id: SongId(row.song_id),
            liked_at: row.liked_at,
        }
    }
}
