//! High-level database service layer.
//!
//! Repository-agnostic operations on the catalog and on like records. The
//! HTTP handlers call these rather than the repository traits so that the
//! existence checks and logging stay in one place regardless of backend.
//!
//! # Usage
//!
//! ```no_run
//! use weezart_analysis::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let songs = services::list_songs(&repo).await?;
//!     println!("Found {} songs", songs.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::models::{NewSong, Song, SongId, UserId, UserSongLike};

// ==================== Health & Connection ====================

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Catalog ====================

/// Validate and store a song.
///
/// Title, artist and genre must be non-blank and popularity must be finite.
pub async fn store_song<R: FullRepository + ?Sized>(
    repo: &R,
    song: &NewSong,
) -> RepositoryResult<Song> {
    validate_new_song(song)?;
    let stored = repo.store_song(song).await?;
    info!(
        "Stored song {} '{}' by {} ({})",
        stored.id, stored.title, stored.artist, stored.genre
    );
    Ok(stored)
}

pub async fn get_song<R: FullRepository + ?Sized>(
    repo: &R,
    song_id: SongId,
) -> RepositoryResult<Song> {
    repo.resolve(song_id).await
}

pub async fn list_songs<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Song>> {
    repo.list_songs().await
}

fn validate_new_song(song: &NewSong) -> RepositoryResult<()> {
    let blank = [
        ("title", &song.title),
        ("artist", &song.artist),
        ("genre", &song.genre),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    if let Some((field, _)) = blank {
        return Err(RepositoryError::validation_with_context(
            format!("Song {} must not be empty", field),
            ErrorContext::new("store_song").with_entity("song"),
        ));
    }
    if !song.popularity.is_finite() {
        return Err(RepositoryError::validation_with_context(
            "Song popularity must be a finite number",
            ErrorContext::new("store_song").with_entity("song"),
        ));
    }
    Ok(())
}

// ==================== Likes ====================

/// Record that `user_id` likes `song_id`.
///
/// The song must exist in the catalog. `liked_at` defaults to now.
pub async fn like_song<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    song_id: SongId,
    liked_at: Option<DateTime<Utc>>,
) -> RepositoryResult<UserSongLike> {
    validate_user_id(user_id, "like_song")?;
    repo.resolve(song_id)
        .await
        .map_err(|e| e.with_operation("like_song"))?;

    let like = repo
        .like_song(user_id, song_id, liked_at.unwrap_or_else(Utc::now))
        .await?;
    debug!("User {} liked song {} at {}", user_id, song_id, like.liked_at);
    Ok(like)
}

/// Remove a like. Missing likes are reported as `NotFound`.
pub async fn unlike_song<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    song_id: SongId,
) -> RepositoryResult<()> {
    if repo.unlike_song(user_id, song_id).await? {
        debug!("User {} unliked song {}", user_id, song_id);
        Ok(())
    } else {
        Err(RepositoryError::like_not_found(user_id, song_id, "unlike_song"))
    }
}

/// A user's likes, most recent first.
pub async fn list_likes<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
) -> RepositoryResult<Vec<UserSongLike>> {
    let mut likes = repo.find_by_user(user_id).await?;
    likes.sort_by(|a, b| {
        b.liked_at
            .cmp(&a.liked_at)
            .then_with(|| a.song_id.cmp(&b.song_id))
    });
    Ok(likes)
}

fn validate_user_id(user_id: &UserId, operation: &str) -> RepositoryResult<()> {
    if user_id.as_str().trim().is_empty() {
        return Err(RepositoryError::validation_with_context(
            "User id must not be empty",
            ErrorContext::new(operation).with_entity("user"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use chrono::{NaiveDate, TimeZone};

    fn new_song(title: &str) -> NewSong {
        NewSong {
            title: title.to_string(),
            artist: "Artist".to_string(),
            genre: "Rock".to_string(),
            release_date: NaiveDate::from_ymd_opt(2019, 6, 1).unwrap(),
            popularity: 12.5,
        }
    }

    #[tokio::test]
    async fn test_store_song_rejects_blank_fields() {
        let repo = LocalRepository::new();
        let mut song = new_song("A");
        song.genre = "  ".to_string();

        let err = store_song(&repo, &song).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert!(err.to_string().contains("genre"));
    }

    #[tokio::test]
    async fn test_store_song_rejects_nan_popularity() {
        let repo = LocalRepository::new();
        let mut song = new_song("A");
        song.popularity = f64::NAN;
        assert!(store_song(&repo, &song).await.is_err());
    }

    #[tokio::test]
    async fn test_like_unknown_song_is_not_found() {
        let repo = LocalRepository::new();
        let err = like_song(&repo, &UserId::from("u1"), SongId(5), None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().operation.as_deref(), Some("like_song"));
    }

    #[tokio::test]
    async fn test_like_song_rejects_blank_user() {
        let repo = LocalRepository::new();
        let song = store_song(&repo, &new_song("A")).await.unwrap();
        let err = like_song(&repo, &UserId::from(" "), song.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_list_likes_most_recent_first() {
        let repo = LocalRepository::new();
        let user = UserId::from("u1");
        let a = store_song(&repo, &new_song("A")).await.unwrap();
        let b = store_song(&repo, &new_song("B")).await.unwrap();

        let early = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        like_song(&repo, &user, a.id, Some(early)).await.unwrap();
        like_song(&repo, &user, b.id, Some(late)).await.unwrap();

        let likes = list_likes(&repo, &user).await.unwrap();
        let ids: Vec<SongId> = likes.iter().map(|l| l.song_id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_unlike_missing_like_is_not_found() {
        let repo = LocalRepository::new();
        let err = unlike_song(&repo, &UserId::from("u1"), SongId(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
