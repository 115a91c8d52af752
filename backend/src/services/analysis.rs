//! Liked-song analysis.
//!
//! The first half of this module is the pure core: functions over a slice of
//! [`LikedSong`] that filter, rank or bucket a user's likes. They never fail
//! and never touch storage. The second half loads a user's likes through a
//! [`FullRepository`], resolves them against the catalog and runs the core.
//!
//! Orderings are total so repeated calls on the same input agree:
//! - date and genre filters: release date ascending, then song id
//! - latest: like timestamp descending, then song id
//! - top: popularity descending, then song id

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{day_key, DateRange, LikeCounts, LikedSong, Song, SongId, UserId};

/// Default length of the latest / top lists.
pub const DEFAULT_LIMIT: usize = 5;

fn release_order(a: &Song, b: &Song) -> Ordering {
    a.release_date
        .cmp(&b.release_date)
        .then_with(|| a.id.cmp(&b.id))
}

fn sorted_by_release(mut songs: Vec<Song>) -> Vec<Song> {
    songs.sort_by(release_order);
    songs
}

/// Liked songs released within `range`, bounds included.
pub fn by_release_date(liked: &[LikedSong], range: &DateRange) -> Vec<Song> {
    sorted_by_release(
        liked
            .iter()
            .filter(|l| range.contains(l.song.release_date))
            .map(|l| l.song.clone())
            .collect(),
    )
}

/// Liked songs whose genre equals `genre` exactly (case-sensitive).
pub fn by_genre(liked: &[LikedSong], genre: &str) -> Vec<Song> {
    sorted_by_release(
        liked
            .iter()
            .filter(|l| l.song.genre == genre)
            .map(|l| l.song.clone())
            .collect(),
    )
}

/// The `n` most recently liked songs, newest first.
pub fn latest_liked(liked: &[LikedSong], n: usize) -> Vec<Song> {
    let mut ordered: Vec<&LikedSong> = liked.iter().collect();
    ordered.sort_by(|a, b| {
        b.liked_at
            .cmp(&a.liked_at)
            .then_with(|| a.song.id.cmp(&b.song.id))
    });
    ordered.into_iter().take(n).map(|l| l.song.clone()).collect()
}

/// The `n` liked songs with the highest popularity, highest first.
pub fn top_liked(liked: &[LikedSong], n: usize) -> Vec<Song> {
    let mut ordered: Vec<&Song> = liked.iter().map(|l| &l.song).collect();
    ordered.sort_by(|a, b| {
        b.popularity
            .total_cmp(&a.popularity)
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered.into_iter().take(n).cloned().collect()
}

/// Number of likes per UTC calendar day, keyed `YYYY-MM-DD`.
pub fn daily_like_counts(liked: &[LikedSong]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for l in liked {
        *counts.entry(day_key(l.liked_at)).or_insert(0) += 1;
    }
    counts
}

/// Totals over every like.
pub fn like_counts(liked: &[LikedSong]) -> LikeCounts {
    count_likes(liked.iter())
}

/// Totals over likes recorded on or after `since` (UTC day).
pub fn like_counts_since(liked: &[LikedSong], since: NaiveDate) -> LikeCounts {
    count_likes(liked.iter().filter(|l| l.liked_at.date_naive() >= since))
}

fn count_likes<'a>(liked: impl Iterator<Item = &'a LikedSong>) -> LikeCounts {
    let mut genres = HashSet::new();
    let mut artists = HashSet::new();
    let mut total = 0;
    for l in liked {
        total += 1;
        genres.insert(l.song.genre.as_str());
        artists.insert(l.song.artist.as_str());
    }
    LikeCounts {
        liked_songs: total,
        distinct_genres: genres.len(),
        distinct_artists: artists.len(),
    }
}

// =============================================================================
// Repository-backed entry points
// =============================================================================

/// Load a user's likes and resolve them against the catalog.
///
/// Likes pointing at songs the catalog no longer knows are dropped with a
/// warning. Storage errors propagate unchanged.
pub async fn load_liked_songs<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
) -> RepositoryResult<Vec<LikedSong>> {
    let likes = repo.find_by_user(user_id).await?;
    if likes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<SongId> = likes.iter().map(|l| l.song_id).collect();
    let mut songs: HashMap<SongId, Song> = repo
        .resolve_many(&ids)
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();

    let mut liked = Vec::with_capacity(likes.len());
    for like in likes {
        match songs.remove(&like.song_id) {
            Some(song) => liked.push(LikedSong::new(song, like.liked_at)),
            None => warn!(
                "User {} likes song {} which is missing from the catalog; skipping",
                user_id, like.song_id
            ),
        }
    }
    debug!("Loaded {} liked songs for user {}", liked.len(), user_id);
    Ok(liked)
}

pub async fn songs_by_release_date<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    range: &DateRange,
) -> RepositoryResult<Vec<Song>> {
    if range.is_reversed() {
        debug!(
            "Reversed date range {}..{} for user {}; result is empty",
            range.start, range.end, user_id
        );
    }
    let liked = load_liked_songs(repo, user_id).await?;
    Ok(by_release_date(&liked, range))
}

pub async fn songs_by_genre<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    genre: &str,
) -> RepositoryResult<Vec<Song>> {
    let liked = load_liked_songs(repo, user_id).await?;
    Ok(by_genre(&liked, genre))
}

pub async fn latest_liked_songs<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    n: usize,
) -> RepositoryResult<Vec<Song>> {
    let liked = load_liked_songs(repo, user_id).await?;
    Ok(latest_liked(&liked, n))
}

pub async fn top_liked_songs<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    n: usize,
) -> RepositoryResult<Vec<Song>> {
    let liked = load_liked_songs(repo, user_id).await?;
    Ok(top_liked(&liked, n))
}

pub async fn daily_likes<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
) -> RepositoryResult<BTreeMap<String, u64>> {
    let liked = load_liked_songs(repo, user_id).await?;
    Ok(daily_like_counts(&liked))
}

pub async fn user_like_counts<R: FullRepository + ?Sized>(
    repo: &R,
    user_id: &UserId,
    since: Option<NaiveDate>,
) -> RepositoryResult<LikeCounts> {
    let liked = load_liked_songs(repo, user_id).await?;
    Ok(match since {
        Some(date) => like_counts_since(&liked, date),
        None => like_counts(&liked),
    })
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod analysis_tests;
