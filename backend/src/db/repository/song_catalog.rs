//! Song catalog repository trait.
//!
//! The catalog owns song metadata. The analysis core only ever reads from it;
//! writes exist so the HTTP layer and tests can populate it.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewSong, Song, SongId};

/// Repository trait for song metadata.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SongCatalog: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Songs ====================

    /// Insert a song and return it with its assigned id.
    async fn store_song(&self, song: &NewSong) -> RepositoryResult<Song>;

    /// Resolve a single song.
    ///
    /// # Returns
    /// * `Ok(Song)` - The catalog entry
    /// * `Err(RepositoryError::NotFound)` - If no song has this id
    async fn resolve(&self, song_id: SongId) -> RepositoryResult<Song>;

    /// Resolve a batch of ids in one round trip.
    ///
    /// Unknown ids are skipped rather than reported; callers compare lengths
    /// when they care. Output order is unspecified.
    async fn resolve_many(&self, song_ids: &[SongId]) -> RepositoryResult<Vec<Song>>;

    /// All songs, ordered by id.
    async fn list_songs(&self) -> RepositoryResult<Vec<Song>>;
}
