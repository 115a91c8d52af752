//! Like-relationship repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{SongId, UserId, UserSongLike};

/// Repository trait for `(user, song)` like records.
#[async_trait]
pub trait UserSongStore: Send + Sync {
    /// Every like recorded for `user_id`, in no particular order.
    ///
    /// A user with no likes yields `Ok(vec![])`, never `NotFound`.
    async fn find_by_user(&self, user_id: &UserId) -> RepositoryResult<Vec<UserSongLike>>;

    /// Record a like.
    ///
    /// Liking the same song twice keeps the first record and returns it
    /// unchanged.
    async fn like_song(
        &self,
        user_id: &UserId,
        song_id: SongId,
        liked_at: DateTime<Utc>,
    ) -> RepositoryResult<UserSongLike>;

    /// Remove a like.
    ///
    /// # Returns
    /// * `Ok(true)` if a record was deleted
    /// * `Ok(false)` if the pair had no like
    async fn unlike_song(&self, user_id: &UserId, song_id: SongId) -> RepositoryResult<bool>;
}
