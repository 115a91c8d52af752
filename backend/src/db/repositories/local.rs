//! In-memory local repository implementation.
//!
//! Songs and likes live in `HashMap`s behind a single `RwLock`. Used for unit
//! tests, integration tests and local development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SongCatalog, UserSongStore,
};
use crate::models::{NewSong, Song, SongId, UserId, UserSongLike};

/// In-memory local repository.
///
/// # Example
/// ```
/// use weezart_analysis::db::repositories::LocalRepository;
/// use weezart_analysis::db::repository::UserSongStore;
/// use weezart_analysis::models::UserId;
///
/// let repo = LocalRepository::new();
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let likes = rt.block_on(repo.find_by_user(&UserId::from("u1"))).unwrap();
/// assert!(likes.is_empty());
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    songs: HashMap<SongId, Song>,
    // Keyed by user, then song, so a pair can hold at most one like.
    likes: HashMap<UserId, HashMap<SongId, UserSongLike>>,
    next_song_id: SongId,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            songs: HashMap::new(),
            likes: HashMap::new(),
            next_song_id: SongId(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Insert a song with a caller-chosen id, replacing any existing entry.
    ///
    /// Keeps the id counter ahead of every seeded id.
    pub fn insert_song(&self, song: Song) {
        let mut data = self.data.write();
        if song.id >= data.next_song_id {
            data.next_song_id = SongId(song.id.0 + 1);
        }
        data.songs.insert(song.id, song);
    }

    /// Record a like without the catalog existence check.
    ///
    /// Lets tests model a like whose song was later removed from the catalog.
    pub fn insert_like(&self, like: UserSongLike) {
        let mut data = self.data.write();
        data.likes
            .entry(like.user_id.clone())
            .or_default()
            .insert(like.song_id, like);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn song_count(&self) -> usize {
        self.data.read().songs.len()
    }

    pub fn like_count(&self) -> usize {
        self.data.read().likes.values().map(HashMap::len).sum()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SongCatalog for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_song(&self, song: &NewSong) -> RepositoryResult<Song> {
        self.check_health("store_song")?;

        let mut data = self.data.write();
        let id = data.next_song_id;
        data.next_song_id = SongId(id.0 + 1);

        let stored = song.clone().into_song(id);
        data.songs.insert(id, stored.clone());
        Ok(stored)
    }

    async fn resolve(&self, song_id: SongId) -> RepositoryResult<Song> {
        self.check_health("resolve")?;

        self.data
            .read()
            .songs
            .get(&song_id)
            .cloned()
            .ok_or_else(|| RepositoryError::song_not_found(song_id, "resolve"))
    }

    async fn resolve_many(&self, song_ids: &[SongId]) -> RepositoryResult<Vec<Song>> {
        self.check_health("resolve_many")?;

        let data = self.data.read();
        Ok(song_ids
            .iter()
            .filter_map(|id| data.songs.get(id).cloned())
            .collect())
    }

    async fn list_songs(&self) -> RepositoryResult<Vec<Song>> {
        self.check_health("list_songs")?;

        let mut songs: Vec<Song> = self.data.read().songs.values().cloned().collect();
        songs.sort_by_key(|s| s.id);
        Ok(songs)
    }
}

#[async_trait]
impl UserSongStore for LocalRepository {
    async fn find_by_user(&self, user_id: &UserId) -> RepositoryResult<Vec<UserSongLike>> {
        self.check_health("find_by_user")?;

        Ok(self
            .data
            .read()
            .likes
            .get(user_id)
            .map(|likes| likes.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn like_song(
        &self,
        user_id: &UserId,
        song_id: SongId,
        liked_at: DateTime<Utc>,
    ) -> RepositoryResult<UserSongLike> {
        self.check_health("like_song")?;

        let mut data = self.data.write();
        let like = data
            .likes
            .entry(user_id.clone())
            .or_default()
            .entry(song_id)
            .or_insert_with(|| UserSongLike {
                user_id: user_id.clone(),
                song_id,
                liked_at,
            });
        Ok(like.clone())
    }

    async fn unlike_song(&self, user_id: &UserId, song_id: SongId) -> RepositoryResult<bool> {
        self.check_health("unlike_song")?;

        let mut data = self.data.write();
        let removed = match data.likes.get_mut(user_id) {
            Some(likes) => likes.remove(&song_id).is_some(),
            None => false,
        };
        if data.likes.get(user_id).is_some_and(HashMap::is_empty) {
            data.likes.remove(user_id);
        }
        Ok(removed)
    }
}
