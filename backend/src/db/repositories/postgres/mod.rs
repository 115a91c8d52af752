//! Postgres repository implementation using Diesel.
//!
//! Two tables back the repository traits: `songs` (the catalog) and
//! `user_song_likes` (one row per liked `(user_id, song_id)` pair).
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SongCatalog, UserSongStore,
};
use crate::models::{NewSong, Song, SongId, UserId, UserSongLike};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// Only the connection string is required; see the module docs for the
    /// optional `PG_*` tuning variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Migration failed: {}", e),
                    ErrorContext::new("run_migrations"),
                )
            })?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run `f` on a pooled connection inside `spawn_blocking`.
    ///
    /// Retryable failures are retried up to `max_retries` times with the delay
    /// doubling after every attempt.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    warn!("Retrying {} (attempt {})", operation, attempt + 1);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e.with_operation(operation));
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Current pool state and query counters.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

#[async_trait]
impl SongCatalog for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn store_song(&self, song: &NewSong) -> RepositoryResult<Song> {
        let row = NewSongRow::from(song);
        self.with_conn("store_song", move |conn| {
            let inserted: SongRow = diesel::insert_into(songs::table)
                .values(&row)
                .returning(SongRow::as_returning())
                .get_result(conn)
                .map_err(map_diesel_error)?;
            debug!("Stored song {} '{}'", inserted.song_id, inserted.title);
            Ok(inserted.into())
        })
        .await
    }

    async fn resolve(&self, song_id: SongId) -> RepositoryResult<Song> {
        self.with_conn("resolve", move |conn| {
            songs::table
                .filter(songs::song_id.eq(song_id.0))
                .select(SongRow::as_select())
                .first::<SongRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(Song::from)
                .ok_or_else(|| RepositoryError::song_not_found(song_id, "resolve"))
        })
        .await
    }

    async fn resolve_many(&self, song_ids: &[SongId]) -> RepositoryResult<Vec<Song>> {
        if song_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = song_ids.iter().map(|id| id.0).collect();
        self.with_conn("resolve_many", move |conn| {
            let rows = songs::table
                .filter(songs::song_id.eq_any(ids))
                .select(SongRow::as_select())
                .load::<SongRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Song::from).collect())
        })
        .await
    }

    async fn list_songs(&self) -> RepositoryResult<Vec<Song>> {
        self.with_conn("list_songs", |conn| {
            let rows = songs::table
                .select(SongRow::as_select())
                .order(songs::song_id.asc())
                .load::<SongRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(Song::from).collect())
        })
        .await
    }
}

#[async_trait]
impl UserSongStore for PostgresRepository {
    async fn find_by_user(&self, user_id: &UserId) -> RepositoryResult<Vec<UserSongLike>> {
        let user = user_id.0.clone();
        self.with_conn("find_by_user", move |conn| {
            let rows = user_song_likes::table
                .filter(user_song_likes::user_id.eq(&user))
                .select(LikeRow::as_select())
                .load::<LikeRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(rows.into_iter().map(UserSongLike::from).collect())
        })
        .await
    }

    async fn like_song(
        &self,
        user_id: &UserId,
        song_id: SongId,
        liked_at: DateTime<Utc>,
    ) -> RepositoryResult<UserSongLike> {
        let row = LikeRow {
            user_id: user_id.0.clone(),
            song_id: song_id.0,
            liked_at,
        };
        self.with_conn("like_song", move |conn| {
            // A repeated like keeps the original timestamp.
            diesel::insert_into(user_song_likes::table)
                .values(&row)
                .on_conflict((user_song_likes::user_id, user_song_likes::song_id))
                .do_nothing()
                .execute(conn)
                .map_err(map_diesel_error)?;

            let stored = user_song_likes::table
                .filter(user_song_likes::user_id.eq(&row.user_id))
                .filter(user_song_likes::song_id.eq(row.song_id))
                .select(LikeRow::as_select())
                .first::<LikeRow>(conn)
                .map_err(map_diesel_error)?;
            Ok(stored.into())
        })
        .await
    }

    async fn unlike_song(&self, user_id: &UserId, song_id: SongId) -> RepositoryResult<bool> {
        let user = user_id.0.clone();
        self.with_conn("unlike_song", move |conn| {
            let deleted = diesel::delete(
                user_song_likes::table
                    .filter(user_song_likes::user_id.eq(&user))
                    .filter(user_song_likes::song_id.eq(song_id.0)),
            )
            .execute(conn)
            .map_err(map_diesel_error)?;
            Ok(deleted > 0)
        })
        .await
    }
}
