//! Repository trait definitions for database operations.
//!
//! Storage is split across two focused traits:
//!
//! - [`user_song`]: like records keyed by user
//! - [`song_catalog`]: song metadata keyed by song id
//!
//! # Trait Composition
//!
//! Backends implement both traits and pick up [`FullRepository`] through the
//! blanket implementation below:
//!
//! ```ignore
//! impl UserSongStore for MyRepo { ... }
//! impl SongCatalog for MyRepo { ... }
//!
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let likes = repo.find_by_user(&user_id).await?;
//!     let songs = repo.resolve_many(&ids).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod song_catalog;
pub mod user_song;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use song_catalog::SongCatalog;
pub use user_song::UserSongStore;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: UserSongStore + SongCatalog {}

impl<T> FullRepository for T where T: UserSongStore + SongCatalog {}
