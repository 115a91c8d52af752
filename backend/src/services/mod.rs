//! Service layer for the liked-song analysis.
//!
//! Services sit between the repositories and the HTTP handlers. They load
//! likes, resolve them against the catalog and hand the result to the pure
//! analysis functions.

pub mod analysis;

pub use analysis::{
    by_genre, by_release_date, daily_like_counts, latest_liked, like_counts, like_counts_since,
    top_liked, DEFAULT_LIMIT,
};
