//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are re-exported from the api module since they already
//! derive Serialize/Deserialize. Request bodies and query strings live here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{
    // Analysis
    DailyLikeCounts, DateRange, LikeCounts,
    // Library
    LikeList, NewSong, Song, SongId, SongList, UserSongLike,
};

/// Request body for recording a like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRequest {
    /// Song being liked
    pub song_id: SongId,
    /// When the like happened (default: now)
    #[serde(default)]
    pub liked_at: Option<DateTime<Utc>>,
}

/// Query parameters for the release-date endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseDateQuery {
    /// First release date, inclusive (YYYY-MM-DD)
    pub start: NaiveDate,
    /// Last release date, inclusive (YYYY-MM-DD)
    pub end: NaiveDate,
}

impl From<ReleaseDateQuery> for DateRange {
    fn from(query: ReleaseDateQuery) -> Self {
        DateRange::new(query.start, query.end)
    }
}

/// Query parameters for the latest / top endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LimitQuery {
    /// Maximum number of songs (default: 5)
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LimitQuery {
    pub fn limit_or_default(&self) -> usize {
        self.limit.unwrap_or(crate::services::DEFAULT_LIMIT)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_request_without_timestamp() {
        let request: LikeRequest = serde_json::from_str(r#"{"song_id": 4}"#).unwrap();
        assert_eq!(request.song_id, SongId(4));
        assert!(request.liked_at.is_none());
    }

    #[test]
    fn test_like_request_with_rfc3339_timestamp() {
        let request: LikeRequest =
            serde_json::from_str(r#"{"song_id": 4, "liked_at": "2023-01-05T09:30:00Z"}"#)
                .unwrap();
        assert_eq!(
            request.liked_at.map(|t| t.to_rfc3339()),
            Some("2023-01-05T09:30:00+00:00".to_string())
        );
    }

    #[test]
    fn test_limit_defaults_to_five() {
        assert_eq!(LimitQuery::default().limit_or_default(), 5);
        assert_eq!(LimitQuery { limit: Some(0) }.limit_or_default(), 0);
    }
}
