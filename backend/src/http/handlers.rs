//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Extractor rejections are turned into JSON `BAD_REQUEST` bodies.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use tracing::info;

use super::dto::{
    DailyLikeCounts, DateRange, HealthResponse, LikeCounts, LikeList, LikeRequest, LimitQuery,
    NewSong, ReleaseDateQuery, Song, SongId, SongList, UserSongLike,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::UserId;
use crate::services::analysis;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(format!("Invalid date '{}': {}", value, e)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Catalog
// =============================================================================

/// GET /v1/songs
pub async fn list_songs(State(state): State<AppState>) -> HandlerResult<SongList> {
    let songs = db_services::list_songs(state.repository.as_ref()).await?;
    Ok(Json(songs.into()))
}

/// POST /v1/songs
pub async fn create_song(
    State(state): State<AppState>,
    body: Result<Json<NewSong>, JsonRejection>,
) -> Result<(StatusCode, Json<Song>), AppError> {
    let Json(new_song) = body?;
    let song = db_services::store_song(state.repository.as_ref(), &new_song).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

/// GET /v1/songs/{song_id}
pub async fn get_song(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Song> {
    let Path(song_id) = path?;
    let song = db_services::get_song(state.repository.as_ref(), SongId::new(song_id)).await?;
    Ok(Json(song))
}

// =============================================================================
// Likes
// =============================================================================

/// GET /v1/users/{user_id}/likes
pub async fn list_likes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<LikeList> {
    let likes = db_services::list_likes(state.repository.as_ref(), &UserId::new(user_id)).await?;
    Ok(Json(likes.into()))
}

/// POST /v1/users/{user_id}/likes
///
/// Liking a song twice keeps the original timestamp.
pub async fn like_song(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSongLike>), AppError> {
    let Json(request) = body?;
    let like = db_services::like_song(
        state.repository.as_ref(),
        &UserId::new(user_id),
        request.song_id,
        request.liked_at,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(like)))
}

/// DELETE /v1/users/{user_id}/likes/{song_id}
pub async fn unlike_song(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path((user_id, song_id)) = path?;
    db_services::unlike_song(
        state.repository.as_ref(),
        &UserId::new(user_id),
        SongId::new(song_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Analysis
// =============================================================================

/// GET /v1/analysis/{user_id}/release-date?start=YYYY-MM-DD&end=YYYY-MM-DD
pub async fn songs_by_release_date(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<ReleaseDateQuery>, QueryRejection>,
) -> HandlerResult<SongList> {
    let Query(query) = query?;
    let range = DateRange::from(query);
    let songs =
        analysis::songs_by_release_date(state.repository.as_ref(), &UserId::new(user_id), &range)
            .await?;
    Ok(Json(songs.into()))
}

/// GET /v1/analysis/{user_id}/release-date/{start_year}/{end_year}
pub async fn songs_by_release_years(
    State(state): State<AppState>,
    path: Result<Path<(String, i32, i32)>, PathRejection>,
) -> HandlerResult<SongList> {
    let Path((user_id, start_year, end_year)) = path?;
    let range = DateRange::from_years(start_year, end_year).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid year range {}..{}",
            start_year, end_year
        ))
    })?;
    let songs =
        analysis::songs_by_release_date(state.repository.as_ref(), &UserId::new(user_id), &range)
            .await?;
    Ok(Json(songs.into()))
}

/// GET /v1/analysis/{user_id}/genre/{genre}
pub async fn songs_by_genre(
    State(state): State<AppState>,
    Path((user_id, genre)): Path<(String, String)>,
) -> HandlerResult<SongList> {
    let songs =
        analysis::songs_by_genre(state.repository.as_ref(), &UserId::new(user_id), &genre).await?;
    Ok(Json(songs.into()))
}

/// GET /v1/analysis/{user_id}/latest?limit=N
pub async fn latest_liked(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> HandlerResult<SongList> {
    let Query(query) = query?;
    let songs = analysis::latest_liked_songs(
        state.repository.as_ref(),
        &UserId::new(user_id),
        query.limit_or_default(),
    )
    .await?;
    Ok(Json(songs.into()))
}

/// GET /v1/analysis/{user_id}/top?limit=N
pub async fn top_liked(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> HandlerResult<SongList> {
    let Query(query) = query?;
    let songs = analysis::top_liked_songs(
        state.repository.as_ref(),
        &UserId::new(user_id),
        query.limit_or_default(),
    )
    .await?;
    Ok(Json(songs.into()))
}

/// GET /v1/analysis/{user_id}/daily-liked
pub async fn daily_like_counts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<DailyLikeCounts> {
    let user_id = UserId::new(user_id);
    let counts = analysis::daily_likes(state.repository.as_ref(), &user_id).await?;
    info!("Daily like counts for {} cover {} days", user_id, counts.len());
    Ok(Json(counts.into()))
}

/// GET /v1/analysis/{user_id}/counts
pub async fn like_counts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> HandlerResult<LikeCounts> {
    let counts =
        analysis::user_like_counts(state.repository.as_ref(), &UserId::new(user_id), None).await?;
    Ok(Json(counts))
}

/// GET /v1/analysis/{user_id}/counts/since/{date}
pub async fn like_counts_since(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(String, String)>,
) -> HandlerResult<LikeCounts> {
    let since = parse_date(&date)?;
    let counts =
        analysis::user_like_counts(state.repository.as_ref(), &UserId::new(user_id), Some(since))
            .await?;
    Ok(Json(counts))
}
