//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS; the browser client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Catalog
        .route(
            "/songs",
            get(handlers::list_songs).post(handlers::create_song),
        )
        .route("/songs/{song_id}", get(handlers::get_song))
        // Likes
        .route(
            "/users/{user_id}/likes",
            get(handlers::list_likes).post(handlers::like_song),
        )
        .route(
            "/users/{user_id}/likes/{song_id}",
            delete(handlers::unlike_song),
        )
        // Analysis
        .route(
            "/analysis/{user_id}/release-date",
            get(handlers::songs_by_release_date),
        )
        .route(
            "/analysis/{user_id}/release-date/{start_year}/{end_year}",
            get(handlers::songs_by_release_years),
        )
        .route(
            "/analysis/{user_id}/genre/{genre}",
            get(handlers::songs_by_genre),
        )
        .route("/analysis/{user_id}/latest", get(handlers::latest_liked))
        .route("/analysis/{user_id}/top", get(handlers::top_liked))
        .route(
            "/analysis/{user_id}/daily-liked",
            get(handlers::daily_like_counts),
        )
        .route("/analysis/{user_id}/counts", get(handlers::like_counts))
        .route(
            "/analysis/{user_id}/counts/since/{date}",
            get(handlers::like_counts_since),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FullRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
    }
}
