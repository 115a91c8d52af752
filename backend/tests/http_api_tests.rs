//! HTTP API tests driving the axum router in-process.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use weezart_analysis::db::repositories::LocalRepository;
use weezart_analysis::db::repository::FullRepository;
use weezart_analysis::http::{create_router, AppState};
use weezart_analysis::models::{Song, SongId, UserId, UserSongLike};

fn song(id: i64, artist: &str, genre: &str, release: (i32, u32, u32), popularity: f64) -> Song {
    Song {
        id: SongId(id),
        title: format!("Song {}", id),
        artist: artist.to_string(),
        genre: genre.to_string(),
        release_date: NaiveDate::from_ymd_opt(release.0, release.1, release.2).unwrap(),
        popularity,
    }
}

fn seeded_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.insert_song(song(1, "Ada", "Pop", (2023, 1, 5), 80.0));
    repo.insert_song(song(2, "Bo", "Rock", (2023, 1, 5), 95.0));
    repo.insert_song(song(3, "Ada", "Pop", (2023, 6, 1), 10.0));

    let likes = [
        (1, Utc.with_ymd_and_hms(2023, 1, 5, 8, 0, 0).unwrap()),
        (2, Utc.with_ymd_and_hms(2023, 1, 5, 20, 0, 0).unwrap()),
        (3, Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()),
    ];
    for (id, liked_at) in likes {
        repo.insert_like(UserSongLike {
            user_id: UserId::from("u1"),
            song_id: SongId(id),
            liked_at,
        });
    }
    repo
}

fn app(repo: LocalRepository) -> Router {
    let repo = Arc::new(repo) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

fn song_ids(body: &Value) -> Vec<i64> {
    body["songs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(LocalRepository::new()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_genre_endpoint() {
    let (status, body) = get(app(seeded_repo()), "/v1/analysis/u1/genre/Pop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(song_ids(&body), vec![1, 3]);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_top_and_latest_endpoints() {
    let (_, top) = get(app(seeded_repo()), "/v1/analysis/u1/top?limit=2").await;
    assert_eq!(song_ids(&top), vec![2, 1]);

    let (_, latest) = get(app(seeded_repo()), "/v1/analysis/u1/latest").await;
    assert_eq!(song_ids(&latest), vec![3, 2, 1]);
}

#[tokio::test]
async fn test_bad_limit_is_json_bad_request() {
    let (status, body) = get(app(seeded_repo()), "/v1/analysis/u1/top?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_daily_liked_endpoint() {
    let (status, body) = get(app(seeded_repo()), "/v1/analysis/u1/daily-liked").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"counts": {"2023-01-05": 2, "2023-06-01": 1}, "total": 3})
    );
}

#[tokio::test]
async fn test_release_date_endpoints() {
    let (status, body) = get(
        app(seeded_repo()),
        "/v1/analysis/u1/release-date?start=2023-01-01&end=2023-01-31",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(song_ids(&body), vec![1, 2]);

    let (_, by_years) = get(app(seeded_repo()), "/v1/analysis/u1/release-date/2023/2023").await;
    assert_eq!(song_ids(&by_years), vec![1, 2, 3]);

    let (_, reversed) = get(
        app(seeded_repo()),
        "/v1/analysis/u1/release-date?start=2024-01-01&end=2020-01-01",
    )
    .await;
    assert_eq!(reversed["total"], 0);

    let (status, _) = get(
        app(seeded_repo()),
        "/v1/analysis/u1/release-date?start=yesterday&end=2020-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_counts_endpoints() {
    let (_, counts) = get(app(seeded_repo()), "/v1/analysis/u1/counts").await;
    assert_eq!(
        counts,
        json!({"liked_songs": 3, "distinct_genres": 2, "distinct_artists": 2})
    );

    let (_, since) = get(app(seeded_repo()), "/v1/analysis/u1/counts/since/2023-06-01").await;
    assert_eq!(since["liked_songs"], 1);

    let (status, _) = get(app(seeded_repo()), "/v1/analysis/u1/counts/since/June").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_gets_empty_results() {
    let (status, body) = get(app(seeded_repo()), "/v1/analysis/ghost/top").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"songs": [], "total": 0}));
}

#[tokio::test]
async fn test_song_and_like_lifecycle() {
    let repo = LocalRepository::new();

    let (status, created) = send(
        app(repo.clone()),
        Method::POST,
        "/v1/songs",
        Some(json!({
            "title": "Intro",
            "artist": "Ada",
            "genre": "Pop",
            "release_date": "2021-03-04",
            "popularity": 42.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = get(app(repo.clone()), &format!("/v1/songs/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Intro");

    let (status, like) = send(
        app(repo.clone()),
        Method::POST,
        "/v1/users/u9/likes",
        Some(json!({"song_id": id, "liked_at": "2023-02-02T10:00:00Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(like["user_id"], "u9");

    let (_, likes) = get(app(repo.clone()), "/v1/users/u9/likes").await;
    assert_eq!(likes["total"], 1);

    let uri = format!("/v1/users/u9/likes/{}", id);
    let (status, _) = send(app(repo.clone()), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(app(repo), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_like_unknown_song_is_404() {
    let (status, body) = send(
        app(LocalRepository::new()),
        Method::POST,
        "/v1/users/u1/likes",
        Some(json!({"song_id": 77})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["details"].as_str().unwrap().contains("operation=like_song"));
}

#[tokio::test]
async fn test_invalid_song_is_400() {
    let (status, body) = send(
        app(LocalRepository::new()),
        Method::POST,
        "/v1/songs",
        Some(json!({
            "title": "",
            "artist": "Ada",
            "genre": "Pop",
            "release_date": "2021-03-04"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = get(app(LocalRepository::new()), "/v1/songs/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(app(LocalRepository::new()), "/v1/songs/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_outage_is_500() {
    let repo = seeded_repo();
    repo.set_healthy(false);
    let (status, body) = get(app(repo.clone()), "/v1/analysis/u1/top").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REPOSITORY_ERROR");

    let (_, health) = get(app(repo), "/health").await;
    assert_eq!(health["database"], "disconnected");
}
