//! End-to-end tests for live-first resolution
//!
//! A fake media server provides the live path; the fixture mirror is the
//! fallback.

mod common;

use common::{
    rating_keys, FakePlex, TestClient, TestServer, Upstream, UpstreamMode, AVAILABLE_MOVIES,
    MISSING_ID, MOVIE_ALIEN_ID, MOVIE_BRAZIL_ID, MOVIE_MATRIX_ID, PLEX_TOKEN,
    SLOW_UPSTREAM_DELAY_MS, UPSTREAM_MOVIE_1_ID, UPSTREAM_MOVIE_2_ID, UPSTREAM_MOVIE_TOTAL,
};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

async fn assert_movies_from_mirror(client: &TestClient) {
    let response = client.list_library_page("movie", 2, 0).await;
    assert_eq!(response.status(), StatusCode::OK);

    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["provenance"], "fallback");
    assert_eq!(envelope["fallback"], true);
    assert_eq!(rating_keys(&envelope), vec![MOVIE_ALIEN_ID, MOVIE_BRAZIL_ID]);
    assert_eq!(envelope["total"], 2);
}

#[tokio::test]
async fn test_live_listing_reports_upstream_total() {
    let upstream = FakePlex::spawn().await;
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    let envelope: Value = client
        .list_library_page("movie", 2, 0)
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(envelope["provenance"], "live");
    assert_eq!(envelope["fallback"], false);
    assert_eq!(envelope["total"], UPSTREAM_MOVIE_TOTAL);
    assert_eq!(
        rating_keys(&envelope),
        vec![UPSTREAM_MOVIE_1_ID, UPSTREAM_MOVIE_2_ID]
    );

    let heat = &envelope["data"][0];
    assert_eq!(heat["available"], true);
    assert_eq!(heat["videoResolution"], "1080p");
    assert_eq!(heat["videoCodec"], "H264");
    assert_eq!(heat["sizeHuman"], "5.20 GB");
    assert_eq!(heat["durationHuman"], "2h50m");
    assert_eq!(heat["lastSeen"], "2024-05-01T10:00:00Z");

    assert_eq!(upstream.last_token().as_deref(), Some(PLEX_TOKEN));
}

#[tokio::test]
async fn test_repeat_queries_are_served_from_cache() {
    let upstream = FakePlex::spawn().await;
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    let first: Value = client.list_library("movie").await.json().await.unwrap();
    let second: Value = client.list_library("movie").await.json().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_upstream_error_falls_back() {
    let upstream = FakePlex::spawn().await;
    upstream.set_mode(UpstreamMode::Failing(500));
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    assert_movies_from_mirror(&client).await;
}

#[tokio::test]
async fn test_slow_upstream_times_out_and_falls_back() {
    let upstream = FakePlex::spawn().await;
    upstream.set_mode(UpstreamMode::Slow(Duration::from_millis(
        SLOW_UPSTREAM_DELAY_MS,
    )));
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    let start = std::time::Instant::now();
    assert_movies_from_mirror(&client).await;
    assert!(start.elapsed() < Duration::from_millis(SLOW_UPSTREAM_DELAY_MS));
}

#[tokio::test]
async fn test_unreachable_upstream_falls_back() {
    let server = TestServer::spawn(Upstream::Unreachable).await;
    let client = TestClient::new(server.base_url.clone());

    assert_movies_from_mirror(&client).await;
}

#[tokio::test]
async fn test_garbage_upstream_falls_back() {
    let upstream = FakePlex::spawn().await;
    upstream.set_mode(UpstreamMode::Garbage);
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    assert_movies_from_mirror(&client).await;
}

#[tokio::test]
async fn test_fallback_is_not_cached() {
    let upstream = FakePlex::spawn().await;
    upstream.set_mode(UpstreamMode::Failing(503));
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    assert_movies_from_mirror(&client).await;

    upstream.set_mode(UpstreamMode::Normal);
    let envelope: Value = client
        .list_library_page("movie", 2, 0)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(envelope["provenance"], "live");
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_live_lookup_reads_attribute_holder_shape() {
    let upstream = FakePlex::spawn().await;
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_item("movie", UPSTREAM_MOVIE_1_ID).await;
    assert_eq!(response.status(), StatusCode::OK);

    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["provenance"], "live");
    assert_eq!(envelope["data"]["title"], "Heat");
    assert_eq!(envelope["data"]["year"], 1995);
}

#[tokio::test]
async fn test_live_miss_is_answered_by_mirror() {
    let upstream = FakePlex::spawn().await;
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    let envelope: Value = client
        .get_item("movie", MOVIE_MATRIX_ID)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(envelope["provenance"], "fallback");
    assert_eq!(envelope["data"]["title"], "The Matrix");

    let response = client.get_item("movie", MISSING_ID).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let envelope: Value = response.json().await.unwrap();
    assert!(envelope["data"].is_null());
    assert_eq!(envelope["provenance"], "fallback");
}

#[tokio::test]
async fn test_live_search_skips_unsupported_types() {
    let upstream = FakePlex::spawn().await;
    let server = TestServer::spawn(Upstream::Fake(&upstream)).await;
    let client = TestClient::new(server.base_url.clone());

    let envelope: Value = client.search("heat", 10).await.json().await.unwrap();
    assert_eq!(envelope["provenance"], "live");
    assert_eq!(rating_keys(&envelope), vec![600, 602]);
    assert_eq!(envelope["data"][0]["type"], "movie");
    assert_eq!(envelope["data"][1]["type"], "artist");
    assert_eq!(envelope["data"][1]["artistName"], "Heatwave");
}

#[tokio::test]
async fn test_everything_down_still_answers() {
    let server = TestServer::spawn_without_mirror(Upstream::Unreachable).await;
    let client = TestClient::new(server.base_url.clone());

    let health: Value = client.get_health().await.json().await.unwrap();
    assert_eq!(health["local"], false);

    let response = client.recent(10).await;
    assert_eq!(response.status(), StatusCode::OK);
    let envelope: Value = response.json().await.unwrap();
    assert_eq!(envelope["fallback"], true);
    assert!(rating_keys(&envelope).is_empty());
    assert_eq!(envelope["total"], 0);

    let response = client.get_item("movie", MOVIE_MATRIX_ID).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mirror_total_counts_returned_rows() {
    let server = TestServer::spawn(Upstream::Unreachable).await;
    let client = TestClient::new(server.base_url.clone());

    let envelope: Value = client.list_library("movie").await.json().await.unwrap();
    assert_eq!(envelope["total"], AVAILABLE_MOVIES);
}
