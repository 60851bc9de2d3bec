//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    pub async fn get_health(&self) -> Response {
        self.get("/api/health").await
    }

    pub async fn list_library(&self, kind: &str) -> Response {
        self.get(&format!("/api/library/{}", kind)).await
    }

    pub async fn list_library_page(&self, kind: &str, limit: usize, offset: usize) -> Response {
        self.get(&format!(
            "/api/library/{}?limit={}&offset={}",
            kind, limit, offset
        ))
        .await
    }

    pub async fn get_item(&self, kind: &str, id: i64) -> Response {
        self.get(&format!("/api/library/{}/{}", kind, id)).await
    }

    pub async fn get_children(&self, kind: &str, id: i64) -> Response {
        self.get(&format!("/api/library/{}/{}/children", kind, id))
            .await
    }

    pub async fn search(&self, query: &str, limit: usize) -> Response {
        self.get(&format!(
            "/api/search?q={}&limit={}",
            urlencoding::encode(query),
            limit
        ))
        .await
    }

    pub async fn recent(&self, limit: usize) -> Response {
        self.get(&format!("/api/recent?limit={}", limit)).await
    }
}

/// Reads the `ratingKey` of every record in an envelope's `data` array.
pub fn rating_keys(envelope: &Value) -> Vec<i64> {
    envelope["data"]
        .as_array()
        .expect("data is not an array")
        .iter()
        .map(|record| record["ratingKey"].as_i64().expect("missing ratingKey"))
        .collect()
}
