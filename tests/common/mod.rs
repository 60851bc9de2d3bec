//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestClient, TestServer, Upstream, MOVIE_MATRIX_ID};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_get_movie() {
//!     let server = TestServer::spawn(Upstream::Offline).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_item("movie", MOVIE_MATRIX_ID).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fake_upstream;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::{rating_keys, TestClient};
pub use constants::*;
#[allow(unused_imports)]
pub use fake_upstream::{FakePlex, UpstreamMode};
pub use server::{TestServer, Upstream};
