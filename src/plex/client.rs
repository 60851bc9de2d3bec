//! HTTP client for the media server.

use super::{LiveFetchError, LiveQuery, RawPayload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Plex-Token";

/// A live source of catalog payloads.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Whether both a base URL and a token are known.
    fn is_configured(&self) -> bool;

    /// Runs one bounded request. Never retries.
    async fn fetch(&self, query: &LiveQuery) -> Result<RawPayload, LiveFetchError>;
}

/// HTTP client for the media server API.
pub struct PlexClient {
    client: reqwest::Client,
    base_url: Option<String>,
    token: Option<String>,
    timeout: Duration,
}

impl PlexClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the media server (e.g., "http://192.168.1.10:32400")
    /// * `token` - Access token sent with every request
    /// * `timeout` - Upper bound for a whole request, body included
    pub fn new(base_url: Option<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        let token = token.filter(|t| !t.is_empty());

        Ok(Self {
            client,
            base_url,
            token,
            timeout,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

#[async_trait]
impl RemoteSource for PlexClient {
    fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.token.is_some()
    }

    async fn fetch(&self, query: &LiveQuery) -> Result<RawPayload, LiveFetchError> {
        let (Some(base_url), Some(token)) = (&self.base_url, &self.token) else {
            return Err(LiveFetchError::Disabled);
        };

        let url = format!("{}{}", base_url, query.path_and_query());
        let request = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .header(ACCEPT, "application/json");

        let exchange = async {
            let response = request.send().await.map_err(LiveFetchError::from_reqwest)?;
            let status = response.status();
            if !status.is_success() {
                return Err(LiveFetchError::HttpError(status.as_u16()));
            }
            response.bytes().await.map_err(LiveFetchError::from_reqwest)
        };

        let body = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| LiveFetchError::Timeout)??;

        RawPayload::from_slice(&body)
    }
}
