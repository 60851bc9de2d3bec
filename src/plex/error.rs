use thiserror::Error;

/// Failure of the live path. Every variant is recoverable by falling back to
/// the mirror.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LiveFetchError {
    #[error("live mode is disabled")]
    Disabled,

    #[error("request timed out")]
    Timeout,

    #[error("upstream answered with HTTP {0}")]
    HttpError(u16),

    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("malformed upstream payload: {0}")]
    MalformedUpstream(String),
}

impl LiveFetchError {
    pub fn malformed(message: impl Into<String>) -> Self {
        LiveFetchError::MalformedUpstream(message.into())
    }

    /// Maps a transport error, stripping the URL so query-string credentials never leak.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return LiveFetchError::Timeout;
        }
        if let Some(status) = err.status() {
            return LiveFetchError::HttpError(status.as_u16());
        }
        if err.is_decode() {
            return LiveFetchError::MalformedUpstream(err.without_url().to_string());
        }
        LiveFetchError::Unreachable(err.without_url().to_string())
    }
}
