//! Network error types.

use std::time::Duration;
use thiserror::Error;

/// Storage network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{size} bytes exceed the largest blob encodable over {n_shards} shards")]
    BlobTooLarge { size: u64, n_shards: u16 },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl NetworkError {
    /// Whether the failure was a timeout, either ours or the HTTP client's.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Short label used for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Timeout(_) => "timeout",
            Self::Http(e) if e.is_timeout() => "timeout",
            Self::Http(_) => "transport",
            Self::UpstreamStatus { .. } => "status",
            Self::MalformedResponse(_) => "malformed",
            Self::Rpc { .. } => "rpc",
            Self::BlobTooLarge { .. } => "too_large",
            Self::Overflow(_) => "overflow",
            Self::Config(_) => "config",
        }
    }
}

/// Result type for network operations.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Await `fut` for at most `limit`, mapping expiry to [`NetworkError::Timeout`].
///
/// Dropping the returned future drops `fut`, which cancels any in-flight
/// request it owns.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> NetworkResult<T>
where
    F: std::future::Future<Output = NetworkResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| NetworkError::Timeout(limit))?
}
