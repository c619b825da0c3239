//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mothr_network::NetworkError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// API error type.
///
/// Upstream variants carry the network error for logging only; callers see
/// a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] mothr_core::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("blob not found: {0}")]
    NotFound(String),

    #[error("file exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: u64 },

    #[error("failed to fetch storage cost from the network")]
    UpstreamQuote(#[source] NetworkError),

    #[error("failed to store blob on the network")]
    Upload(#[source] NetworkError),

    #[error("failed to read blob from the network")]
    Download(#[source] NetworkError),

    #[error("exchange rate unavailable")]
    ExchangeRate(#[source] NetworkError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::UpstreamQuote(_) => "upstream_quote_error",
            Self::Upload(_) => "upload_error",
            Self::Download(_) => "download_error",
            Self::ExchangeRate(_) => "exchange_rate_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(e) => match e {
                mothr_core::Error::MissingFileSize
                | mothr_core::Error::InvalidSize
                | mothr_core::Error::InvalidEpochs
                | mothr_core::Error::InvalidBlobId(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamQuote(e) | Self::Upload(e) | Self::Download(e) => {
                if e.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            Self::ExchangeRate(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the caller.
    fn public_message(&self) -> String {
        match self {
            Self::UpstreamQuote(e) if e.is_timeout() => {
                "timed out fetching storage cost from the network".to_string()
            }
            Self::Upload(e) if e.is_timeout() => "timed out storing blob on the network".to_string(),
            Self::Download(e) if e.is_timeout() => {
                "timed out reading blob from the network".to_string()
            }
            Self::Validation(e) if self.status_code().is_server_error() => {
                tracing::debug!(error = %e, "hiding internal validation failure");
                "internal error".to_string()
            }
            Self::Internal(_) => "internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            let cause = std::error::Error::source(&self)
                .map(ToString::to_string)
                .unwrap_or_else(|| self.to_string());
            tracing::error!(code = self.code(), status = status.as_u16(), error = %cause, "request failed");
        } else {
            tracing::debug!(code = self.code(), status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
