//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
///
/// The display strings of the request validation variants are part of the
/// HTTP contract and are returned to callers verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("fileSize query parameter is required (in bytes)")]
    MissingFileSize,

    #[error("size must be a positive number")]
    InvalidSize,

    #[error("epochs must be a positive integer")]
    InvalidEpochs,

    #[error("invalid blob id: {0}")]
    InvalidBlobId(String),

    #[error("invalid denomination: {0}")]
    InvalidDenomination(String),

    #[error("invalid exchange rate: {0}")]
    InvalidExchangeRate(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
