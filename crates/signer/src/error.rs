//! Signer error types.

use thiserror::Error;

/// Key handling errors.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("key parsing error: {0}")]
    KeyParsing(String),

    #[error("unsupported signature scheme flag 0x{0:02x} (only Ed25519 is supported)")]
    UnsupportedScheme(u8),
}

/// Result type for signer operations.
pub type SignerResult<T> = std::result::Result<T, SignerError>;
