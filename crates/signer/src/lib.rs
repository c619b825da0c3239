//! Sui signing keypair for the Mothr storage gateway.
//!
//! This crate provides:
//! - Ed25519 secret key parsing from Sui-exported base64
//! - Sui address derivation for the gateway's own account

pub mod error;
pub mod key;

pub use error::{SignerError, SignerResult};
pub use key::{ED25519_FLAG, SuiAddress, SuiKeypair};
