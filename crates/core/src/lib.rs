//! Core domain types and shared logic for the Mothr storage gateway.
//!
//! This crate defines the canonical data model used across all other crates:
//! - MIST/SUI/fiat unit conversion with exact integer arithmetic
//! - Validated request values (byte sizes, epoch counts)
//! - Cost quotes and reports
//! - Blob identifiers, payloads and write receipts
//! - Configuration types

pub mod blob;
pub mod config;
pub mod cost;
pub mod error;
pub mod request;
pub mod units;

pub use blob::{BlobId, BlobPayload, WritePolicy, WriteReceipt};
pub use cost::{CostQuote, CostReport};
pub use error::{Error, Result};
pub use request::{ByteSize, CostQuery, CostRequest, DEFAULT_EPOCHS, EpochCount};
pub use units::{
    Denomination, ExchangeRate, MIST_PER_SUI, Mist, NativeAmount, to_fiat, to_native_unit,
};
