//! Storage network abstraction and backends for the Mothr storage gateway.
//!
//! This crate provides:
//! - The `StorageNetwork` seam (quote, write, read, health)
//! - Walrus encoded-size pricing
//! - Backends: Walrus over HTTP and an in-memory network
//! - Fiat exchange-rate sources

pub mod backends;
pub mod encoding;
pub mod error;
pub mod rates;
pub mod traits;

pub use backends::{memory::MemoryNetwork, walrus::WalrusNetwork};
pub use encoding::{BYTES_PER_UNIT_SIZE, StoragePrices, encoded_blob_length, storage_units};
pub use error::{NetworkError, NetworkResult, with_timeout};
pub use rates::{FixedRate, HttpRateSource};
pub use traits::{ExchangeRateSource, StorageNetwork};

use mothr_core::config::{FiatSource, NetworkBackend, NetworkConfig, PricingConfig, TimeoutConfig};
use mothr_core::ExchangeRate;
use std::sync::Arc;

/// Create a storage network from configuration.
pub fn from_config(
    config: &NetworkConfig,
    timeouts: &TimeoutConfig,
) -> NetworkResult<Arc<dyn StorageNetwork>> {
    config
        .validate()
        .map_err(|e| NetworkError::Config(e.to_string()))?;

    match config.backend {
        NetworkBackend::Walrus => {
            let endpoints = config
                .walrus_endpoints()
                .map_err(|e| NetworkError::Config(e.to_string()))?;
            // Per-request ceiling; callers enforce tighter per-operation budgets.
            let request_timeout = timeouts.quote().max(timeouts.write()).max(timeouts.read());
            let network = WalrusNetwork::new(&endpoints, config.name.as_str(), request_timeout)?;
            Ok(Arc::new(network))
        }
        NetworkBackend::Memory => {
            let prices = StoragePrices {
                storage_price_per_unit: config.memory.storage_price_per_unit,
                write_price_per_unit: config.memory.write_price_per_unit,
                n_shards: config.memory.n_shards,
            };
            Ok(Arc::new(MemoryNetwork::new(prices)))
        }
    }
}

/// Create the configured fiat rate source, if any.
pub fn rate_source_from_config(
    config: &PricingConfig,
    timeouts: &TimeoutConfig,
) -> NetworkResult<Option<Arc<dyn ExchangeRateSource>>> {
    let Some(fiat) = &config.fiat else {
        return Ok(None);
    };

    let source: Arc<dyn ExchangeRateSource> = match &fiat.source {
        FiatSource::Fixed { rate } => {
            let rate = ExchangeRate::new(*rate).map_err(|e| NetworkError::Config(e.to_string()))?;
            Arc::new(FixedRate::new(rate))
        }
        FiatSource::Http { url, pointer } => {
            Arc::new(HttpRateSource::new(url, pointer.clone(), timeouts.rate())?)
        }
    };
    Ok(Some(source))
}
