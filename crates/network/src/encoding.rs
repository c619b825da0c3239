//! Walrus encoded-size arithmetic and pricing.
//!
//! Walrus charges per storage unit of *encoded* data. A blob is expanded by
//! two-dimensional Reed-Solomon (RS2) encoding across all shards, and every
//! shard additionally stores the blob metadata. Prices are read from the
//! system object; everything else is derived from the shard count.

use crate::error::{NetworkError, NetworkResult};
use mothr_core::{ByteSize, CostQuote, EpochCount, Mist};

/// One storage unit: 1 MiB of encoded data.
pub const BYTES_PER_UNIT_SIZE: u64 = 1024 * 1024;

const DIGEST_LEN: u64 = 32;
const BLOB_ID_LEN: u64 = 32;

/// Primary and secondary source symbol counts for `n_shards`.
pub fn source_symbols(n_shards: u16) -> NetworkResult<(u64, u64)> {
    if n_shards == 0 {
        return Err(NetworkError::Config("n_shards must be at least 1".to_string()));
    }
    let n = u64::from(n_shards);
    let max_faulty = (n - 1) / 3;
    Ok((n - 2 * max_faulty, n - max_faulty))
}

/// Total encoded length of a blob of `size` bytes, metadata included.
pub fn encoded_blob_length(size: u64, n_shards: u16) -> NetworkResult<u128> {
    let (primary, secondary) = source_symbols(n_shards)?;
    let n = u128::from(n_shards);

    let mut symbol_size = size.max(1).div_ceil(primary * secondary);
    // RS2 needs an even symbol size.
    if symbol_size % 2 == 1 {
        symbol_size += 1;
    }
    if symbol_size > u64::from(u16::MAX) {
        return Err(NetworkError::BlobTooLarge { size, n_shards });
    }

    let slivers = u128::from(primary + secondary) * u128::from(symbol_size) * n;
    let metadata = n * (n * u128::from(DIGEST_LEN) * 2 + u128::from(BLOB_ID_LEN));
    Ok(slivers + metadata)
}

/// Storage units needed for `encoded` bytes.
pub fn storage_units(encoded: u128) -> u128 {
    encoded.div_ceil(u128::from(BYTES_PER_UNIT_SIZE))
}

/// Prices and shard count read from the network's system state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoragePrices {
    /// MIST per storage unit per epoch.
    pub storage_price_per_unit: u64,
    /// MIST per storage unit, charged once per write.
    pub write_price_per_unit: u64,
    pub n_shards: u16,
}

impl StoragePrices {
    /// Price a blob of `size` bytes stored for `epochs` epochs.
    pub fn quote(&self, size: ByteSize, epochs: EpochCount) -> NetworkResult<CostQuote> {
        let units = storage_units(encoded_blob_length(size.get(), self.n_shards)?);
        let overflow = || NetworkError::Overflow(format!("cost of {units} units"));

        let storage_cost = Mist::from(self.storage_price_per_unit)
            .checked_mul(units)
            .and_then(|cost| cost.checked_mul(u128::from(epochs.get())))
            .ok_or_else(overflow)?;
        let write_cost = Mist::from(self.write_price_per_unit)
            .checked_mul(units)
            .ok_or_else(overflow)?;

        Ok(CostQuote::new(storage_cost, write_cost))
    }
}
