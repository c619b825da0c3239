//! Storage network trait definitions.

use crate::error::NetworkResult;
use async_trait::async_trait;
use bytes::Bytes;
use mothr_core::{BlobId, BlobPayload, ByteSize, CostQuote, EpochCount, WritePolicy, WriteReceipt};

/// The external blob-storage network.
///
/// Implementations own transport details. Callers apply their own time
/// budgets on top of whatever the implementation enforces.
#[async_trait]
pub trait StorageNetwork: Send + Sync + 'static {
    /// Price storing `size` bytes for `epochs` epochs, without committing.
    async fn quote(&self, size: ByteSize, epochs: EpochCount) -> NetworkResult<CostQuote>;

    /// Store a blob and return the network's receipt.
    async fn write_blob(
        &self,
        payload: BlobPayload,
        policy: &WritePolicy,
    ) -> NetworkResult<WriteReceipt>;

    /// Fetch the original bytes of a stored blob.
    ///
    /// Returns [`NetworkError::NotFound`](crate::NetworkError::NotFound)
    /// when the network has no such blob.
    async fn read_blob(&self, id: &BlobId) -> NetworkResult<Bytes>;

    /// Check that the network is reachable.
    async fn health_check(&self) -> NetworkResult<()>;

    /// Human-readable network name (e.g., "testnet").
    fn name(&self) -> &str;
}

/// A source of fiat prices for one native unit.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync + 'static {
    async fn rate(&self) -> NetworkResult<mothr_core::ExchangeRate>;

    /// Label used in logs.
    fn describe(&self) -> String;
}
