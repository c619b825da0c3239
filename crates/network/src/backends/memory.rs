//! In-process storage network for development and tests.

use crate::encoding::StoragePrices;
use crate::error::{NetworkError, NetworkResult};
use crate::traits::StorageNetwork;
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use mothr_core::{BlobId, BlobPayload, ByteSize, CostQuote, EpochCount, WritePolicy, WriteReceipt};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;

/// Blob network held entirely in memory.
///
/// Blob ids are the URL-safe base64 of the SHA-256 of the contents, so
/// identical uploads share an id.
pub struct MemoryNetwork {
    prices: StoragePrices,
    blobs: RwLock<HashMap<BlobId, Bytes>>,
}

impl MemoryNetwork {
    pub fn new(prices: StoragePrices) -> Self {
        Self {
            prices,
            blobs: RwLock::new(HashMap::new()),
        }
    }

    fn blob_id_for(contents: &[u8]) -> NetworkResult<BlobId> {
        let digest = Sha256::digest(contents);
        let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
        BlobId::new(encoded).map_err(|e| NetworkError::MalformedResponse(e.to_string()))
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl StorageNetwork for MemoryNetwork {
    async fn quote(&self, size: ByteSize, epochs: EpochCount) -> NetworkResult<CostQuote> {
        self.prices.quote(size, epochs)
    }

    #[instrument(skip(self, payload, policy), fields(backend = "memory", size = payload.len()))]
    async fn write_blob(
        &self,
        payload: BlobPayload,
        policy: &WritePolicy,
    ) -> NetworkResult<WriteReceipt> {
        let blob_id = Self::blob_id_for(&payload.contents)?;
        let size_bytes = payload.len() as u64;

        let cost = match ByteSize::new(size_bytes) {
            Ok(size) => Some(
                self.prices
                    .quote(size, policy.epochs)?
                    .total()
                    .map_err(|e| NetworkError::Overflow(e.to_string()))?,
            ),
            Err(_) => None,
        };

        let previous = self
            .blobs
            .write()
            .await
            .insert(blob_id.clone(), payload.contents);

        let receipt = if previous.is_some() {
            json!({ "alreadyCertified": { "blobId": blob_id.as_str() } })
        } else {
            json!({
                "newlyCreated": {
                    "blobObject": {
                        "blobId": blob_id.as_str(),
                        "size": size_bytes,
                        "deletable": policy.deletable,
                        "owner": policy.owner,
                    }
                }
            })
        };

        Ok(WriteReceipt {
            blob_id,
            identifier: payload.identifier,
            size_bytes,
            epochs: policy.epochs,
            deletable: policy.deletable,
            end_epoch: None,
            cost: if previous.is_some() { None } else { cost },
            receipt,
        })
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn read_blob(&self, id: &BlobId) -> NetworkResult<Bytes> {
        self.blobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| NetworkError::NotFound(id.to_string()))
    }

    async fn health_check(&self) -> NetworkResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
