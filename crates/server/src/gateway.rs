//! Blob upload and download through the storage network.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use bytes::Bytes;
use mothr_core::config::{TimeoutConfig, UploadConfig};
use mothr_core::{BlobId, BlobPayload, EpochCount, WritePolicy, WriteReceipt};
use mothr_network::{NetworkError, StorageNetwork, with_timeout};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upload policy and time budgets applied by [`BlobGateway`].
#[derive(Clone, Debug)]
pub struct GatewayPolicy {
    pub default_epochs: EpochCount,
    pub deletable: bool,
    pub max_size_bytes: u64,
    pub write_timeout: Duration,
    pub read_timeout: Duration,
}

impl GatewayPolicy {
    pub fn from_config(upload: &UploadConfig, timeouts: &TimeoutConfig) -> mothr_core::Result<Self> {
        Ok(Self {
            default_epochs: upload.default_epochs()?,
            deletable: upload.deletable,
            max_size_bytes: upload.max_size_bytes,
            write_timeout: timeouts.write(),
            read_timeout: timeouts.read(),
        })
    }
}

/// Proxies blob writes and reads to the storage network.
#[derive(Clone)]
pub struct BlobGateway {
    network: Arc<dyn StorageNetwork>,
    policy: GatewayPolicy,
    /// Address that will own written blob objects.
    owner: Option<String>,
}

impl BlobGateway {
    pub fn new(
        network: Arc<dyn StorageNetwork>,
        policy: GatewayPolicy,
        owner: Option<String>,
    ) -> Self {
        Self {
            network,
            policy,
            owner,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.policy.max_size_bytes
    }

    /// Store `payload` for `epochs` epochs, or the configured default.
    ///
    /// Empty and oversized payloads are rejected before the network is
    /// contacted. There is no retry.
    pub async fn upload(
        &self,
        payload: BlobPayload,
        epochs: Option<EpochCount>,
    ) -> ApiResult<WriteReceipt> {
        if payload.is_empty() {
            return Err(ApiError::BadRequest("file must not be empty".to_string()));
        }
        let size = payload.len() as u64;
        if size > self.policy.max_size_bytes {
            tracing::debug!(size, limit = self.policy.max_size_bytes, "upload too large");
            return Err(ApiError::PayloadTooLarge {
                limit: self.policy.max_size_bytes,
            });
        }

        let policy = WritePolicy {
            epochs: epochs.unwrap_or(self.policy.default_epochs),
            deletable: self.policy.deletable,
            owner: self.owner.clone(),
        };

        let identifier = payload.identifier.clone();
        let started = Instant::now();
        let result = with_timeout(
            self.policy.write_timeout,
            self.network.write_blob(payload, &policy),
        )
        .await;
        metrics::UPSTREAM_DURATION
            .with_label_values(&["write"])
            .observe(started.elapsed().as_secs_f64());

        match result {
            Ok(receipt) => {
                metrics::UPLOADS.with_label_values(&["ok"]).inc();
                metrics::BYTES_UPLOADED.inc_by(size);
                tracing::info!(
                    blob_id = %receipt.blob_id,
                    identifier = %identifier,
                    size,
                    epochs = policy.epochs.get(),
                    "blob uploaded"
                );
                Ok(receipt)
            }
            Err(e) => {
                metrics::record_upstream_error("write", &e);
                metrics::UPLOADS.with_label_values(&["error"]).inc();
                Err(ApiError::Upload(e))
            }
        }
    }

    /// Fetch the original bytes of blob `id`.
    pub async fn download(&self, id: &BlobId) -> ApiResult<Bytes> {
        let started = Instant::now();
        let result = with_timeout(self.policy.read_timeout, self.network.read_blob(id)).await;
        metrics::UPSTREAM_DURATION
            .with_label_values(&["read"])
            .observe(started.elapsed().as_secs_f64());

        match result {
            Ok(bytes) => {
                metrics::DOWNLOADS.with_label_values(&["ok"]).inc();
                metrics::BYTES_DOWNLOADED.inc_by(bytes.len() as u64);
                Ok(bytes)
            }
            Err(NetworkError::NotFound(_)) => {
                metrics::DOWNLOADS.with_label_values(&["not_found"]).inc();
                Err(ApiError::NotFound(id.to_string()))
            }
            Err(e) => {
                metrics::record_upstream_error("read", &e);
                metrics::DOWNLOADS.with_label_values(&["error"]).inc();
                Err(ApiError::Download(e))
            }
        }
    }
}
