//! Stub storage network and rate sources.

use async_trait::async_trait;
use bytes::Bytes;
use mothr_core::{
    BlobId, BlobPayload, ByteSize, CostQuote, EpochCount, ExchangeRate, Mist, WritePolicy,
    WriteReceipt,
};
use mothr_network::{ExchangeRateSource, NetworkError, NetworkResult, StorageNetwork};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How the stub answers an operation.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    Succeed,
    Fail,
    Hang,
}

/// A storage network that records calls and echoes stored blobs back.
#[allow(dead_code)]
pub struct StubNetwork {
    pub quote: CostQuote,
    pub quote_behavior: Behavior,
    pub write_behavior: Behavior,
    pub read_behavior: Behavior,
    pub quote_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
    pub last_quote: Mutex<Option<(ByteSize, EpochCount)>>,
    pub last_policy: Mutex<Option<WritePolicy>>,
    blobs: Mutex<HashMap<BlobId, Bytes>>,
}

#[allow(dead_code)]
impl StubNetwork {
    /// A network quoting 0.5 SUI storage and 0.1 SUI write.
    pub fn new() -> Self {
        Self::with_quote(500_000_000, 100_000_000)
    }

    pub fn with_quote(storage_cost: u128, write_cost: u128) -> Self {
        Self {
            quote: CostQuote::new(Mist::new(storage_cost), Mist::new(write_cost)),
            quote_behavior: Behavior::Succeed,
            write_behavior: Behavior::Succeed,
            read_behavior: Behavior::Succeed,
            quote_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
            last_quote: Mutex::new(None),
            last_policy: Mutex::new(None),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            quote_behavior: Behavior::Fail,
            write_behavior: Behavior::Fail,
            read_behavior: Behavior::Fail,
            ..Self::new()
        }
    }

    pub fn hanging() -> Self {
        Self {
            quote_behavior: Behavior::Hang,
            write_behavior: Behavior::Hang,
            read_behavior: Behavior::Hang,
            ..Self::new()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
            + self.write_calls.load(Ordering::SeqCst)
            + self.read_calls.load(Ordering::SeqCst)
    }

    async fn apply(behavior: Behavior) -> NetworkResult<()> {
        match behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail => Err(NetworkError::UpstreamStatus {
                status: 500,
                body: "stub upstream failure".to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl StorageNetwork for StubNetwork {
    async fn quote(&self, size: ByteSize, epochs: EpochCount) -> NetworkResult<CostQuote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_quote.lock().unwrap() = Some((size, epochs));
        Self::apply(self.quote_behavior).await?;
        Ok(self.quote)
    }

    async fn write_blob(
        &self,
        payload: BlobPayload,
        policy: &WritePolicy,
    ) -> NetworkResult<WriteReceipt> {
        let n = self.write_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_policy.lock().unwrap() = Some(policy.clone());
        Self::apply(self.write_behavior).await?;

        let blob_id = BlobId::new(format!("stub-blob-{n}")).unwrap();
        let size_bytes = payload.len() as u64;
        self.blobs
            .lock()
            .unwrap()
            .insert(blob_id.clone(), payload.contents);

        Ok(WriteReceipt {
            receipt: serde_json::json!({
                "newlyCreated": { "blobObject": { "blobId": blob_id.as_str() } }
            }),
            blob_id,
            identifier: payload.identifier,
            size_bytes,
            epochs: policy.epochs,
            deletable: policy.deletable,
            end_epoch: Some(u64::from(policy.epochs.get()) + 10),
            cost: Some(Mist::new(1_000)),
        })
    }

    async fn read_blob(&self, id: &BlobId) -> NetworkResult<Bytes> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        Self::apply(self.read_behavior).await?;
        self.blobs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| NetworkError::NotFound(id.to_string()))
    }

    async fn health_check(&self) -> NetworkResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// A rate source that always fails.
#[allow(dead_code)]
pub struct FailingRate;

#[async_trait]
impl ExchangeRateSource for FailingRate {
    async fn rate(&self) -> NetworkResult<ExchangeRate> {
        Err(NetworkError::UpstreamStatus {
            status: 503,
            body: "rate service down".to_string(),
        })
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

/// A rate source that answers only after `delay`.
#[allow(dead_code)]
pub struct SlowRate {
    pub delay: Duration,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl SlowRate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ExchangeRateSource for SlowRate {
    async fn rate(&self) -> NetworkResult<ExchangeRate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ExchangeRate::new(2.0).unwrap())
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}
