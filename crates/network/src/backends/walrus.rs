//! Walrus storage network backend.
//!
//! Quotes are computed from the Walrus system object read over Sui JSON-RPC.
//! Writes go to a publisher and reads to an aggregator, both over HTTP.

use crate::encoding::StoragePrices;
use crate::error::{NetworkError, NetworkResult};
use crate::traits::StorageNetwork;
use async_trait::async_trait;
use bytes::Bytes;
use mothr_core::config::WalrusEndpoints;
use mothr_core::{
    BlobId, BlobPayload, ByteSize, CostQuote, EpochCount, Mist, WritePolicy, WriteReceipt,
};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Longest upstream error body kept for logs.
const MAX_ERROR_BODY: usize = 512;

const STORAGE_PRICE_FIELD: &str = "storage_price_per_unit_size";
const WRITE_PRICE_FIELD: &str = "write_price_per_unit_size";
const N_SHARDS_FIELD: &str = "n_shards";

/// Walrus publisher/aggregator client.
pub struct WalrusNetwork {
    client: Client,
    name: String,
    rpc_url: Url,
    publisher_url: Url,
    aggregator_url: Url,
    system_object_id: String,
}

impl WalrusNetwork {
    /// Create a client. `request_timeout` bounds every single HTTP request.
    pub fn new(
        endpoints: &WalrusEndpoints,
        name: impl Into<String>,
        request_timeout: Duration,
    ) -> NetworkResult<Self> {
        let parse = |label: &str, raw: &str| {
            Url::parse(raw).map_err(|e| NetworkError::Config(format!("invalid {label} {raw:?}: {e}")))
        };

        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("mothr-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            name: name.into(),
            rpc_url: parse("rpc url", &endpoints.rpc_url)?,
            publisher_url: parse("publisher url", &endpoints.publisher_url)?,
            aggregator_url: parse("aggregator url", &endpoints.aggregator_url)?,
            system_object_id: endpoints.system_object_id.clone(),
        })
    }

    /// `{base}/v1/blobs[/{id}]`, preserving any path prefix on `base`.
    fn blobs_url(base: &Url, id: Option<&BlobId>) -> NetworkResult<Url> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| NetworkError::Config(format!("{base} cannot be a base URL")))?;
            segments.pop_if_empty().extend(["v1", "blobs"]);
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    /// Send a JSON-RPC request and return its `result`.
    async fn rpc_call(&self, method: &str, params: Value) -> NetworkResult<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(self.rpc_url.clone())
            .json(&request)
            .send()
            .await?;
        let envelope: RpcEnvelope = error_for_status(response).await?.json().await?;

        if let Some(error) = envelope.error {
            return Err(NetworkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        envelope
            .result
            .ok_or_else(|| NetworkError::MalformedResponse(format!("{method}: no result")))
    }

    /// Read current prices and shard count from the Walrus system object.
    #[instrument(skip(self), fields(network = %self.name))]
    pub async fn storage_prices(&self) -> NetworkResult<StoragePrices> {
        let system = self
            .rpc_call(
                "sui_getObject",
                json!([self.system_object_id, { "showContent": true }]),
            )
            .await?;

        let version = system
            .pointer("/data/content/fields/version")
            .and_then(json_u64)
            .ok_or_else(|| {
                NetworkError::MalformedResponse("system object has no version".to_string())
            })?;

        let inner = self
            .rpc_call(
                "suix_getDynamicFieldObject",
                json!([
                    self.system_object_id,
                    { "type": "u64", "value": version.to_string() }
                ]),
            )
            .await?;

        let field = |name: &str| {
            find_field(&inner, name).and_then(json_u64).ok_or_else(|| {
                NetworkError::MalformedResponse(format!("system state has no {name}"))
            })
        };

        let n_shards = field(N_SHARDS_FIELD)?;
        let prices = StoragePrices {
            storage_price_per_unit: field(STORAGE_PRICE_FIELD)?,
            write_price_per_unit: field(WRITE_PRICE_FIELD)?,
            n_shards: u16::try_from(n_shards).map_err(|_| {
                NetworkError::MalformedResponse(format!("n_shards out of range: {n_shards}"))
            })?,
        };
        tracing::debug!(?prices, "fetched storage prices");
        Ok(prices)
    }
}

#[async_trait]
impl StorageNetwork for WalrusNetwork {
    #[instrument(skip(self), fields(network = %self.name))]
    async fn quote(&self, size: ByteSize, epochs: EpochCount) -> NetworkResult<CostQuote> {
        self.storage_prices().await?.quote(size, epochs)
    }

    #[instrument(skip(self, payload, policy), fields(network = %self.name, size = payload.len()))]
    async fn write_blob(
        &self,
        payload: BlobPayload,
        policy: &WritePolicy,
    ) -> NetworkResult<WriteReceipt> {
        let mut url = Self::blobs_url(&self.publisher_url, None)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("epochs", &policy.epochs.to_string());
            if policy.deletable {
                query.append_pair("deletable", "true");
            } else {
                query.append_pair("permanent", "true");
            }
            if let Some(owner) = &policy.owner {
                query.append_pair("send_object_to", owner);
            }
        }

        let size_bytes = payload.len() as u64;
        let response = self.client.put(url).body(payload.contents).send().await?;
        let receipt: Value = error_for_status(response).await?.json().await?;

        let (blob_id, end_epoch, cost) = parse_store_response(&receipt)?;
        tracing::info!(blob_id = %blob_id, size = size_bytes, "blob stored");

        Ok(WriteReceipt {
            blob_id,
            identifier: payload.identifier,
            size_bytes,
            epochs: policy.epochs,
            deletable: policy.deletable,
            end_epoch,
            cost,
            receipt,
        })
    }

    #[instrument(skip(self), fields(network = %self.name, blob_id = %id))]
    async fn read_blob(&self, id: &BlobId) -> NetworkResult<Bytes> {
        let url = Self::blobs_url(&self.aggregator_url, Some(id))?;
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(NetworkError::NotFound(id.to_string()));
        }
        Ok(error_for_status(response).await?.bytes().await?)
    }

    async fn health_check(&self) -> NetworkResult<()> {
        self.rpc_call("sui_getLatestCheckpointSequenceNumber", json!([]))
            .await
            .map(|_| ())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Turn a non-2xx response into [`NetworkError::UpstreamStatus`].
async fn error_for_status(response: Response) -> NetworkResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    Err(NetworkError::UpstreamStatus {
        status: status.as_u16(),
        body,
    })
}

/// Extract the blob id, end epoch and cost from a publisher response.
fn parse_store_response(receipt: &Value) -> NetworkResult<(BlobId, Option<u64>, Option<Mist>)> {
    let (raw_id, end_epoch, cost) = if let Some(created) = receipt.get("newlyCreated") {
        (
            created.pointer("/blobObject/blobId"),
            created
                .pointer("/blobObject/storage/endEpoch")
                .and_then(json_u64),
            created.get("cost"),
        )
    } else if let Some(certified) = receipt.get("alreadyCertified") {
        (
            certified.get("blobId"),
            certified.get("endEpoch").and_then(json_u64),
            None,
        )
    } else {
        return Err(NetworkError::MalformedResponse(
            "publisher response has neither newlyCreated nor alreadyCertified".to_string(),
        ));
    };

    let raw_id = raw_id
        .and_then(Value::as_str)
        .ok_or_else(|| NetworkError::MalformedResponse("publisher response has no blobId".to_string()))?;
    let blob_id = BlobId::new(raw_id).map_err(|e| NetworkError::MalformedResponse(e.to_string()))?;
    let cost = cost.and_then(|value| serde_json::from_value::<Mist>(value.clone()).ok());

    Ok((blob_id, end_epoch, cost))
}

/// Depth-first search for the first object field called `name`.
fn find_field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(name)
            .or_else(|| map.values().find_map(|child| find_field(child, name))),
        Value::Array(items) => items.iter().find_map(|child| find_field(child, name)),
        _ => None,
    }
}

/// Sui JSON encodes u64 as either a number or a decimal string.
fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
