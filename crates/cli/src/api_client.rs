use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!("server URL must start with http:// or https://");
        }
        let base_url = Url::parse(base_url).context("invalid server URL")?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).context("failed to build API URL")
    }

    async fn checked(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = req.send().await.context("request to gateway failed")?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        anyhow::bail!("API error ({}): {}", status, message);
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let response = self.checked(req).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).context("unexpected response from gateway")
    }

    /// Estimate the cost of storing `size` bytes.
    pub async fn estimate(&self, size: u64, epochs: Option<u32>) -> Result<CostEstimate> {
        let mut url = self.url("/storage-cost")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fileSize", &size.to_string());
            if let Some(epochs) = epochs {
                query.append_pair("epochs", &epochs.to_string());
            }
        }
        self.send_json(self.http.get(url)).await
    }

    /// Upload `contents` as the multipart `file` field.
    pub async fn upload(
        &self,
        filename: &str,
        contents: Vec<u8>,
        epochs: Option<u32>,
    ) -> Result<UploadReceipt> {
        let mut url = self.url("/write")?;
        if let Some(epochs) = epochs {
            url.query_pairs_mut()
                .append_pair("epochs", &epochs.to_string());
        }
        let part = reqwest::multipart::Part::bytes(contents).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send_json(self.http.post(url).multipart(form)).await
    }

    /// Fetch the raw bytes of a blob.
    pub async fn download(&self, blob_id: &str) -> Result<Vec<u8>> {
        let mut url = self.url("/read/")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("server URL cannot be a base"))?
            .pop_if_empty()
            .push(blob_id);
        let response = self.checked(self.http.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.url("/health")?;
        self.send_json(self.http.get(url)).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub file_size_bytes: u64,
    pub epochs: u32,
    pub storage_cost: String,
    pub write_cost: String,
    pub total_cost: String,
    pub total_cost_in_sui: f64,
    #[serde(default)]
    pub total_cost_in_usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub blob_id: String,
    pub identifier: String,
    pub size_bytes: u64,
    pub epochs: u32,
    pub deletable: bool,
    #[serde(default)]
    pub end_epoch: Option<u64>,
    #[serde(default)]
    pub cost: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
    pub version: String,
}
