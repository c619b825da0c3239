//! Fiat exchange-rate sources.

use crate::error::{NetworkError, NetworkResult};
use crate::traits::ExchangeRateSource;
use async_trait::async_trait;
use mothr_core::ExchangeRate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// A rate fixed in configuration.
#[derive(Clone, Copy, Debug)]
pub struct FixedRate(ExchangeRate);

impl FixedRate {
    pub fn new(rate: ExchangeRate) -> Self {
        Self(rate)
    }
}

#[async_trait]
impl ExchangeRateSource for FixedRate {
    async fn rate(&self) -> NetworkResult<ExchangeRate> {
        Ok(self.0)
    }

    fn describe(&self) -> String {
        format!("fixed({})", self.0.value())
    }
}

/// A rate read from a JSON HTTP endpoint.
///
/// `pointer` is an RFC 6901 JSON pointer to the price, e.g. `/sui/usd` for
/// CoinGecko's `simple/price?ids=sui&vs_currencies=usd`.
pub struct HttpRateSource {
    client: Client,
    url: Url,
    pointer: String,
}

impl HttpRateSource {
    pub fn new(url: &str, pointer: impl Into<String>, timeout: Duration) -> NetworkResult<Self> {
        let url = Url::parse(url)
            .map_err(|e| NetworkError::Config(format!("invalid rate url {url:?}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url,
            pointer: pointer.into(),
        })
    }
}

#[async_trait]
impl ExchangeRateSource for HttpRateSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn rate(&self) -> NetworkResult<ExchangeRate> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::UpstreamStatus {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body: Value = response.json().await?;
        let value = body.pointer(&self.pointer).ok_or_else(|| {
            NetworkError::MalformedResponse(format!("no value at {}", self.pointer))
        })?;
        let price = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            NetworkError::MalformedResponse(format!("value at {} is not a number", self.pointer))
        })?;

        ExchangeRate::new(price).map_err(|e| NetworkError::MalformedResponse(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("http({}#{})", self.url, self.pointer)
    }
}
