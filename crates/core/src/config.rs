//! Configuration types shared across crates.

use crate::error::{Error, Result};
use crate::request::EpochCount;
use crate::units::{Denomination, ExchangeRate, MIST_PER_SUI};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Port override, usually supplied through the `PORT` env var.
    #[serde(default)]
    pub port: Option<u16>,
    /// Message returned by `GET /`.
    #[serde(default = "default_banner")]
    pub banner: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_banner() -> String {
    "Mothr storage gateway".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: None,
            banner: default_banner(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Resolve the listening address, applying the port override.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let mut addr: SocketAddr = self
            .bind
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address {:?}: {e}", self.bind)))?;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        Ok(addr)
    }
}

/// Which implementation of the storage network to talk to.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkBackend {
    /// Walrus publisher/aggregator plus Sui JSON-RPC.
    #[default]
    Walrus,
    /// Process-local network for development.
    Memory,
}

/// Sui network selector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuiNetwork {
    #[default]
    Testnet,
    Mainnet,
}

impl SuiNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }

    fn preset(&self) -> NetworkPreset {
        match self {
            Self::Testnet => NetworkPreset {
                rpc_url: "https://fullnode.testnet.sui.io:443",
                publisher_url: Some("https://publisher.walrus-testnet.walrus.space"),
                aggregator_url: "https://aggregator.walrus-testnet.walrus.space",
                system_object_id: "0x6c2547cbbc38025cf3adac45f63cb0a8d12ecf777cdc75a4971612bf97fdf6af",
            },
            Self::Mainnet => NetworkPreset {
                rpc_url: "https://fullnode.mainnet.sui.io:443",
                // No public publisher exists on mainnet.
                publisher_url: None,
                aggregator_url: "https://aggregator.walrus-mainnet.walrus.space",
                system_object_id: "0x2134d52768ea07e8c43570ef975eb3e4c27a39fa6396bef985b5abc58d03ddd2",
            },
        }
    }
}

impl fmt::Display for SuiNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct NetworkPreset {
    rpc_url: &'static str,
    publisher_url: Option<&'static str>,
    aggregator_url: &'static str,
    system_object_id: &'static str,
}

/// Fully resolved Walrus endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalrusEndpoints {
    pub rpc_url: String,
    pub publisher_url: String,
    pub aggregator_url: String,
    pub system_object_id: String,
}

/// Prices used by the in-memory network, in MIST per storage unit (1 MiB).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryNetworkConfig {
    #[serde(default = "default_memory_storage_price")]
    pub storage_price_per_unit: u64,
    #[serde(default = "default_memory_write_price")]
    pub write_price_per_unit: u64,
    #[serde(default = "default_memory_n_shards")]
    pub n_shards: u16,
}

fn default_memory_storage_price() -> u64 {
    100_000
}

fn default_memory_write_price() -> u64 {
    20_000
}

fn default_memory_n_shards() -> u16 {
    1000
}

impl Default for MemoryNetworkConfig {
    fn default() -> Self {
        Self {
            storage_price_per_unit: default_memory_storage_price(),
            write_price_per_unit: default_memory_write_price(),
            n_shards: default_memory_n_shards(),
        }
    }
}

/// Storage network configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub backend: NetworkBackend,
    /// Network selector, usually supplied through `SUI_NETWORK`.
    #[serde(default)]
    pub name: SuiNetwork,
    /// Sui full node JSON-RPC URL (defaults to the network preset).
    pub rpc_url: Option<String>,
    /// Walrus publisher URL (required on mainnet).
    pub publisher_url: Option<String>,
    /// Walrus aggregator URL (defaults to the network preset).
    pub aggregator_url: Option<String>,
    /// Walrus system object id (defaults to the network preset).
    pub system_object_id: Option<String>,
    /// Settings for the in-memory backend.
    #[serde(default)]
    pub memory: MemoryNetworkConfig,
}

impl NetworkConfig {
    /// Resolve Walrus endpoints, filling gaps from the network preset.
    pub fn walrus_endpoints(&self) -> Result<WalrusEndpoints> {
        let preset = self.name.preset();
        let publisher_url = self
            .publisher_url
            .clone()
            .or_else(|| preset.publisher_url.map(str::to_string))
            .ok_or_else(|| {
                Error::Config(format!(
                    "network.publisher_url must be set for {} (no public publisher)",
                    self.name
                ))
            })?;

        Ok(WalrusEndpoints {
            rpc_url: self
                .rpc_url
                .clone()
                .unwrap_or_else(|| preset.rpc_url.to_string()),
            publisher_url,
            aggregator_url: self
                .aggregator_url
                .clone()
                .unwrap_or_else(|| preset.aggregator_url.to_string()),
            system_object_id: self
                .system_object_id
                .clone()
                .unwrap_or_else(|| preset.system_object_id.to_string()),
        })
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend {
            NetworkBackend::Walrus => {
                let endpoints = self.walrus_endpoints()?;
                for (name, url) in [
                    ("rpc_url", &endpoints.rpc_url),
                    ("publisher_url", &endpoints.publisher_url),
                    ("aggregator_url", &endpoints.aggregator_url),
                ] {
                    if !(url.starts_with("http://") || url.starts_with("https://")) {
                        return Err(Error::Config(format!(
                            "network.{name} must be an http(s) URL, got {url:?}"
                        )));
                    }
                }
                if !endpoints.system_object_id.starts_with("0x") {
                    return Err(Error::Config(
                        "network.system_object_id must be a 0x-prefixed object id".to_string(),
                    ));
                }
                Ok(())
            }
            NetworkBackend::Memory => {
                if self.memory.n_shards == 0 {
                    return Err(Error::Config(
                        "network.memory.n_shards must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Where fiat exchange rates come from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FiatSource {
    /// A fixed USD price per SUI.
    Fixed { rate: f64 },
    /// A JSON endpoint; `pointer` is an RFC 6901 JSON pointer to the price.
    Http { url: String, pointer: String },
}

/// What to do when the rate source cannot produce a rate.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FiatFallback {
    /// Drop the fiat field from the response.
    #[default]
    Omit,
    /// Fail the whole estimate.
    Fail,
}

/// Fiat projection configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FiatConfig {
    pub source: FiatSource,
    #[serde(default)]
    pub on_unavailable: FiatFallback,
}

/// Pricing configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Smallest units per native unit.
    #[serde(default = "default_mist_per_sui")]
    pub mist_per_sui: u64,
    /// Optional fiat projection. Without it no fiat amount is reported.
    #[serde(default)]
    pub fiat: Option<FiatConfig>,
}

fn default_mist_per_sui() -> u64 {
    MIST_PER_SUI
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            mist_per_sui: default_mist_per_sui(),
            fiat: None,
        }
    }
}

impl PricingConfig {
    pub fn denomination(&self) -> Result<Denomination> {
        Denomination::new(u128::from(self.mist_per_sui))
    }

    pub fn validate(&self) -> Result<()> {
        self.denomination()?;
        if let Some(fiat) = &self.fiat {
            match &fiat.source {
                FiatSource::Fixed { rate } => {
                    ExchangeRate::new(*rate)?;
                }
                FiatSource::Http { url, pointer } => {
                    if !(url.starts_with("http://") || url.starts_with("https://")) {
                        return Err(Error::Config(format!(
                            "pricing.fiat.source.url must be an http(s) URL, got {url:?}"
                        )));
                    }
                    if !pointer.is_empty() && !pointer.starts_with('/') {
                        return Err(Error::Config(format!(
                            "pricing.fiat.source.pointer must start with '/', got {pointer:?}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Policy applied to uploads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Epochs used when the caller does not pass `epochs`.
    #[serde(default = "default_upload_epochs")]
    pub default_epochs: u32,
    /// Whether written blobs can later be deleted by their owner.
    #[serde(default = "default_deletable")]
    pub deletable: bool,
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
}

fn default_upload_epochs() -> u32 {
    crate::request::DEFAULT_EPOCHS
}

fn default_deletable() -> bool {
    true
}

fn default_max_size_bytes() -> u64 {
    10 * 1024 * 1024 // public testnet publisher limit
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_epochs: default_upload_epochs(),
            deletable: default_deletable(),
            max_size_bytes: default_max_size_bytes(),
        }
    }
}

impl UploadConfig {
    pub fn default_epochs(&self) -> Result<EpochCount> {
        EpochCount::new(self.default_epochs)
            .map_err(|_| Error::Config("upload.default_epochs must be at least 1".to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.default_epochs()?;
        if self.max_size_bytes == 0 {
            return Err(Error::Config(
                "upload.max_size_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Time budgets for calls to external services.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_quote_secs")]
    pub quote_secs: u64,
    #[serde(default = "default_write_secs")]
    pub write_secs: u64,
    #[serde(default = "default_read_secs")]
    pub read_secs: u64,
    #[serde(default = "default_rate_secs")]
    pub rate_secs: u64,
}

fn default_quote_secs() -> u64 {
    15
}

fn default_write_secs() -> u64 {
    120
}

fn default_read_secs() -> u64 {
    60
}

fn default_rate_secs() -> u64 {
    5
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            quote_secs: default_quote_secs(),
            write_secs: default_write_secs(),
            read_secs: default_read_secs(),
            rate_secs: default_rate_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn quote(&self) -> Duration {
        Duration::from_secs(self.quote_secs)
    }

    pub fn write(&self) -> Duration {
        Duration::from_secs(self.write_secs)
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    pub fn rate(&self) -> Duration {
        Duration::from_secs(self.rate_secs)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("quote_secs", self.quote_secs),
            ("write_secs", self.write_secs),
            ("read_secs", self.read_secs),
            ("rate_secs", self.rate_secs),
        ] {
            if secs == 0 {
                return Err(Error::Config(format!("timeouts.{name} must be at least 1")));
            }
        }
        Ok(())
    }
}

/// Signing key configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Base64 Ed25519 secret key, usually supplied through `SUI_SECRET_KEY`.
    pub secret_key: Option<String>,
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field(
                "secret_key",
                &self.secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl SigningConfig {
    /// The configured key, or an error naming the variables that provide it.
    pub fn require_secret_key(&self) -> Result<&str> {
        self.secret_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "SUI_SECRET_KEY env var is required (base64 secret key); \
                     MOTHR_SIGNING__SECRET_KEY or signing.secret_key also work"
                        .to_string(),
                )
            })
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub signing: SigningConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses the in-memory network and no signing key.
    pub fn for_testing() -> Self {
        Self {
            network: NetworkConfig {
                backend: NetworkBackend::Memory,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate everything except the signing key, which the binary checks
    /// separately so it can fail with a dedicated message.
    pub fn validate(&self) -> Result<()> {
        self.server.bind_addr()?;
        self.network.validate()?;
        self.pricing.validate()?;
        self.upload.validate()?;
        self.timeouts.validate()?;
        Ok(())
    }
}
