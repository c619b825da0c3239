//! Application state shared across handlers.

use crate::estimator::CostEstimator;
use crate::gateway::{BlobGateway, GatewayPolicy};
use mothr_core::config::{AppConfig, FiatFallback};
use mothr_network::{ExchangeRateSource, StorageNetwork};
use mothr_signer::SuiKeypair;
use std::sync::Arc;

/// Shared application state.
///
/// Everything here is built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub network: Arc<dyn StorageNetwork>,
    pub estimator: Arc<CostEstimator>,
    pub gateway: Arc<BlobGateway>,
    pub signer: Arc<SuiKeypair>,
}

impl AppState {
    /// Wire the estimator and gateway around an injected network and signer.
    pub fn new(
        config: AppConfig,
        network: Arc<dyn StorageNetwork>,
        rates: Option<Arc<dyn ExchangeRateSource>>,
        signer: Arc<SuiKeypair>,
    ) -> mothr_core::Result<Self> {
        let mut estimator = CostEstimator::new(
            network.clone(),
            config.pricing.denomination()?,
            config.timeouts.quote(),
        );
        if let Some(source) = rates {
            let fallback = config
                .pricing
                .fiat
                .as_ref()
                .map(|fiat| fiat.on_unavailable)
                .unwrap_or(FiatFallback::Omit);
            estimator = estimator.with_rates(source, fallback, config.timeouts.rate());
        }

        let gateway = BlobGateway::new(
            network.clone(),
            GatewayPolicy::from_config(&config.upload, &config.timeouts)?,
            Some(signer.address().to_string()),
        );

        Ok(Self {
            config: Arc::new(config),
            network,
            estimator: Arc::new(estimator),
            gateway: Arc::new(gateway),
            signer,
        })
    }
}
