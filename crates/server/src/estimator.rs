//! Storage cost estimation.

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use mothr_core::config::FiatFallback;
use mothr_core::{CostQuote, CostReport, CostRequest, Denomination, ExchangeRate};
use mothr_network::{ExchangeRateSource, NetworkError, StorageNetwork, with_timeout};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Returned when a size is beyond what the network can encode.
const BLOB_TOO_LARGE: &str = "file size exceeds the largest storable blob";

/// Fiat projection settings.
#[derive(Clone)]
struct FiatRates {
    source: Arc<dyn ExchangeRateSource>,
    fallback: FiatFallback,
    timeout: Duration,
}

/// Turns a validated request into a cost report using the network's quote.
#[derive(Clone)]
pub struct CostEstimator {
    network: Arc<dyn StorageNetwork>,
    denomination: Denomination,
    quote_timeout: Duration,
    fiat: Option<FiatRates>,
}

impl CostEstimator {
    pub fn new(
        network: Arc<dyn StorageNetwork>,
        denomination: Denomination,
        quote_timeout: Duration,
    ) -> Self {
        Self {
            network,
            denomination,
            quote_timeout,
            fiat: None,
        }
    }

    /// Project totals into fiat using `source`.
    pub fn with_rates(
        mut self,
        source: Arc<dyn ExchangeRateSource>,
        fallback: FiatFallback,
        timeout: Duration,
    ) -> Self {
        self.fiat = Some(FiatRates {
            source,
            fallback,
            timeout,
        });
        self
    }

    /// Quote `request` and assemble the report.
    ///
    /// The quote and the fiat rate are fetched together; the first failure
    /// cancels the other call. A zero-cost report is never substituted.
    pub async fn estimate(&self, request: CostRequest) -> ApiResult<CostReport> {
        let (quote, rate) = match tokio::try_join!(self.quote(request), self.fiat_rate()) {
            Ok(pair) => pair,
            Err(e) => {
                metrics::COST_ESTIMATES.with_label_values(&["error"]).inc();
                return Err(e);
            }
        };

        let report = CostReport::new(request, quote, &self.denomination, rate)?;
        metrics::COST_ESTIMATES.with_label_values(&["ok"]).inc();
        tracing::debug!(
            size = request.size.get(),
            epochs = request.epochs.get(),
            total_cost = %report.total_cost,
            "cost estimated"
        );
        Ok(report)
    }

    async fn quote(&self, request: CostRequest) -> ApiResult<CostQuote> {
        let started = Instant::now();
        let result = with_timeout(
            self.quote_timeout,
            self.network.quote(request.size, request.epochs),
        )
        .await;
        metrics::UPSTREAM_DURATION
            .with_label_values(&["quote"])
            .observe(started.elapsed().as_secs_f64());

        result.map_err(|e| match e {
            NetworkError::BlobTooLarge { .. } => {
                tracing::debug!(error = %e, "size cannot be stored");
                ApiError::BadRequest(BLOB_TOO_LARGE.to_string())
            }
            e => {
                metrics::record_upstream_error("quote", &e);
                ApiError::UpstreamQuote(e)
            }
        })
    }

    /// Current exchange rate, or `None` when fiat projection is off or the
    /// source failed under the `omit` fallback.
    async fn fiat_rate(&self) -> ApiResult<Option<ExchangeRate>> {
        let Some(fiat) = &self.fiat else {
            return Ok(None);
        };

        match with_timeout(fiat.timeout, fiat.source.rate()).await {
            Ok(rate) => Ok(Some(rate)),
            Err(e) => {
                metrics::FIAT_RATE_FAILURES.inc();
                metrics::record_upstream_error("rate", &e);
                match fiat.fallback {
                    FiatFallback::Omit => {
                        tracing::warn!(
                            source = %fiat.source.describe(),
                            error = %e,
                            "exchange rate unavailable, omitting fiat amount"
                        );
                        Ok(None)
                    }
                    FiatFallback::Fail => Err(ApiError::ExchangeRate(e)),
                }
            }
        }
    }
}
