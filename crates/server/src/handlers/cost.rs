//! Storage cost estimation endpoint.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use mothr_core::{CostQuery, CostReport, CostRequest, Mist};
use serde::Serialize;

/// Cost estimate response.
///
/// MIST amounts are decimal strings so they survive JSON parsers that use
/// doubles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCostResponse {
    pub file_size_bytes: u64,
    pub epochs: u32,
    pub storage_cost: Mist,
    pub write_cost: Mist,
    pub total_cost: Mist,
    pub total_cost_in_sui: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost_in_usd: Option<f64>,
}

impl From<CostReport> for StorageCostResponse {
    fn from(report: CostReport) -> Self {
        Self {
            file_size_bytes: report.request.size.get(),
            epochs: report.request.epochs.get(),
            storage_cost: report.quote.storage_cost,
            write_cost: report.quote.write_cost,
            total_cost: report.total_cost,
            total_cost_in_sui: report.total_cost_in_native.to_f64(),
            total_cost_in_usd: report.total_cost_in_fiat,
        }
    }
}

/// GET /storage-cost?fileSize=<bytes>&epochs=<n> - Estimate storage cost.
pub async fn get_storage_cost(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<StorageCostResponse>> {
    let Query(pairs) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query: CostQuery = pairs.into_iter().collect();
    let request = CostRequest::parse(&query)?;
    let report = state.estimator.estimate(request).await?;
    Ok(Json(report.into()))
}
