//! HTTP gateway for the Mothr storage service.
//!
//! This crate provides:
//! - Storage cost estimates in MIST, SUI and optionally USD
//! - Blob upload and download proxied to the storage network
//! - Health and Prometheus metrics endpoints

pub mod error;
pub mod estimator;
pub mod gateway;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use estimator::CostEstimator;
pub use gateway::{BlobGateway, GatewayPolicy};
pub use routes::create_router;
pub use state::AppState;
