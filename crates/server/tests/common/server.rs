//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use mothr_core::config::AppConfig;
use mothr_network::{ExchangeRateSource, StorageNetwork};
use mothr_server::{AppState, create_router};
use mothr_signer::SuiKeypair;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use super::network::StubNetwork;

pub const BOUNDARY: &str = "mothr-test-boundary";

/// A router wired to a stub network.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub network: Arc<StubNetwork>,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server around a default stub network.
    pub fn new() -> Self {
        Self::with_network(StubNetwork::new())
    }

    pub fn with_network(network: StubNetwork) -> Self {
        Self::build(network, None, |_| {})
    }

    /// Create a test server with a rate source and config modifications.
    pub fn build<F>(
        network: StubNetwork,
        rates: Option<Arc<dyn ExchangeRateSource>>,
        modifier: F,
    ) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = AppConfig::for_testing();
        modifier(&mut config);

        let network = Arc::new(network);
        let dyn_network: Arc<dyn StorageNetwork> = network.clone();
        let signer = Arc::new(SuiKeypair::generate());
        let state = AppState::new(config, dyn_network, rates, signer)
            .expect("Failed to build app state");
        let router = create_router(state.clone());

        Self {
            router,
            state,
            network,
        }
    }

    /// Send a request and return status plus raw body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// GET `uri` and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(request).await;
        (status, parse_json(&body))
    }

    /// POST a multipart upload and parse the body as JSON.
    pub async fn upload(
        &self,
        uri: &str,
        field: &str,
        filename: &str,
        contents: &[u8],
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, filename, contents)))
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, parse_json(&body))
    }
}

/// Encode a single-part multipart/form-data body.
#[allow(dead_code)]
pub fn multipart_body(field: &str, filename: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[allow(dead_code)]
pub fn parse_json(body: &[u8]) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).unwrap_or(Value::Null)
    }
}
