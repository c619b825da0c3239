//! Integration tests for POST /write and GET /read/{blob_id}.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{StubNetwork, TestServer};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn upload_then_read_returns_original_bytes() {
    let server = TestServer::new();
    let contents = b"hello walrus\x00\xff binary tail";

    let (status, receipt) = server
        .upload("/write", "file", "notes.bin", contents)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["blobId"], "stub-blob-0");
    assert_eq!(receipt["identifier"], "notes.bin");
    assert_eq!(receipt["sizeBytes"], contents.len());
    assert_eq!(receipt["epochs"], 3);
    assert_eq!(receipt["deletable"], true);
    assert_eq!(receipt["endEpoch"], 13);
    assert_eq!(receipt["cost"], "1000");
    assert!(receipt["receipt"]["newlyCreated"].is_object());

    let request = Request::builder()
        .uri("/read/stub-blob-0")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(server.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], &contents[..]);
}

#[tokio::test]
async fn upload_is_owned_by_signer_address() {
    let server = TestServer::new();
    let (status, _) = server.upload("/write", "file", "a.txt", b"abc").await;
    assert_eq!(status, StatusCode::OK);

    let policy = server.network.last_policy.lock().unwrap().clone().unwrap();
    let expected = server.state.signer.address().to_string();
    assert_eq!(policy.owner.as_deref(), Some(expected.as_str()));
    assert_eq!(policy.epochs.get(), 3);
    assert!(policy.deletable);
}

#[tokio::test]
async fn upload_honors_epochs_query() {
    let server = TestServer::new();
    let (status, receipt) = server
        .upload("/write?epochs=7", "file", "a.txt", b"abc")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["epochs"], 7);
    let policy = server.network.last_policy.lock().unwrap().clone().unwrap();
    assert_eq!(policy.epochs.get(), 7);
}

#[tokio::test]
async fn upload_uses_configured_retention() {
    let server = TestServer::build(StubNetwork::new(), None, |config| {
        config.upload.default_epochs = 9;
        config.upload.deletable = false;
    });
    let (status, receipt) = server.upload("/write", "file", "a.txt", b"abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["epochs"], 9);
    assert_eq!(receipt["deletable"], false);
}

#[tokio::test]
async fn upload_without_filename_uses_default_identifier() {
    let server = TestServer::new();
    let (status, receipt) = server.upload("/write", "file", "", b"abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["identifier"], "blob");
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let server = TestServer::new();
    let (status, body) = server
        .upload("/write", "attachment", "a.txt", b"abc")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "multipart field 'file' is required");
    assert_eq!(server.network.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_multipart_upload_gets_json_error() {
    let server = TestServer::new();
    for content_type in [Some("application/json"), None] {
        let mut builder = Request::builder().method("POST").uri("/write");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(r#"{"file": "abc"}"#)).unwrap();

        let response = tower::ServiceExt::oneshot(server.router.clone(), request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
    assert_eq!(server.network.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let server = TestServer::new();
    let (status, body) = server.upload("/write", "file", "a.txt", b"").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "file must not be empty");
    assert_eq!(server.network.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_upload_epochs_are_rejected() {
    let server = TestServer::new();
    for raw in ["0", "abc", "2.5"] {
        let (status, body) = server
            .upload(&format!("/write?epochs={raw}"), "file", "a.txt", b"abc")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "epochs={raw:?}");
        assert_eq!(body["error"], "epochs must be a positive integer");
    }
    assert_eq!(server.network.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_upload_epochs_are_rejected() {
    let server = TestServer::new();
    let (status, body) = server
        .upload("/write?epochs=2&epochs=3", "file", "a.txt", b"abc")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "epochs must be a positive integer");
    assert_eq!(server.network.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let server = TestServer::build(StubNetwork::new(), None, |config| {
        config.upload.max_size_bytes = 16;
    });
    let (status, body) = server
        .upload("/write", "file", "big.bin", &[7u8; 17])
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "file exceeds the 16 byte upload limit");
    assert_eq!(server.network.write_calls.load(Ordering::SeqCst), 0);

    let (status, _) = server
        .upload("/write", "file", "fits.bin", &[7u8; 16])
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upload_failure_is_bad_gateway() {
    let server = TestServer::with_network(StubNetwork::failing());
    let (status, body) = server.upload("/write", "file", "a.txt", b"abc").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "failed to store blob on the network");
    assert!(body.get("blobId").is_none());
}

#[tokio::test]
async fn upload_timeout_is_gateway_timeout() {
    let server = TestServer::build(StubNetwork::hanging(), None, |config| {
        config.timeouts.write_secs = 1;
    });
    let (status, body) = server.upload("/write", "file", "a.txt", b"abc").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "timed out storing blob on the network");
}

#[tokio::test]
async fn unknown_blob_is_not_found() {
    let server = TestServer::new();
    let (status, body) = server.get_json("/read/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        serde_json::json!({ "error": "blob not found: does-not-exist" })
    );
}

#[tokio::test]
async fn malformed_blob_id_is_rejected_without_upstream_call() {
    let server = TestServer::new();
    let (status, body) = server.get_json("/read/a%20b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid blob id"));
    assert_eq!(server.network.read_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn read_failure_is_bad_gateway() {
    let server = TestServer::with_network(StubNetwork::failing());
    let (status, body) = server.get_json("/read/some-blob").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "failed to read blob from the network");
}
