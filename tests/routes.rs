//! Route-level tests against the assembled router.
//!
//! The storage client points at an unused local port, so every storage call
//! fails fast; that is enough for validation and the degraded quota view,
//! which are what these tests exercise.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use lector_server::config::{Config, StorageProvider};
use lector_server::ocr::{OcrError, OcrProvider, TextAnnotation};
use lector_server::storage::S3Client;
use lector_server::tts::{SpeechSynthesizer, TtsError};
use lector_server::{build_router, AppState};

struct EmptyOcr;

#[async_trait]
impl OcrProvider for EmptyOcr {
    fn name(&self) -> &str {
        "empty"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn recognize_document(
        &self,
        _data: &[u8],
        _language: Option<&str>,
    ) -> Result<TextAnnotation, OcrError> {
        Ok(TextAnnotation::default())
    }
}

struct NullSynthesizer;

#[async_trait]
impl SpeechSynthesizer for NullSynthesizer {
    fn name(&self) -> &str {
        "null"
    }

    async fn synthesize_long_audio(&self, _text: &str, _output_uri: &str) -> Result<(), TtsError> {
        Ok(())
    }
}

async fn test_server() -> TestServer {
    let mut config = Config::default();
    config.storage.endpoint = "http://127.0.0.1:9".to_string();
    config.storage.provider = StorageProvider::Minio;

    let storage = S3Client::new(&config.storage).await.unwrap();
    let state = AppState::new(config, storage, Arc::new(EmptyOcr), Arc::new(NullSynthesizer));
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let server = test_server().await;

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn versioned_health_alias_works() {
    let server = test_server().await;
    server.get("/api/v1/health").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn process_rejects_traversal_keys() {
    let server = test_server().await;

    let response = server
        .post("/api/v1/process")
        .json(&json!({ "remotePath": "../secrets.pdf" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn process_rejects_empty_keys() {
    let server = test_server().await;

    let response = server
        .post("/api/v1/process")
        .json(&json!({ "remotePath": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn process_rejects_absolute_keys() {
    let server = test_server().await;

    let response = server
        .post("/api/v1/process")
        .json(&json!({ "remotePath": "/etc/passwd" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bare_process_alias_is_registered() {
    let server = test_server().await;

    let response = server
        .post("/process")
        .json(&json!({ "remotePath": "../x.pdf" }))
        .await;
    // validation runs, so the alias resolved to the same handler
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn quota_status_degrades_to_zeroed_ledger() {
    let server = test_server().await;

    let response = server.get("/api/v1/quota").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["daily"]["used"], 0);
    assert_eq!(body["daily"]["limit"], 50_000);
    assert_eq!(body["daily"]["remaining"], 50_000);
    assert_eq!(body["monthly"]["limit"], 1_000_000);
}
