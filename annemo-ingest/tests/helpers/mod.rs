//! Shared test fixtures for annemo-ingest integration tests

#![allow(dead_code)]

use annemo_common::config::KeyLayout;
use annemo_common::Registry;
use annemo_ingest::{build_router, AppState, AppendLogStore, IngestionService, ResultsManager};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

pub struct TestApp {
    pub router: axum::Router,
    pub ingest: Arc<IngestionService>,
    pub results_dir: PathBuf,
    // Keeps the directory alive for the duration of the test
    pub _tmp: TempDir,
}

/// Registry with subjects alice and bob and three clips, one with a comma
pub fn test_registry() -> Registry {
    Registry::new(
        "http://media.local/clips",
        ["clip01.mp4", "clip02.mp4", "take,two.mp4"],
        ["alice", "bob"],
    )
    .expect("valid registry")
}

pub async fn setup_app(layout: KeyLayout) -> TestApp {
    let tmp = TempDir::new().unwrap();
    let results_dir = tmp.path().join("results");
    let store = Arc::new(AppendLogStore::open(&results_dir, false).await.unwrap());
    let ingest = Arc::new(IngestionService::new(
        Arc::new(test_registry()),
        Arc::clone(&store),
        layout,
    ));
    let results = Arc::new(ResultsManager::new(store));
    let router = build_router(AppState::new(Arc::clone(&ingest), results));

    TestApp {
        router,
        ingest,
        results_dir,
        _tmp: tmp,
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and return status plus raw body bytes
pub async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, bytes.to_vec())
}

pub async fn send_json(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, request).await;
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

/// (file name, size) for every entry of `dir`, sorted
pub fn snapshot_dir(dir: &Path) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            (
                e.file_name().to_string_lossy().into_owned(),
                e.metadata().unwrap().len(),
            )
        })
        .collect();
    entries.sort();
    entries
}
