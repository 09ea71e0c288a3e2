//! Liveness and readiness report
//!
//! Answers 200 while samples can be accepted and 503 once the results
//! directory is gone or read-only. The registry figures let an operator
//! confirm which registry document the process loaded.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub subjects: usize,
    pub content_items: usize,
    pub results_writable: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let registry = state.ingest.registry();
    let results_writable = state.results.directory_writable().await;
    let (code, status) = if results_writable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let report = HealthReport {
        status,
        module: "annemo-ingest",
        version: env!("CARGO_PKG_VERSION"),
        subjects: registry.subject_count(),
        content_items: registry.videos().len(),
        results_writable,
    };
    (code, Json(report))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
