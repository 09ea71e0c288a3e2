//! HTTP API handlers for annemo-ingest

pub mod annotations;
pub mod catalog;
pub mod health;
pub mod results;

use serde::Serialize;

pub use annotations::{submit_emotion, submit_social};
pub use catalog::{get_location, list_videos};
pub use health::health_routes;
pub use results::{delete_result, download_result, list_results};

/// `{"status": "OK"}` acknowledgement
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "OK" }
    }
}
