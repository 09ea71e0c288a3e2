//! Content catalog endpoints

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VideosQuery {
    pub subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub location: String,
}

/// GET /videos?subject=<name>
///
/// Unknown or missing subjects get an empty list rather than an error.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideosQuery>,
) -> Json<VideosResponse> {
    let registry = state.ingest.registry();
    let videos = query
        .subject
        .as_deref()
        .map(|subject| registry.list_content_for(subject).to_vec())
        .unwrap_or_default();
    Json(VideosResponse { videos })
}

/// GET /location
pub async fn get_location(State(state): State<AppState>) -> Json<LocationResponse> {
    Json(LocationResponse {
        location: state.ingest.registry().location().to_string(),
    })
}
