//! Results listing, export and deletion endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::StatusResponse;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<String>,
}

/// GET /results
pub async fn list_results(State(state): State<AppState>) -> Result<Json<ResultsResponse>, ApiError> {
    let results = state.results.list().await?;
    Ok(Json(ResultsResponse { results }))
}

/// GET /results/:name
///
/// Returns the raw CSV as an attachment.
pub async fn download_result(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let (file_name, contents) = state.results.export(&name).await?;
    // Whitelisted names are plain ASCII, safe to quote into the header
    let disposition = format!("attachment; filename=\"{}\"", file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        contents,
    )
        .into_response())
}

/// DELETE /results/:name
pub async fn delete_result(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.results.delete(&name).await?;
    Ok(Json(StatusResponse::ok()))
}
