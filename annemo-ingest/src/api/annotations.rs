//! Sample ingestion endpoints
//!
//! `POST /emotion` and `POST /social` share one contract:
//! 200 `{"status":"OK"}` once the record is on disk, 400 for unknown
//! subjects or malformed samples, 500 when the append fails.

use annemo_common::samples::Submission;
use annemo_common::{EmotionSample, SocialSample};
use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::StatusResponse;
use crate::error::ApiError;
use crate::AppState;

/// POST /emotion
pub async fn submit_emotion(
    State(state): State<AppState>,
    payload: Result<Json<Submission<EmotionSample>>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(Submission { subject, data }) = payload?;
    state.ingest.submit_emotion(&subject, &data).await?;
    Ok(Json(StatusResponse::ok()))
}

/// POST /social
pub async fn submit_social(
    State(state): State<AppState>,
    payload: Result<Json<Submission<SocialSample>>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(Submission { subject, data }) = payload?;
    state.ingest.submit_social(&subject, &data).await?;
    Ok(Json(StatusResponse::ok()))
}
