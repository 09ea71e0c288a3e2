//! HTTP error mapping for annemo-ingest

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or query could not be parsed (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Domain error from ingestion or results handling
    #[error(transparent)]
    Common(#[from] annemo_common::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        use annemo_common::Error;

        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Common(err) => match err {
                Error::UnknownSubject(_) => (StatusCode::BAD_REQUEST, "No such user".to_string()),
                Error::InvalidSample(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                Error::InvalidDeletionTarget(_) => (
                    StatusCode::BAD_REQUEST,
                    "Invalid results file name".to_string(),
                ),
                Error::NotFound(name) => (StatusCode::NOT_FOUND, format!("No such file: {}", name)),
                Error::Write { .. } | Error::Io(_) | Error::ConfigInvalid(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "message": message }))).into_response()
    }
}
