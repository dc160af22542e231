//! Ingress-layer errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskhive_shared::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngressError {
    #[error("invalid request payload: {0}")]
    Validation(String),

    #[error("task queue unavailable: {0}")]
    BackendUnavailable(String),

    #[error("marshaling failure: {0}")]
    Marshal(#[from] serde_json::Error),
}

impl From<CoreError> for IngressError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => IngressError::Validation(msg),
            CoreError::Backend(msg) => IngressError::BackendUnavailable(msg),
            other => IngressError::BackendUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            IngressError::Validation(d) => {
                (StatusCode::BAD_REQUEST, "Invalid request payload", d.clone())
            }
            IngressError::BackendUnavailable(d) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Task queue unavailable",
                d.clone(),
            ),
            IngressError::Marshal(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Marshaling failure", e.to_string())
            }
        };
        (status, Json(json!({ "error": error, "details": details }))).into_response()
    }
}
