use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::llm::LlmError;
use crate::pipeline::PipelineError;
use crate::rag::RagError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Upstream failure ({status})")]
    Upstream { status: u16, body: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Wire shape of every error response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Upstream { status, body } => {
                tracing::error!(status, "upstream failure: {body}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM",
                    format!("upstream returned {status}: {body}"),
                )
            }
            ApiError::Internal(detail) => {
                // Log the detail, never expose it.
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Llm(LlmError::Upstream { status, body }) => {
                ApiError::Upstream { status, body }
            }
            PipelineError::Retrieval(RagError::Upstream { status, body }) => {
                ApiError::Upstream { status, body }
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
