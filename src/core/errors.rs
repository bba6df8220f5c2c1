use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure kinds produced by the retrieval pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("ingestion failed: {0}")]
    Ingestion(String),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("upstream model failed: {0}")]
    UpstreamModel(String),
    #[error("not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("bad gateway: {0}")]
    BadGateway(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Ingestion(reason) => {
                tracing::warn!("PDF processing error: {}", reason);
                ApiError::Internal("Failed to process PDF.".to_string())
            }
            RagError::Retrieval(reason) => {
                tracing::error!("Retrieval error: {}", reason);
                ApiError::Internal("Failed to retrieve relevant passages.".to_string())
            }
            RagError::UpstreamModel(reason) => {
                tracing::error!("Language model error: {}", reason);
                ApiError::BadGateway(format!("Error generating answer: {}", reason))
            }
            RagError::NotFound(msg) => ApiError::NotFound(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "detail": message }));
        (status, body).into_response()
    }
}
