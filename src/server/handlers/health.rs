use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub const ROOT_MESSAGE: &str = "PDF Q&A API is running. Use /upload_pdf/ and /ask/ endpoints.";

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": ROOT_MESSAGE }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.len(),
        "audit_enabled": state.audit.is_enabled(),
        "llm_model": state.rag.llm.model(),
        "embedding_model": state.rag.embedder.model(),
    }))
}
