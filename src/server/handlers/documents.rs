use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::form::FormFields;
use crate::core::email::is_valid_email;
use crate::core::errors::{ApiError, RagError};
use crate::state::AppState;

pub const SESSION_NOT_FOUND: &str = "Session not found. Please upload a PDF first.";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub num_chunks: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

pub async fn upload_pdf(
    State(state): State<Arc<AppState>>,
    mut form: FormFields,
) -> Result<Json<UploadResponse>, ApiError> {
    let email = form
        .text("email")
        .filter(|email| !email.is_empty())
        .map(str::to_string);

    if let Some(email) = &email {
        if !is_valid_email(email) {
            return Err(ApiError::BadRequest("Invalid email format.".to_string()));
        }
    }

    let pdf = form
        .take_file("pdf")
        .ok_or_else(|| ApiError::BadRequest("Missing required field: pdf".to_string()))?;

    if let Some(email) = email {
        let audit = state.audit.clone();
        tokio::spawn(async move {
            audit.log_email(&email).await;
        });
    }

    tracing::info!(
        "Received {} ({} bytes)",
        pdf.file_name,
        pdf.data.len()
    );

    let mut pipeline = state.new_pipeline();
    let num_chunks = pipeline.ingest(pdf.data).await?;
    let session_id = state.sessions.create(pipeline);

    tracing::info!("Session {} created with {} chunks", session_id, num_chunks);
    Ok(Json(UploadResponse {
        session_id,
        num_chunks,
    }))
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<AskResponse>, ApiError> {
    let session_id = form.required_text("session_id")?;
    let query = form.required_text("query")?;

    let pipeline = state
        .sessions
        .get(session_id)
        .ok_or_else(|| RagError::NotFound(SESSION_NOT_FOUND.to_string()))?;

    let answer = pipeline.answer(query).await?;
    Ok(Json(AskResponse { answer }))
}
