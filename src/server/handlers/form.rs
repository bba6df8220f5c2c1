use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Form;

use crate::core::errors::ApiError;

pub const UPLOAD_TOO_LARGE: &str = "Uploaded file is too large.";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Raw fields of a form post, accepted as either `multipart/form-data` or
/// `application/x-www-form-urlencoded`.
#[derive(Debug, Default)]
pub struct FormFields {
    pub text: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl FormFields {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    pub fn required_text(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {}", name)))
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Form(text) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        Ok(FormFields {
            text,
            files: HashMap::new(),
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut fields = FormFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let data = field
                .bytes()
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            fields.files.insert(
                name,
                UploadedFile {
                    file_name,
                    data: data.to_vec(),
                },
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            fields.text.insert(name, value);
        }
    }

    Ok(fields)
}

/// Body-limit hits keep their 413; every other form failure is a 400.
fn rejection(status: StatusCode, body_text: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(UPLOAD_TOO_LARGE.to_string())
    } else {
        ApiError::BadRequest(body_text)
    }
}
