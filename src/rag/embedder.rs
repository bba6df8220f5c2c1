use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(String),
    #[error("embedding endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// Turns text into fixed-size vectors.
///
/// Built once at startup and shared by every session pipeline.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model(&self) -> &str;

    /// One vector per input, in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
#[derive(Clone)]
pub struct OpenAiCompatibleEmbedder {
    base_url: String,
    api_key: Option<String>,
    model: String,
    batch_size: usize,
    client: Client,
}

impl OpenAiCompatibleEmbedder {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        batch_size: usize,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            batch_size: batch_size.max(1),
            client,
        })
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.model,
            "input": inputs,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status { status, body });
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        parse_embeddings(&payload, inputs.len())
    }
}

#[async_trait]
impl Embedder for OpenAiCompatibleEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(inputs.len());
        for batch in inputs.chunks(self.batch_size) {
            embeddings.extend(self.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }
}

fn parse_embeddings(payload: &Value, expected: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let data = payload["data"].as_array().ok_or_else(|| {
        EmbeddingError::Malformed("Embedding response missing data array".to_string())
    })?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let index = item["index"].as_u64().map(|i| i as usize).unwrap_or(position);
        let values = item["embedding"].as_array().ok_or_else(|| {
            EmbeddingError::Malformed(
                "Embedding response item missing embedding array".to_string(),
            )
        })?;
        let vector = values
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| {
                EmbeddingError::Malformed("Embedding contains non-numeric value".to_string())
            })?;
        indexed.push((index, vector));
    }

    if indexed.len() != expected {
        return Err(EmbeddingError::Malformed(format!(
            "expected {} embeddings, got {}",
            expected,
            indexed.len()
        )));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}
