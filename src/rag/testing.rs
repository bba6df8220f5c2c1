//! Deterministic stand-ins for the hosted embedding and chat endpoints.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

pub use super::loader::fixtures::pdf_with_pages;

use super::embedder::{Embedder, EmbeddingError};
use super::pipeline::RagComponents;
use crate::core::config::{LlmConfig, RagConfig};
use crate::core::errors::RagError;
use crate::llm::{ChatRequest, LlmProvider};

const HASH_DIM: usize = 256;

/// Bag-of-words embedder: each lowercase word bumps one FNV-1a bucket.
pub struct HashEmbedder;

#[async_trait]
impl Embedder for HashEmbedder {
    fn model(&self) -> &str {
        "hash-bow"
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(inputs.iter().map(|text| bag_of_words(text)).collect())
    }
}

fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; HASH_DIM];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in word.to_lowercase().bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        vector[(hash % HASH_DIM as u64) as usize] += 1.0;
    }
    vector
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn model(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Status {
            status: 500,
            body: "embedding backend down".to_string(),
        })
    }
}

/// Chat provider returning a fixed reply and recording every request.
pub struct ScriptedLlm {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, RagError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.reply.clone().map_err(RagError::UpstreamModel)
    }
}

pub fn components_with(
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LlmProvider>,
) -> Arc<RagComponents> {
    Arc::new(RagComponents {
        embedder,
        llm,
        rag: RagConfig::default(),
        llm_config: LlmConfig::default(),
    })
}
