use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::RagError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// model identifier sent with every request
    fn model(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest) -> Result<String, RagError>;
}
