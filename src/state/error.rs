use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to initialize embedding client: {0}")]
    Embedder(#[source] anyhow::Error),

    #[error("Failed to initialize LLM client: {0}")]
    Llm(#[source] anyhow::Error),
}
