//! Per-document retrieval pipeline.
//!
//! A pipeline starts empty, is filled once by [`RagPipeline::ingest`] and is
//! read-only afterwards, so it can be shared between concurrent requests
//! behind an `Arc`.

use std::sync::Arc;

use serde::Serialize;

use super::embedder::Embedder;
use super::index::VectorIndex;
use super::loader::load_pdf_pages;
use super::splitter::{TextChunk, TextSplitter};
use crate::core::config::{LlmConfig, RagConfig};
use crate::core::errors::RagError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

pub const NO_DOCUMENT_MESSAGE: &str = "Please upload a PDF document first.";

const ANSWER_SYSTEM_PROMPT: &str = "Use the following pieces of context to answer the user's question.\n\
If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\
----------------";

/// Long-lived dependencies shared by every pipeline.
pub struct RagComponents {
    pub embedder: Arc<dyn Embedder>,
    pub llm: Arc<dyn LlmProvider>,
    pub rag: RagConfig,
    pub llm_config: LlmConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievedChunk {
    pub chunk: TextChunk,
    pub score: f32,
}

struct DocumentIndex {
    chunks: Vec<TextChunk>,
    vectors: VectorIndex,
}

pub struct RagPipeline {
    components: Arc<RagComponents>,
    splitter: TextSplitter,
    document: Option<DocumentIndex>,
}

impl RagPipeline {
    pub fn new(components: Arc<RagComponents>) -> Self {
        let splitter =
            TextSplitter::new(components.rag.chunk_size, components.rag.chunk_overlap);
        Self {
            components,
            splitter,
            document: None,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.document.as_ref().map_or(0, |doc| doc.chunks.len())
    }

    pub fn is_ingested(&self) -> bool {
        self.document.is_some()
    }

    /// Parse, split, embed and index a PDF. Returns the number of chunks.
    ///
    /// A PDF without extractable text is an ingestion error, reported with
    /// its own reason so it can be told apart from parse failures in logs.
    pub async fn ingest(&mut self, bytes: Vec<u8>) -> Result<usize, RagError> {
        let pages = tokio::task::spawn_blocking(move || load_pdf_pages(&bytes))
            .await
            .map_err(|e| RagError::Ingestion(format!("PDF loader task failed: {}", e)))??;

        let chunks = self.splitter.split_pages(&pages);
        if chunks.is_empty() {
            return Err(RagError::Ingestion(format!(
                "no extractable text in {} page(s)",
                pages.len()
            )));
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self
            .components
            .embedder
            .embed(&texts)
            .await
            .map_err(|e| RagError::Ingestion(e.to_string()))?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::Ingestion(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let vectors = VectorIndex::build(embeddings)?;
        let count = chunks.len();
        tracing::info!(
            "Indexed {} chunks from {} page(s) with {}",
            count,
            pages.len(),
            self.components.embedder.model()
        );

        self.document = Some(DocumentIndex { chunks, vectors });
        Ok(count)
    }

    /// Top-k chunks for `query`, best first. Empty before ingestion.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>, RagError> {
        let Some(document) = &self.document else {
            return Ok(Vec::new());
        };

        let query_embedding = self
            .components
            .embedder
            .embed(&[query.to_string()])
            .await
            .map_err(|e| RagError::Retrieval(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Retrieval("embedder returned no vector".to_string()))?;

        let hits = document
            .vectors
            .search(&query_embedding, self.components.rag.top_k)?;

        Ok(hits
            .into_iter()
            .filter_map(|(row, score)| {
                document.chunks.get(row).map(|chunk| RetrievedChunk {
                    chunk: chunk.clone(),
                    score,
                })
            })
            .collect())
    }

    pub async fn answer(&self, query: &str) -> Result<String, RagError> {
        if self.document.is_none() {
            return Ok(NO_DOCUMENT_MESSAGE.to_string());
        }

        let retrieved = self.retrieve(query).await?;
        let request = ChatRequest::new(build_messages(&retrieved, query))
            .with_config(&self.components.llm_config);

        tracing::debug!(
            "Asking {} with {} retrieved chunks",
            self.components.llm.model(),
            retrieved.len()
        );
        self.components.llm.chat(request).await
    }
}

fn build_messages(retrieved: &[RetrievedChunk], query: &str) -> Vec<ChatMessage> {
    let context = retrieved
        .iter()
        .map(|hit| hit.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    vec![
        ChatMessage::system(format!("{}\n{}", ANSWER_SYSTEM_PROMPT, context)),
        ChatMessage::user(query),
    ]
}
