//! Retrieval-augmented generation over uploaded PDFs.
//!
//! This module provides:
//! - `loader`: PDF bytes to per-page text
//! - `TextSplitter`: recursive character chunking with overlap
//! - `Embedder`: text to vectors through a hosted endpoint
//! - `VectorIndex`: cosine nearest-neighbour search
//! - `RagPipeline`: ingestion and question answering for one document

mod embedder;
mod index;
mod loader;
mod pipeline;
mod splitter;

#[cfg(test)]
pub(crate) mod testing;

pub use embedder::{Embedder, EmbeddingError, OpenAiCompatibleEmbedder};
pub use index::VectorIndex;
pub use loader::{load_pdf_pages, load_pdf_pages_in, PageText};
pub use pipeline::{RagComponents, RagPipeline, RetrievedChunk, NO_DOCUMENT_MESSAGE};
pub use splitter::{TextChunk, TextSplitter};
