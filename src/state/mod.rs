use std::sync::Arc;
use std::time::Duration;

use crate::audit::EmailAuditLog;
use crate::core::config::AppConfig;
use crate::llm::OpenAiCompatibleProvider;
use crate::rag::{OpenAiCompatibleEmbedder, RagComponents, RagPipeline};
use crate::session::{InMemorySessionStore, SessionRegistry};

pub mod error;

use error::InitializationError;

/// Application state shared across all routes.
///
/// Contains:
/// - Resolved configuration
/// - The session registry
/// - Embedding and LLM clients shared by every pipeline
/// - The optional email audit log
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionRegistry,
    pub rag: Arc<RagComponents>,
    pub audit: EmailAuditLog,
}

impl AppState {
    /// Builds the embedding and LLM clients once, connects the audit
    /// database if configured and starts with an empty session store.
    pub async fn initialize(config: AppConfig) -> Result<Arc<Self>, InitializationError> {
        let timeout = Duration::from_secs(config.llm.timeout_secs);

        let embedder = OpenAiCompatibleEmbedder::new(
            config.embedding_base_url().to_string(),
            config.embedding_api_key().map(str::to_string),
            config.embedding.model.clone(),
            config.embedding.batch_size,
            timeout,
        )
        .map_err(|e| InitializationError::Embedder(e.into()))?;

        let llm = OpenAiCompatibleProvider::new(
            config.llm.base_url.clone(),
            config.llm.api_key.clone().unwrap_or_default(),
            config.llm.model.clone(),
            timeout,
        )
        .map_err(|e| InitializationError::Llm(e.into()))?;

        let rag = Arc::new(RagComponents {
            embedder: Arc::new(embedder),
            llm: Arc::new(llm),
            rag: config.rag.clone(),
            llm_config: config.llm.clone(),
        });

        let audit = EmailAuditLog::connect(config.audit.database_url.as_deref()).await;
        let sessions = SessionRegistry::new(Arc::new(InMemorySessionStore::<RagPipeline>::new()));

        Ok(Arc::new(Self::new(config, rag, sessions, audit)))
    }

    pub fn new(
        config: AppConfig,
        rag: Arc<RagComponents>,
        sessions: SessionRegistry,
        audit: EmailAuditLog,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sessions,
            rag,
            audit,
        }
    }

    pub fn new_pipeline(&self) -> RagPipeline {
        RagPipeline::new(self.rag.clone())
    }
}
