pub mod defaults;
pub mod service;
pub mod validation;

pub use service::{
    AppConfig, AuditConfig, ConfigError, EmbeddingConfig, LlmConfig, LoggingConfig, RagConfig,
    ServerConfig,
};
