use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::defaults::*;
use super::validation::validate_config;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 5] = ["api_key", "secret", "password", "_token", "database_url"];

const SENSITIVE_WHITELIST: [&str; 1] = ["max_tokens"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEY is not set in the environment or .env file")]
    MissingApiKey,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
    pub audit: AuditConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Request body limit for uploads, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Embedding endpoint settings. Unset `base_url`/`api_key` fall back to the
/// LLM values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_embedding_model(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, the optional YAML file and the process environment.
    ///
    /// A missing API key is an error: the service cannot answer anything
    /// without it.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let path = config_path();
        Self::load_from(path.as_deref(), |key| env::var(key).ok())
    }

    pub fn load_from<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => load_yaml_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_env_overrides(lookup)?;

        if config.llm.api_key.as_deref().map_or(true, |key| key.trim().is_empty()) {
            return Err(ConfigError::MissingApiKey);
        }

        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = get("OPENROUTER_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = get("OPENROUTER_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = get("EMBEDDING_BASE_URL") {
            self.embedding.base_url = Some(url);
        }
        if let Some(model) = get("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(key) = get("EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(key);
        }
        if let Some(url) = get("DATABASE_URL") {
            self.audit.database_url = Some(url);
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", port)))?;
        }
        if let Some(dir) = get("RAGPDF_LOG_DIR") {
            self.logging.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn embedding_base_url(&self) -> &str {
        self.embedding
            .base_url
            .as_deref()
            .unwrap_or(&self.llm.base_url)
    }

    pub fn embedding_api_key(&self) -> Option<&str> {
        self.embedding
            .api_key
            .as_deref()
            .or(self.llm.api_key.as_deref())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Config as JSON with secrets masked, suitable for logging.
    pub fn redacted(&self) -> Value {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        redact_sensitive_values(&value)
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("RAGPDF_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    let local = PathBuf::from("config.yml");
    local.exists().then_some(local)
}

fn load_yaml_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    if SENSITIVE_WHITELIST
        .iter()
        .any(|allowed| *allowed == key_lower)
    {
        return false;
    }
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
}
