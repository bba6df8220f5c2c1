use std::path::PathBuf;

pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8000
}

pub fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

pub fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

pub fn default_llm_base_url() -> String {
    DEFAULT_LLM_BASE_URL.to_string()
}

pub fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

pub fn default_temperature() -> f64 {
    0.0
}

pub fn default_timeout_secs() -> u64 {
    120
}

pub fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

pub fn default_batch_size() -> usize {
    64
}

pub fn default_chunk_size() -> usize {
    600
}

pub fn default_chunk_overlap() -> usize {
    100
}

pub fn default_top_k() -> usize {
    3
}

pub fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}
