use super::service::{AppConfig, ConfigError};

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_range("rag.chunk_size", config.rag.chunk_size, 1, 100_000)?;
    if config.rag.chunk_overlap >= config.rag.chunk_size {
        return Err(ConfigError::Invalid(format!(
            "rag.chunk_overlap ({}) must be less than rag.chunk_size ({})",
            config.rag.chunk_overlap, config.rag.chunk_size
        )));
    }
    validate_range("rag.top_k", config.rag.top_k, 1, 100)?;
    validate_range("embedding.batch_size", config.embedding.batch_size, 1, 2048)?;
    validate_range(
        "server.max_upload_bytes",
        config.server.max_upload_bytes,
        1024,
        1024 * 1024 * 1024,
    )?;

    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ConfigError::Invalid(format!(
            "llm.temperature must be between 0 and 2, got {}",
            config.llm.temperature
        )));
    }
    if config.llm.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "llm.timeout_secs must be positive".to_string(),
        ));
    }

    validate_url("llm.base_url", &config.llm.base_url)?;
    if let Some(url) = &config.embedding.base_url {
        validate_url("embedding.base_url", url)?;
    }

    Ok(())
}

fn validate_range(path: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid(format!(
            "{} must be between {} and {}, got {}",
            path, min, max, value
        )));
    }
    Ok(())
}

fn validate_url(path: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    Err(ConfigError::Invalid(format!(
        "{} must be an http(s) URL, got {:?}",
        path, value
    )))
}
