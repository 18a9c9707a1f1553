use super::types::AppConfig;
use crate::core::errors::ApiError;

pub fn validate_config(config: &AppConfig) -> Result<(), ApiError> {
    validate_required_string("database.uri", &config.database.uri)?;
    validate_required_string("database.name", &config.database.name)?;
    validate_required_string("database.collection", &config.database.collection)?;
    validate_required_string("database.index_name", &config.database.index_name)?;

    validate_required_string("server.bind", &config.server.bind)?;
    validate_usize_range(
        "server.max_upload_bytes",
        config.server.max_upload_bytes,
        1,
        usize::MAX,
    )?;

    validate_required_string("models.base_url", &config.models.base_url)?;
    validate_required_string("models.embedding_model", &config.models.embedding_model)?;
    validate_required_string("models.chat_model", &config.models.chat_model)?;
    if !(0.0..=2.0).contains(&config.models.temperature) {
        return Err(ApiError::BadRequest(
            "Invalid config at 'models.temperature': must be between 0 and 2".to_string(),
        ));
    }

    validate_usize_range("rag.chunk_size", config.rag.chunk_size, 1, 1_000_000)?;
    validate_usize_range("rag.top_k", config.rag.top_k, 1, 1_000)?;
    if config.rag.chunk_overlap >= config.rag.chunk_size {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at 'rag.chunk_overlap': must be smaller than rag.chunk_size ({})",
            config.rag.chunk_size
        )));
    }

    Ok(())
}

fn validate_required_string(path: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': value cannot be empty",
            path
        )));
    }
    Ok(())
}

fn validate_usize_range(path: &str, value: usize, min: usize, max: usize) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::BadRequest(format!(
            "Invalid config at '{}': must be between {} and {}",
            path, min, max
        )));
    }
    Ok(())
}
