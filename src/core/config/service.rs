use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::DEFAULT_CONFIG_FILE;
use super::types::AppConfig;
use super::validation::validate_config;
use crate::core::errors::ApiError;

const REDACT_PLACEHOLDER: &str = "****";

pub const CONFIG_PATH_ENV: &str = "RAGDOC_CONFIG_PATH";
pub const DATABASE_URI_ENV: &str = "MONGO_URI";
pub const PORT_ENV: &str = "PORT";
pub const LOG_DIR_ENV: &str = "RAGDOC_LOG_DIR";

#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn from_env() -> Self {
        let config_path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::new(config_path)
    }

    /// Reads the YAML file (if any), layers the environment on top and validates.
    pub fn load(&self) -> Result<AppConfig, ApiError> {
        self.load_with(|key| env::var(key).ok())
    }

    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = load_yaml_file(&self.config_path)?;
        apply_env_overrides(&mut config, lookup);
        validate_config(&config)?;
        Ok(config)
    }
}

fn load_yaml_file(path: &Path) -> Result<AppConfig, ApiError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ApiError::internal)?;
    if contents.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    serde_yaml::from_str::<AppConfig>(&contents).map_err(|err| {
        ApiError::BadRequest(format!(
            "Invalid config file '{}': {}",
            path.display(),
            err
        ))
    })
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup(DATABASE_URI_ENV) {
        let uri = uri.trim();
        if !uri.is_empty() {
            config.database.uri = uri.to_string();
        }
    }

    if let Some(port) = lookup(PORT_ENV).and_then(|val| val.trim().parse::<u16>().ok()) {
        let host = config
            .server
            .bind
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| config.server.bind.clone());
        config.server.bind = format!("{}:{}", host, port);
    }

    if let Some(dir) = lookup(LOG_DIR_ENV) {
        if !dir.trim().is_empty() {
            config.server.log_dir = PathBuf::from(dir.trim());
        }
    }
}

/// Masks the credentials of a connection string so it can be logged.
pub fn redact_uri(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    match authority.rsplit_once('@') {
        Some((_, host)) => format!("{}://{}@{}{}", scheme, REDACT_PLACEHOLDER, host, tail),
        None => uri.to_string(),
    }
}
