use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::AppConfig;
use crate::llm::OllamaProvider;
use crate::rag::{connect_store, LopdfExtractor, RagService};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Holds the loaded configuration and the RAG service, which in turn owns
/// the vector store connection and the model client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub rag: RagService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Connects the vector store named by `database.uri` and wires the
    /// Ollama client and PDF extractor into a [`RagService`].
    ///
    /// The store is only opened here; reachability is checked separately at
    /// start-up so an offline cluster does not prevent the server from
    /// serving pages.
    pub async fn initialize(config: AppConfig) -> Result<Arc<Self>, InitializationError> {
        let store = connect_store(&config.database)
            .await
            .map_err(InitializationError::Store)?;
        let provider = Arc::new(OllamaProvider::new(config.models.base_url.clone()));
        let rag = RagService::new(store, provider, Arc::new(LopdfExtractor), &config);

        Ok(Self::from_parts(config, rag))
    }

    pub fn from_parts(config: AppConfig, rag: RagService) -> Arc<Self> {
        Arc::new(AppState {
            config: Arc::new(config),
            rag,
            started_at: Utc::now(),
        })
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
