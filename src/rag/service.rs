use std::sync::Arc;

use serde::Serialize;

use super::pdf::PageExtractor;
use super::splitter::{RecursiveTextSplitter, TextSplitter};
use super::store::RagStore;
use crate::core::config::{AppConfig, ModelConfig};
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;

/// Document ingestion, question answering and the document catalog over one
/// shared store and model provider.
///
/// Built once at start-up and shared by every request; all handles are
/// reference counted, so cloning is cheap.
#[derive(Clone)]
pub struct RagService {
    pub(super) store: Arc<dyn RagStore>,
    pub(super) provider: Arc<dyn LlmProvider>,
    pub(super) extractor: Arc<dyn PageExtractor>,
    pub(super) splitter: Arc<dyn TextSplitter>,
    pub(super) models: ModelConfig,
    pub(super) top_k: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    pub store_backend: String,
    pub store: bool,
    pub model_provider: String,
    pub model_backend: bool,
}

impl RagService {
    pub fn new(
        store: Arc<dyn RagStore>,
        provider: Arc<dyn LlmProvider>,
        extractor: Arc<dyn PageExtractor>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            provider,
            extractor,
            splitter: Arc::new(RecursiveTextSplitter::from_config(&config.rag)),
            models: config.models.clone(),
            top_k: config.rag.top_k,
        }
    }

    /// Replaces the default recursive splitter.
    pub fn with_splitter(mut self, splitter: Arc<dyn TextSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub async fn ping_store(&self) -> Result<(), ApiError> {
        self.store.ping().await
    }

    pub async fn status(&self) -> BackendStatus {
        let store = self.store.ping().await.is_ok();
        let model_backend = self.provider.health_check().await.unwrap_or(false);
        BackendStatus {
            store_backend: self.store.backend().to_string(),
            store,
            model_provider: self.provider.name().to_string(),
            model_backend,
        }
    }
}
