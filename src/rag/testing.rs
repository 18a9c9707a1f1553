//! In-memory doubles for the store, model provider and extractor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::pdf::PageExtractor;
use super::service::RagService;
use super::store::{ChunkSearchResult, RagStore, StoredChunk};
use crate::core::config::AppConfig;
use crate::core::errors::ApiError;
use crate::llm::{ChatRequest, LlmProvider};
use crate::vector_math::rank_descending_by_cosine;

#[derive(Default)]
pub struct MemoryStore {
    pub items: Mutex<Vec<(StoredChunk, Vec<f32>)>>,
    pub batch_calls: AtomicUsize,
    pub fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn chunks(&self) -> Vec<StoredChunk> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .map(|(chunk, _)| chunk.clone())
            .collect()
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.fail {
            Err(ApiError::Internal("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RagStore for MemoryStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn insert_batch(&self, items: Vec<(StoredChunk, Vec<f32>)>) -> Result<(), ApiError> {
        self.check()?;
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().extend(items);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, ApiError> {
        self.check()?;
        let items = self.items.lock().unwrap();
        let embeddings: Vec<Vec<f32>> = items.iter().map(|(_, e)| e.clone()).collect();
        Ok(rank_descending_by_cosine(query_embedding, &embeddings)
            .into_iter()
            .take(limit)
            .map(|(idx, score)| ChunkSearchResult {
                chunk: items[idx].0.clone(),
                score,
            })
            .collect())
    }

    async fn distinct_sources(&self) -> Result<Vec<String>, ApiError> {
        self.check()?;
        let mut sources: Vec<String> = Vec::new();
        for (chunk, _) in self.items.lock().unwrap().iter() {
            if !sources.contains(&chunk.metadata.source) {
                sources.push(chunk.metadata.source.clone());
            }
        }
        Ok(sources)
    }

    async fn count(&self) -> Result<usize, ApiError> {
        self.check()?;
        Ok(self.items.lock().unwrap().len())
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.check()
    }
}

/// Embeds every text as the same unit vector, so search keeps insertion order.
#[derive(Default)]
pub struct FakeProvider {
    pub prompts: Mutex<Vec<ChatRequest>>,
    pub embed_calls: AtomicUsize,
    pub unreachable: bool,
    pub panics: bool,
    pub answer: String,
}

impl FakeProvider {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    /// Embeds normally, then panics inside `chat`.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Default::default()
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .and_then(|request| request.messages.last())
            .map(|message| message.content.clone())
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(!self.unreachable)
    }

    async fn chat(&self, request: ChatRequest, _model_id: &str) -> Result<String, ApiError> {
        if self.unreachable {
            return Err(ApiError::Internal("connection refused".to_string()));
        }
        if self.panics {
            panic!("model client crashed");
        }
        self.prompts.lock().unwrap().push(request);
        Ok(self.answer.clone())
    }

    async fn embed(&self, inputs: &[String], _model_id: &str) -> Result<Vec<Vec<f32>>, ApiError> {
        if self.unreachable {
            return Err(ApiError::Internal("connection refused".to_string()));
        }
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

/// Returns the configured page texts regardless of the input bytes.
pub struct FakeExtractor {
    pub pages: Vec<String>,
}

impl FakeExtractor {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl PageExtractor for FakeExtractor {
    fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, ApiError> {
        Ok(self.pages.clone())
    }
}

pub struct Harness {
    pub service: RagService,
    pub store: Arc<MemoryStore>,
    pub provider: Arc<FakeProvider>,
}

pub fn harness(store: MemoryStore, provider: FakeProvider, extractor: FakeExtractor) -> Harness {
    let store = Arc::new(store);
    let provider = Arc::new(provider);
    let service = RagService::new(
        store.clone(),
        provider.clone(),
        Arc::new(extractor),
        &AppConfig::default(),
    );
    Harness {
        service,
        store,
        provider,
    }
}
