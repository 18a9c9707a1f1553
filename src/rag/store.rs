//! RagStore trait — abstract interface for chunk storage backends.
//!
//! The production backend is MongoDB Atlas vector search (`atlas` module);
//! `sqlite` provides an in-process store for local runs and tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::atlas::AtlasRagStore;
use super::sqlite::SqliteRagStore;
use crate::core::config::{redact_uri, DatabaseConfig};
use crate::core::errors::ApiError;

/// Provenance attached to every chunk at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Uploaded filename of the document the chunk came from.
    pub source: String,
    /// 1-based page number.
    pub page: u32,
}

/// A stored chunk. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub chunk_id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl StoredChunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            chunk_id: Uuid::new_v4().to_string(),
            text: text.into(),
            metadata: ChunkMetadata {
                source: source.into(),
                page,
            },
        }
    }
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSearchResult {
    pub chunk: StoredChunk,
    /// Similarity score (higher = better).
    pub score: f32,
}

/// Abstract trait for vector storage backends.
#[async_trait]
pub trait RagStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &str;

    /// Insert all chunks with their embedding vectors in one round trip.
    ///
    /// No atomicity is promised: a failed batch may leave a subset written.
    async fn insert_batch(&self, items: Vec<(StoredChunk, Vec<f32>)>) -> Result<(), ApiError>;

    /// Nearest chunks to the query embedding, in the backend's ranking order.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, ApiError>;

    /// Distinct `metadata.source` values across all stored chunks.
    async fn distinct_sources(&self) -> Result<Vec<String>, ApiError>;

    /// Total number of stored chunks.
    async fn count(&self) -> Result<usize, ApiError>;

    /// Round trip to the backend to confirm it is reachable.
    async fn ping(&self) -> Result<(), ApiError>;
}

/// Opens the store named by the connection string scheme.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn RagStore>, ApiError> {
    let uri = config.uri.trim();
    if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
        Ok(Arc::new(AtlasRagStore::connect(config).await?))
    } else if uri.starts_with("sqlite:") {
        Ok(Arc::new(SqliteRagStore::connect(uri).await?))
    } else {
        Err(ApiError::BadRequest(format!(
            "Unsupported database URI '{}': expected mongodb://, mongodb+srv:// or sqlite:",
            redact_uri(uri)
        )))
    }
}
