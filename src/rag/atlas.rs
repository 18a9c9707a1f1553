//! MongoDB Atlas vector search store.
//!
//! One document per chunk:
//! `{ _id, text, embedding: [f64], metadata: { source, page } }`, searched
//! through the `$vectorSearch` stage against a named Atlas index.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Collection};

use super::store::{ChunkMetadata, ChunkSearchResult, RagStore, StoredChunk};
use crate::core::config::DatabaseConfig;
use crate::core::errors::ApiError;

/// Candidates scanned by the ANN search per requested result.
const CANDIDATE_MULTIPLIER: usize = 10;

pub struct AtlasRagStore {
    client: Client,
    collection: Collection<Document>,
    index_name: String,
}

impl AtlasRagStore {
    /// Builds the client; the driver connects lazily on first use.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ApiError> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(ApiError::internal)?;
        let collection = client
            .database(&config.name)
            .collection::<Document>(&config.collection);

        Ok(Self {
            client,
            collection,
            index_name: config.index_name.clone(),
        })
    }

    fn chunk_to_document(chunk: &StoredChunk, embedding: &[f32]) -> Document {
        let vector: Vec<f64> = embedding.iter().map(|v| f64::from(*v)).collect();
        doc! {
            "_id": chunk.chunk_id.as_str(),
            "text": chunk.text.as_str(),
            "embedding": vector,
            "metadata": {
                "source": chunk.metadata.source.as_str(),
                "page": i64::from(chunk.metadata.page),
            },
        }
    }

    fn document_to_result(document: &Document) -> Option<ChunkSearchResult> {
        let text = document.get_str("text").ok()?.to_string();
        let metadata = document.get_document("metadata").ok();
        let source = metadata
            .and_then(|m| m.get_str("source").ok())
            .unwrap_or_default()
            .to_string();
        let page = metadata
            .and_then(|m| m.get("page"))
            .and_then(bson_to_page)
            .unwrap_or(0);
        let chunk_id = match document.get("_id") {
            Some(Bson::String(id)) => id.clone(),
            Some(Bson::ObjectId(id)) => id.to_hex(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let score = document.get_f64("score").unwrap_or(0.0) as f32;

        Some(ChunkSearchResult {
            chunk: StoredChunk {
                chunk_id,
                text,
                metadata: ChunkMetadata { source, page },
            },
            score,
        })
    }

    fn search_pipeline(&self, query_embedding: &[f32], limit: usize) -> Vec<Document> {
        let query_vector: Vec<f64> = query_embedding.iter().map(|v| f64::from(*v)).collect();
        let limit = limit.max(1);
        vec![
            doc! {
                "$vectorSearch": {
                    "index": self.index_name.as_str(),
                    "path": "embedding",
                    "queryVector": query_vector,
                    "numCandidates": (limit * CANDIDATE_MULTIPLIER) as i64,
                    "limit": limit as i64,
                }
            },
            doc! { "$set": { "score": { "$meta": "vectorSearchScore" } } },
            doc! { "$project": { "embedding": 0 } },
        ]
    }
}

fn bson_to_page(value: &Bson) -> Option<u32> {
    match value {
        Bson::Int32(v) => u32::try_from(*v).ok(),
        Bson::Int64(v) => u32::try_from(*v).ok(),
        Bson::Double(v) if *v >= 1.0 => Some(*v as u32),
        _ => None,
    }
}

#[async_trait]
impl RagStore for AtlasRagStore {
    fn backend(&self) -> &str {
        "mongodb-atlas"
    }

    async fn insert_batch(&self, items: Vec<(StoredChunk, Vec<f32>)>) -> Result<(), ApiError> {
        if items.is_empty() {
            return Ok(());
        }

        let documents: Vec<Document> = items
            .iter()
            .map(|(chunk, embedding)| Self::chunk_to_document(chunk, embedding))
            .collect();

        self.collection
            .insert_many(documents)
            .await
            .map_err(ApiError::internal)?;
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, ApiError> {
        let cursor = self
            .collection
            .aggregate(self.search_pipeline(query_embedding, limit))
            .await
            .map_err(ApiError::internal)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(ApiError::internal)?;

        Ok(documents
            .iter()
            .filter_map(Self::document_to_result)
            .collect())
    }

    async fn distinct_sources(&self) -> Result<Vec<String>, ApiError> {
        let values = self
            .collection
            .distinct("metadata.source", doc! {})
            .await
            .map_err(ApiError::internal)?;

        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(source) => Some(source),
                _ => None,
            })
            .collect())
    }

    async fn count(&self) -> Result<usize, ApiError> {
        let count = self
            .collection
            .count_documents(doc! {})
            .await
            .map_err(ApiError::internal)?;
        Ok(count as usize)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(ApiError::internal)?;
        Ok(())
    }
}
