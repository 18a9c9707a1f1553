//! SQLite-backed RAG store implementation.
//!
//! In-process vector store using SQLite for chunk rows and
//! brute-force cosine similarity for search.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::store::{ChunkMetadata, ChunkSearchResult, RagStore, StoredChunk};
use crate::core::errors::ApiError;
use crate::vector_math::rank_descending_by_cosine;

pub struct SqliteRagStore {
    pool: SqlitePool,
}

impl SqliteRagStore {
    /// Opens a store from a `sqlite:` connection string.
    pub async fn connect(uri: &str) -> Result<Self, ApiError> {
        let in_memory = uri.contains(":memory:") || uri.contains("mode=memory");
        let options = SqliteConnectOptions::from_str(uri)
            .map_err(ApiError::internal)?
            .create_if_missing(true);

        // Every in-memory connection is its own database, so keep exactly one.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None::<std::time::Duration>)
                .max_lifetime(None::<std::time::Duration>)
        } else {
            SqlitePoolOptions::new().min_connections(1).max_connections(4)
        };

        let options = if in_memory {
            options
        } else {
            options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(ApiError::internal)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn with_path(db_path: &Path) -> Result<Self, ApiError> {
        Self::connect(&format!("sqlite://{}", db_path.display())).await
    }

    async fn init_schema(&self) -> Result<(), ApiError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS rag_chunks (
                chunk_id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                source TEXT NOT NULL,
                page INTEGER NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_rag_source ON rag_chunks(source)")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(())
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn row_to_chunk(row: &sqlx::sqlite::SqliteRow) -> StoredChunk {
        let page: i64 = row.get("page");
        StoredChunk {
            chunk_id: row.get("chunk_id"),
            text: row.get("text"),
            metadata: ChunkMetadata {
                source: row.get("source"),
                page: u32::try_from(page).unwrap_or(0),
            },
        }
    }
}

#[async_trait]
impl RagStore for SqliteRagStore {
    fn backend(&self) -> &str {
        "sqlite"
    }

    async fn insert_batch(&self, items: Vec<(StoredChunk, Vec<f32>)>) -> Result<(), ApiError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(ApiError::internal)?;

        for (chunk, embedding) in &items {
            let blob = Self::serialize_embedding(embedding);

            sqlx::query(
                "INSERT INTO rag_chunks (chunk_id, text, source, page, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&chunk.chunk_id)
            .bind(&chunk.text)
            .bind(&chunk.metadata.source)
            .bind(i64::from(chunk.metadata.page))
            .bind(&blob)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::internal)?;
        }

        tx.commit().await.map_err(ApiError::internal)?;
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, ApiError> {
        let rows = sqlx::query(
            "SELECT chunk_id, text, source, page, embedding
             FROM rag_chunks
             ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        let embeddings: Vec<Vec<f32>> = rows
            .iter()
            .map(|row| {
                let bytes: Vec<u8> = row.get("embedding");
                Self::deserialize_embedding(&bytes)
            })
            .collect();

        Ok(rank_descending_by_cosine(query_embedding, &embeddings)
            .into_iter()
            .take(limit.max(1))
            .map(|(idx, score)| ChunkSearchResult {
                chunk: Self::row_to_chunk(&rows[idx]),
                score,
            })
            .collect())
    }

    async fn distinct_sources(&self) -> Result<Vec<String>, ApiError> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT source FROM rag_chunks ORDER BY source")
            .fetch_all(&self.pool)
            .await
            .map_err(ApiError::internal)
    }

    async fn count(&self) -> Result<usize, ApiError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rag_chunks")
            .fetch_one(&self.pool)
            .await
            .map_err(ApiError::internal)?;

        Ok(count as usize)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(ApiError::internal)?;
        Ok(())
    }
}
