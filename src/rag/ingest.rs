use super::service::RagService;
use super::store::StoredChunk;
use crate::core::errors::ApiError;

/// Uploads are accepted only when the filename ends with this suffix.
pub const ACCEPTED_EXTENSION: &str = ".pdf";

pub fn is_accepted_filename(filename: &str) -> bool {
    filename.ends_with(ACCEPTED_EXTENSION)
}

impl RagService {
    /// Extracts, chunks, embeds and stores one document.
    ///
    /// Returns the number of chunks written; 0 when no page had text, in
    /// which case neither the model nor the store is contacted.
    pub async fn process(&self, bytes: Vec<u8>, filename: &str) -> Result<usize, ApiError> {
        let extractor = self.extractor.clone();
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
            .await
            .map_err(ApiError::internal)??;

        let chunks = self.chunk_pages(&pages, filename);
        if chunks.is_empty() {
            tracing::info!("No extractable text in {}", filename);
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = self
            .provider
            .embed(&texts, &self.models.embedding_model)
            .await?;
        if embeddings.len() != chunks.len() {
            return Err(ApiError::Internal(format!(
                "Embedding model returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let count = chunks.len();
        self.store
            .insert_batch(chunks.into_iter().zip(embeddings).collect())
            .await?;

        tracing::info!("Uploaded {} chunks for {}", count, filename);
        Ok(count)
    }

    /// Splits every non-blank page, tagging chunks with filename and 1-based page.
    pub(crate) fn chunk_pages(&self, pages: &[String], filename: &str) -> Vec<StoredChunk> {
        pages
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .flat_map(|(index, text)| {
                let page = index as u32 + 1;
                self.splitter
                    .split_text(text)
                    .into_iter()
                    .map(move |chunk| StoredChunk::new(chunk, filename, page))
            })
            .collect()
    }
}
