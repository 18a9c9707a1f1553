use super::service::RagService;

impl RagService {
    /// Every distinct document name in the store, sorted.
    ///
    /// A store failure is logged and reported as an empty catalog.
    pub async fn list_documents(&self) -> Vec<String> {
        match self.store.distinct_sources().await {
            Ok(mut sources) => {
                sources.sort();
                sources.dedup();
                sources
            }
            Err(err) => {
                tracing::error!("DB error: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn chunk_count(&self) -> Option<usize> {
        self.store.count().await.ok()
    }
}
