use serde::Serialize;

use super::service::RagService;
use super::store::ChunkSearchResult;
use crate::core::errors::ApiError;
use crate::llm::ChatRequest;

pub const FALLBACK_ANSWER: &str = "Error processing your request. Is Ollama running?";

/// Listed for chunks whose source metadata is empty.
pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
}

impl Answer {
    fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            sources: Vec::new(),
        }
    }
}

pub fn format_context(results: &[ChunkSearchResult]) -> String {
    results
        .iter()
        .map(|result| result.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Lines after the first carry an eight-space indent, blank lines included.
const PROMPT_INDENT: &str = "        ";

// Substituted in one pass so braces inside the context or question stay literal.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant. Use the following context to answer the question.\n\
         {i}If the answer is not in the context, say you don't know.\n\
         {i}\n\
         {i}Context:\n\
         {i}{context}\n\
         {i}\n\
         {i}Question: {question}\n\
         {i}Answer:",
        i = PROMPT_INDENT,
    )
}

/// Sources in retrieval order, each listed once.
pub fn distinct_sources(results: &[ChunkSearchResult]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for result in results {
        let source = result.chunk.metadata.source.as_str();
        let source = if source.is_empty() { UNKNOWN_SOURCE } else { source };
        if !sources.iter().any(|s| s == source) {
            sources.push(source.to_string());
        }
    }
    sources
}

impl RagService {
    /// Answers from the most similar chunks. Never fails: any retrieval or
    /// generation error is logged and replaced by [`FALLBACK_ANSWER`].
    pub async fn answer(&self, question: &str) -> Answer {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!("RAG error: {}", err);
                Answer::fallback()
            }
        }
    }

    pub async fn try_answer(&self, question: &str) -> Result<Answer, ApiError> {
        let results = self.retrieve(question).await?;
        let prompt = render_prompt(&format_context(&results), question);
        let request = ChatRequest::from_prompt(prompt).with_temperature(self.models.temperature);
        let answer = self
            .provider
            .chat(request, &self.models.chat_model)
            .await?;

        Ok(Answer {
            answer,
            sources: distinct_sources(&results),
        })
    }

    pub async fn retrieve(&self, question: &str) -> Result<Vec<ChunkSearchResult>, ApiError> {
        let embeddings = self
            .provider
            .embed(&[question.to_string()], &self.models.embedding_model)
            .await?;
        let query = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Internal("Embedding model returned no vector".to_string()))?;

        self.store.search(&query, self.top_k).await
    }
}
