//! Retrieval-augmented question answering over uploaded PDFs.
//!
//! - `ingest`: PDF bytes to embedded chunks in the store
//! - `answer`: question to prompt, model answer and sources
//! - `catalog`: distinct document names

pub mod answer;
pub mod atlas;
mod catalog;
mod ingest;
pub mod pdf;
mod service;
pub mod splitter;
pub mod sqlite;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use answer::{Answer, FALLBACK_ANSWER};
pub use ingest::{is_accepted_filename, ACCEPTED_EXTENSION};
pub use pdf::{LopdfExtractor, PageExtractor};
pub use service::{BackendStatus, RagService};
pub use splitter::{RecursiveTextSplitter, TextSplitter};
pub use store::{connect_store, ChunkMetadata, ChunkSearchResult, RagStore, StoredChunk};
