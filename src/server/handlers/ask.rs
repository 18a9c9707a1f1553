use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use futures_util::FutureExt;
use serde_json::Value;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Reads the JSON body by hand so a missing content type or malformed body
/// gets the same answer as a missing query.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let query = parse_query(&body)
        .ok_or_else(|| ApiError::BadRequest("No query provided".to_string()))?;

    let answer = AssertUnwindSafe(state.rag.answer(&query))
        .catch_unwind()
        .await
        .map_err(|_| {
            tracing::error!("Answering '{}' panicked", query);
            ApiError::Internal("Error processing request".to_string())
        })?;

    Ok(Json(answer))
}

fn parse_query(body: &[u8]) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    let query = payload.get("query")?.as_str()?;
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}
