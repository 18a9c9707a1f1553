use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.rag.status().await;
    Json(json!({
        "status": "ok",
        "store": status.store,
        "store_backend": status.store_backend,
        "model_backend": status.model_backend,
        "model_provider": status.model_provider,
        "chunks": state.rag.chunk_count().await,
        "uptime_secs": state.uptime_secs()
    }))
}
