use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::rag::is_accepted_filename;
use crate::state::AppState;

pub const FILE_FIELD: &str = "file";

pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut multipart =
        multipart.map_err(|_| ApiError::BadRequest("No file part".to_string()))?;

    let limit = state.config.server.max_upload_bytes;
    let read_error = |err: MultipartError| upload_read_error(err, limit);

    let (filename, bytes) = loop {
        let Some(field) = multipart.next_field().await.map_err(read_error)? else {
            return Err(ApiError::BadRequest("No file part".to_string()));
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // A `file` part without a filename is a plain form value, not a file.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::BadRequest("No selected file".to_string()));
        }
        if !is_accepted_filename(&filename) {
            return Err(ApiError::BadRequest(
                "Only PDF files are supported in this MVP".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(read_error)?;
        break (filename, bytes);
    };

    let chunks = state
        .rag
        .process(bytes.to_vec(), &filename)
        .await
        .map_err(|err| {
            tracing::error!("Failed to process {}: {}", filename, err);
            ApiError::Internal(err.message().to_string())
        })?;

    Ok(Json(json!({
        "message": format!("Successfully processed {} into {} chunks.", filename, chunks)
    })))
}

fn upload_read_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(format!(
            "Upload exceeds the {} byte limit",
            limit
        ));
    }
    ApiError::BadRequest(format!("Failed to read upload: {}", err.body_text()))
}
