//! Ingestion endpoint handlers

use std::path::Path;

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, IngestDirectoryRequest, IngestRequest, IngestResponse, Json,
};

/// POST /v1/ingest
pub async fn ingest_document(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::bad_request("Content must not be empty").with_param("content"));
    }

    let chunks = state
        .ingestion
        .ingest_text(&request.content, request.metadata)
        .await?;

    info!(chunks, "document ingested");

    Ok(Json(IngestResponse::success(chunks)))
}

/// POST /v1/ingest/directory
pub async fn ingest_directory(
    State(state): State<AppState>,
    Json(request): Json<IngestDirectoryRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let chunks = state
        .ingestion
        .ingest_directory(Path::new(&request.path))
        .await?;

    info!(path = %request.path, chunks, "directory ingested");

    Ok(Json(IngestResponse::success(chunks)))
}
