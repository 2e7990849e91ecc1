//! v1 API endpoints

pub mod ingest;
pub mod query;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create the v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::resolve_query))
        .route("/ingest", post(ingest::ingest_document))
        .route("/ingest/directory", post(ingest::ingest_directory))
}
