//! Application state for shared services

use std::sync::Arc;

use crate::domain::store::VectorStore;
use crate::domain::QueryResolver;
use crate::infrastructure::ingestion::IngestionService;

/// Shared services handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QueryResolver>,
    pub ingestion: Arc<IngestionService>,
    /// Document store handle, used by readiness checks
    pub store: Arc<dyn VectorStore>,
}

impl AppState {
    pub fn new(
        resolver: Arc<QueryResolver>,
        ingestion: Arc<IngestionService>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            resolver,
            ingestion,
            store,
        }
    }
}
