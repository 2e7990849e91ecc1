//! Query and ingestion request/response shapes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Resolution;

/// POST /v1/query request
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// POST /v1/query response
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub metadata: Vec<HashMap<String, serde_json::Value>>,
}

impl From<Resolution> for QueryResponse {
    fn from(resolution: Resolution) -> Self {
        Self {
            answer: resolution.answer,
            sources: resolution.sources,
            metadata: resolution.source_metadata,
        }
    }
}

/// POST /v1/ingest request
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub content: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// POST /v1/ingest/directory request
#[derive(Debug, Clone, Deserialize)]
pub struct IngestDirectoryRequest {
    pub path: String,
}

/// Ingestion response
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub status: String,
    pub chunks: usize,
}

impl IngestResponse {
    pub fn success(chunks: usize) -> Self {
        Self {
            status: "success".to_string(),
            chunks,
        }
    }
}
