//! Infrastructure layer: concrete providers, stores, and observability

pub mod cache;
pub mod embedding;
pub mod http_client;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod store;
