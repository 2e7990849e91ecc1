//! Document ingestion: chunking and storage

mod recursive;
mod service;

pub use recursive::RecursiveChunker;
pub use service::IngestionService;
