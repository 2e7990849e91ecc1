//! Document ingestion pipeline: split, embed, store

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy};
use crate::domain::store::{VectorRecord, VectorStore};
use crate::domain::DomainError;

/// Splits raw documents into chunks, embeds them, and stores them in the
/// document store
#[derive(Debug)]
pub struct IngestionService {
    store: Arc<dyn VectorStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn ChunkingStrategy>,
    config: ChunkingConfig,
}

impl IngestionService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        chunker: Arc<dyn ChunkingStrategy>,
        config: ChunkingConfig,
    ) -> Self {
        Self {
            store,
            embeddings,
            chunker,
            config,
        }
    }

    /// Ingest a single text, returning the number of stored chunks
    pub async fn ingest_text(
        &self,
        content: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<usize, DomainError> {
        let chunks = self.chunker.chunk(content, &self.config)?;

        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embeddings.embed_batch(&texts).await?;

        for (chunk, embedding) in chunks.into_iter().zip(embeddings) {
            let mut record = VectorRecord::new(Uuid::new_v4().to_string(), chunk.content)
                .with_metadata("chunk_index", serde_json::json!(chunk.index));

            if let Some(ref metadata) = metadata {
                for (key, value) in metadata {
                    record = record.with_metadata(key.clone(), value.clone());
                }
            }

            self.store.put(record, embedding).await?;
        }

        let count = texts.len();
        info!(chunks = count, "ingested document");

        Ok(count)
    }

    /// Ingest every `.txt` file under a directory, returning the total number
    /// of stored chunks
    pub async fn ingest_directory(&self, directory: &Path) -> Result<usize, DomainError> {
        let mut entries = tokio::fs::read_dir(directory).await.map_err(|e| {
            DomainError::validation(format!("cannot read directory {}: {}", directory.display(), e))
        })?;

        let mut total = 0;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::internal(format!("directory walk failed: {}", e)))?
        {
            let path = entry.path();

            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }

            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                DomainError::internal(format!("cannot read {}: {}", path.display(), e))
            })?;

            let source = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("unknown")
                .to_string();

            let metadata =
                HashMap::from([("source".to_string(), serde_json::json!(source))]);

            total += self.ingest_text(&content, Some(metadata)).await?;
        }

        info!(directory = %directory.display(), chunks = total, "ingested directory");

        Ok(total)
    }
}
