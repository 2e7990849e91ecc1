//! CrateDB-backed vector store
//!
//! Talks to CrateDB's HTTP `_sql` endpoint: vector search via `knn_match`,
//! idempotent writes via `ON CONFLICT` upserts. One instance is bound to a
//! single vector table; the key-value and interaction-log tables may be
//! shared between instances.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::resolver::InteractionRecord;
use crate::domain::store::{ScoredRecord, VectorRecord, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Table names one store instance operates on
#[derive(Debug, Clone)]
pub struct CrateDbTables {
    pub vector_table: String,
    pub kv_table: String,
    pub log_table: String,
}

impl CrateDbTables {
    pub fn new(
        vector_table: impl Into<String>,
        kv_table: impl Into<String>,
        log_table: impl Into<String>,
    ) -> Self {
        Self {
            vector_table: vector_table.into(),
            kv_table: kv_table.into(),
            log_table: log_table.into(),
        }
    }
}

/// Vector store over CrateDB's HTTP SQL endpoint
#[derive(Debug)]
pub struct CrateDbVectorStore<C: HttpClientTrait> {
    client: C,
    sql_url: String,
    tables: CrateDbTables,
    dimensions: usize,
}

impl<C: HttpClientTrait> CrateDbVectorStore<C> {
    pub fn new(
        client: C,
        base_url: impl Into<String>,
        tables: CrateDbTables,
        dimensions: usize,
    ) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            sql_url: format!("{}/_sql", base),
            tables,
            dimensions,
        }
    }

    async fn execute(
        &self,
        stmt: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, DomainError> {
        let body = serde_json::json!({ "stmt": stmt, "args": args });

        self.client
            .post_json(
                &self.sql_url,
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await
            .map_err(|e| DomainError::store_unavailable(e.to_string()))
    }

    fn rows(response: &serde_json::Value) -> Result<&Vec<serde_json::Value>, DomainError> {
        response
            .get("rows")
            .and_then(|rows| rows.as_array())
            .ok_or_else(|| DomainError::store_unavailable("malformed SQL response: missing rows"))
    }

    fn parse_metadata(value: &serde_json::Value) -> HashMap<String, serde_json::Value> {
        value
            .as_object()
            .map(|obj| obj.clone().into_iter().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStore for CrateDbVectorStore<C> {
    async fn put(&self, record: VectorRecord, embedding: Vec<f32>) -> Result<(), DomainError> {
        let stmt = format!(
            "INSERT INTO {} (id, content, metadata, embedding) VALUES (?, ?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET content = excluded.content, \
             metadata = excluded.metadata, embedding = excluded.embedding",
            self.tables.vector_table
        );

        self.execute(
            &stmt,
            vec![
                serde_json::json!(record.id),
                serde_json::json!(record.content),
                serde_json::json!(record.metadata),
                serde_json::json!(embedding),
            ],
        )
        .await?;

        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredRecord>, DomainError> {
        let stmt = format!(
            "SELECT id, content, metadata, _score FROM {} \
             WHERE knn_match(embedding, ?, ?) ORDER BY _score DESC LIMIT ?",
            self.tables.vector_table
        );

        let response = self
            .execute(
                &stmt,
                vec![
                    serde_json::json!(embedding),
                    serde_json::json!(k),
                    serde_json::json!(k),
                ],
            )
            .await?;

        let rows = Self::rows(&response)?;

        let results = rows
            .iter()
            .filter_map(|row| {
                let columns = row.as_array()?;
                let id = columns.first()?.as_str()?.to_string();
                let content = columns.get(1)?.as_str()?.to_string();
                let metadata = Self::parse_metadata(columns.get(2)?);
                let score = columns.get(3)?.as_f64()? as f32;

                Some(ScoredRecord::new(
                    VectorRecord::new(id, content).with_all_metadata(metadata),
                    score,
                ))
            })
            .collect();

        Ok(results)
    }

    async fn exact_get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let stmt = format!("SELECT value FROM {} WHERE key = ?", self.tables.kv_table);

        let response = self.execute(&stmt, vec![serde_json::json!(key)]).await?;
        let rows = Self::rows(&response)?;

        Ok(rows
            .first()
            .and_then(|row| row.as_array())
            .and_then(|columns| columns.first())
            .and_then(|value| value.as_str())
            .map(|value| value.to_string()))
    }

    async fn exact_put(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let stmt = format!(
            "INSERT INTO {} (key, value) VALUES (?, ?) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            self.tables.kv_table
        );

        self.execute(
            &stmt,
            vec![serde_json::json!(key), serde_json::json!(value)],
        )
        .await?;

        Ok(())
    }

    async fn append_log(&self, record: &InteractionRecord) -> Result<(), DomainError> {
        let stmt = format!(
            "INSERT INTO {} (query, response, process_time, cache_type, timestamp) \
             VALUES (?, ?, ?, ?, ?)",
            self.tables.log_table
        );

        self.execute(
            &stmt,
            vec![
                serde_json::json!(record.query()),
                serde_json::json!(record.answer()),
                serde_json::json!(record.latency_seconds()),
                serde_json::json!(record.cache_tier().as_str()),
                serde_json::json!(record.timestamp().to_rfc3339()),
            ],
        )
        .await?;

        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        let statements = [
            format!(
                "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, content TEXT, \
                 metadata OBJECT(DYNAMIC), embedding FLOAT_VECTOR({}))",
                self.tables.vector_table, self.dimensions
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, value TEXT)",
                self.tables.kv_table
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {} (query TEXT, response TEXT, \
                 process_time DOUBLE PRECISION, cache_type TEXT, \
                 timestamp TIMESTAMP WITH TIME ZONE)",
                self.tables.log_table
            ),
        ];

        for stmt in &statements {
            self.execute(stmt, vec![]).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::CacheTier;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const SQL_URL: &str = "http://cratedb.local:4200/_sql";

    fn tables() -> CrateDbTables {
        CrateDbTables::new("documents", "llm_cache", "interactions")
    }

    fn ok_response() -> serde_json::Value {
        serde_json::json!({ "cols": [], "rows": [], "rowcount": 1, "duration": 0.1 })
    }

    #[tokio::test]
    async fn test_put_issues_upsert() {
        let client = MockHttpClient::new().with_response(SQL_URL, ok_response());
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200", tables(), 3);

        store
            .put(VectorRecord::new("doc-1", "content"), vec![0.1, 0.2, 0.3])
            .await
            .unwrap();

        let requests = store.client.requests();
        let stmt = requests[0].1["stmt"].as_str().unwrap();
        assert!(stmt.contains("INSERT INTO documents"));
        assert!(stmt.contains("ON CONFLICT (id) DO UPDATE"));
    }

    #[tokio::test]
    async fn test_search_parses_rows() {
        let response = serde_json::json!({
            "cols": ["id", "content", "metadata", "_score"],
            "rows": [
                ["doc-1", "CrateDB is a database.", {"source": "docs"}, 0.93],
                ["doc-2", "Unrelated.", {}, 0.52]
            ],
            "rowcount": 2
        });

        let client = MockHttpClient::new().with_response(SQL_URL, response);
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200/", tables(), 3);

        let results = store.search(&[0.1, 0.2, 0.3], 4).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.id, "doc-1");
        assert!((results[0].score - 0.93).abs() < 0.001);
        assert_eq!(
            results[0].record.metadata.get("source"),
            Some(&serde_json::json!("docs"))
        );
    }

    #[tokio::test]
    async fn test_exact_get_returns_first_row() {
        let response = serde_json::json!({
            "cols": ["value"],
            "rows": [["cached answer"]],
            "rowcount": 1
        });

        let client = MockHttpClient::new().with_response(SQL_URL, response);
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200", tables(), 3);

        let value = store.exact_get("what is cratedb?").await.unwrap();
        assert_eq!(value, Some("cached answer".to_string()));
    }

    #[tokio::test]
    async fn test_exact_get_empty_rows_is_none() {
        let client = MockHttpClient::new().with_response(SQL_URL, ok_response());
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200", tables(), 3);

        let value = store.exact_get("missing").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_append_log_uses_interaction_columns() {
        let client = MockHttpClient::new().with_response(SQL_URL, ok_response());
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200", tables(), 3);

        let record = InteractionRecord::new("q", "a", 0.42, CacheTier::Semantic);
        store.append_log(&record).await.unwrap();

        let requests = store.client.requests();
        let stmt = requests[0].1["stmt"].as_str().unwrap();
        assert!(stmt.contains("INSERT INTO interactions"));
        assert_eq!(requests[0].1["args"][3], "semantic");
    }

    #[tokio::test]
    async fn test_unreachable_store_maps_to_store_unavailable() {
        let client = MockHttpClient::new().with_error(SQL_URL, "connection refused");
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200", tables(), 3);

        let result = store.exact_get("key").await;
        assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_ensure_schema_creates_all_tables() {
        let client = MockHttpClient::new().with_response(SQL_URL, ok_response());
        let store =
            CrateDbVectorStore::new(client, "http://cratedb.local:4200", tables(), 768);

        store.ensure_schema().await.unwrap();

        let requests = store.client.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].1["stmt"]
            .as_str()
            .unwrap()
            .contains("FLOAT_VECTOR(768)"));
    }
}
