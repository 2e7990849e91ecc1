use serde::Deserialize;

use crate::domain::ingestion::ChunkingConfig;
use crate::domain::DomainError;
use crate::infrastructure::llm::LlmProviderConfig;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Language model selection and generation settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(flatten)]
    pub provider: LlmProviderConfig,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderConfig::default(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    /// Base URL of the text-embeddings endpoint
    pub endpoint: String,
    /// Embedding vector dimensions, used for store schemas
    pub dimensions: usize,
}

/// Persistence backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Cratedb,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// CrateDB HTTP endpoint
    pub url: String,
    pub documents_table: String,
    pub cache_table: String,
    pub semantic_cache_table: String,
    pub interactions_table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Minimum similarity for a semantic cache hit (0.0 to 1.0)
    pub semantic_threshold: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Number of context documents retrieved per query
    pub top_k: usize,
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8081".to_string(),
            dimensions: 384,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: "http://localhost:4200".to_string(),
            documents_table: "documents".to_string(),
            cache_table: "llm_cache".to_string(),
            semantic_cache_table: "semantic_cache".to_string(),
            interactions_table: "interactions".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            semantic_threshold: 0.8,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.cache.semantic_threshold) {
            return Err(DomainError::configuration(format!(
                "cache.semantic_threshold must be within [0, 1], got {}",
                self.cache.semantic_threshold
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(DomainError::configuration(
                "retrieval.top_k must be greater than 0",
            ));
        }

        self.chunking
            .validate()
            .map_err(|e| DomainError::configuration(e.to_string()))
    }
}
