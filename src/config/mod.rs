//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, EmbeddingsConfig, LlmConfig, LogFormat, LoggingConfig,
    RetrievalConfig, ServerConfig, StoreBackend, StoreConfig,
};
