//! Durable audit record for one resolved query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::metrics::CacheTier;

/// Append-only record of a single resolved query
///
/// Written at most once per resolution; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    query: String,
    answer: String,
    latency_seconds: f64,
    cache_tier: CacheTier,
    timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(
        query: impl Into<String>,
        answer: impl Into<String>,
        latency_seconds: f64,
        cache_tier: CacheTier,
    ) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
            latency_seconds,
            cache_tier,
            timestamp: Utc::now(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn latency_seconds(&self) -> f64 {
        self.latency_seconds
    }

    pub fn cache_tier(&self) -> CacheTier {
        self.cache_tier
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
