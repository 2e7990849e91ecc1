//! Semantic cache trait and configuration
//!
//! The exact tier misses queries that are semantically identical but
//! lexically different ("What is X?" vs "Tell me about X"). This tier trades
//! one similarity search for a much higher hit rate.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Configuration for the semantic cache tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Minimum similarity for a cache hit (0.0 to 1.0)
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,

    /// Number of candidates to consider per lookup
    #[serde(default = "default_candidates")]
    pub candidates: usize,
}

fn default_score_threshold() -> f32 {
    0.8
}

fn default_candidates() -> usize {
    1
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            candidates: default_candidates(),
        }
    }
}

impl SemanticCacheConfig {
    pub fn new(score_threshold: f32) -> Self {
        Self {
            score_threshold,
            ..Default::default()
        }
    }
}

/// A semantic cache hit
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticHit {
    pub answer: String,
    pub similarity: f32,
}

impl SemanticHit {
    pub fn new(answer: impl Into<String>, similarity: f32) -> Self {
        Self {
            answer: answer.into(),
            similarity,
        }
    }
}

/// Cache keyed by query embedding, matched via similarity threshold
///
/// `lookup` returns the best match only if its similarity meets the
/// configured threshold; ties break toward the highest similarity. Duplicate
/// near-identical updates add candidates without corrupting lookups.
#[async_trait]
pub trait SemanticCache: Send + Sync + Debug {
    /// Look up the answer of the most similar previously cached query
    async fn lookup(&self, query: &str) -> Result<Option<SemanticHit>, DomainError>;

    /// Store the query's embedding with its answer
    async fn update(&self, query: &str, answer: &str) -> Result<(), DomainError>;
}
