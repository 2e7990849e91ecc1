use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached answer
///
/// Created on the first answer for a key and read-only afterwards except for
/// `hit_count`. Eviction, if any, belongs to the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    key: String,
    answer: String,
    created_at: DateTime<Utc>,
    hit_count: u32,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            answer: answer.into(),
            created_at: Utc::now(),
            hit_count: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn increment_hits(&mut self) {
        self.hit_count += 1;
    }
}
