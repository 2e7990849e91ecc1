//! Metric events emitted by the query resolver
//!
//! The resolver describes what happened; sinks decide how to export it.
//! A sink must never fail or block the caller.

use std::fmt::Debug;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which cache tier served (or failed to serve) a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    Exact,
    Semantic,
    None,
}

impl CacheTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Semantic => "semantic",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for CacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured event describing one stage of a query resolution
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    /// A resolution attempt began
    RequestStarted,
    /// A cache tier was consulted
    CacheResult { tier: CacheTier, hit: bool },
    /// The language model produced an answer
    GenerationCompleted { duration: Duration },
    /// The resolution failed
    Error { kind: &'static str },
}

/// Passive receiver for metric events
///
/// Implementations must be infallible and non-blocking; aggregation and
/// export happen elsewhere.
pub trait MetricsSink: Send + Sync + Debug {
    fn record(&self, event: MetricEvent);
}

/// Sink that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _event: MetricEvent) {}
}
