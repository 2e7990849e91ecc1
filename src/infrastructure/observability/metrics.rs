//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::metrics::{MetricEvent, MetricsSink};

/// Prometheus metrics handle for serving the metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Render the metrics exposition text
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize the Prometheus recorder
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("knowledge_assistant_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Sink translating resolver events into Prometheus series
///
/// The `metrics` macros never fail and never block, satisfying the sink
/// contract even when no recorder is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetricsSink;

impl PrometheusMetricsSink {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsSink for PrometheusMetricsSink {
    fn record(&self, event: MetricEvent) {
        match event {
            MetricEvent::RequestStarted => {
                counter!("knowledge_assistant_queries_total").increment(1);
            }
            MetricEvent::CacheResult { tier, hit } => {
                let series = if hit {
                    "knowledge_assistant_cache_hits_total"
                } else {
                    "knowledge_assistant_cache_misses_total"
                };
                counter!(series, "tier" => tier.as_str()).increment(1);
            }
            MetricEvent::GenerationCompleted { duration } => {
                counter!("knowledge_assistant_llm_requests_total").increment(1);
                histogram!("knowledge_assistant_llm_response_time_seconds")
                    .record(duration.as_secs_f64());
            }
            MetricEvent::Error { kind } => {
                counter!("knowledge_assistant_errors_total", "kind" => kind).increment(1);
            }
        }
    }
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});
static NUMERIC_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = UUID_RE.replace_all(path, "{id}");
    let path = NUMERIC_ID_RE.replace_all(&path, "/{id}$1");

    if path.len() > 50 {
        path[..50].to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::CacheTier;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/v1/query/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/v1/query/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        let path = "/api/documents/123/chunks";
        assert_eq!(sanitize_path(path), "/api/documents/{id}/chunks");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_sink_accepts_every_event_kind() {
        let sink = PrometheusMetricsSink::new();

        // Must not panic with or without an installed recorder.
        sink.record(MetricEvent::RequestStarted);
        sink.record(MetricEvent::CacheResult {
            tier: CacheTier::Exact,
            hit: true,
        });
        sink.record(MetricEvent::GenerationCompleted {
            duration: Duration::from_millis(120),
        });
        sink.record(MetricEvent::Error { kind: "generation_failed" });
    }
}
