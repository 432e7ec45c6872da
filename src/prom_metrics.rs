//! # Prometheus Metrics
//!
//! Exposes engine and HTTP metrics in the Prometheus text exposition format.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `primefinder_candidates_tested_total` | Counter | — | Odd candidates tested by workers |
//! | `primefinder_primes_found_total` | Counter | — | Primes recorded by workers |
//! | `primefinder_sessions_started_total` | Counter | — | Successful `start` calls |
//! | `primefinder_workers_live` | Gauge | — | Workers currently running |
//! | `primefinder_http_request_duration_seconds` | Histogram | `method`, `path` | Request latency |
//!
//! Counters are cumulative across sessions; per-session counts live in
//! [`Progress`](crate::progress::Progress).

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Label set for HTTP request metrics.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

/// All fields use atomic types and are safe to update from any task.
pub struct Metrics {
    pub registry: Registry,
    pub candidates_tested: Counter,
    pub primes_found: Counter,
    pub sessions_started: Counter,
    pub workers_live: Gauge,
    pub http_request_duration: Family<HttpLabel, Histogram>,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let candidates_tested = Counter::default();
        registry.register(
            "primefinder_candidates_tested",
            "Odd candidates tested by search workers",
            candidates_tested.clone(),
        );

        let primes_found = Counter::default();
        registry.register(
            "primefinder_primes_found",
            "Primes recorded by search workers",
            primes_found.clone(),
        );

        let sessions_started = Counter::default();
        registry.register(
            "primefinder_sessions_started",
            "Search sessions started",
            sessions_started.clone(),
        );

        let workers_live = Gauge::default();
        registry.register(
            "primefinder_workers_live",
            "Search workers currently running",
            workers_live.clone(),
        );

        let http_request_duration =
            Family::<HttpLabel, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.001, 2.0, 14))
            });
        registry.register(
            "primefinder_http_request_duration_seconds",
            "HTTP request latency",
            http_request_duration.clone(),
        );

        Self {
            registry,
            candidates_tested,
            primes_found,
            sessions_started,
            workers_live,
            http_request_duration,
        }
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        // Writing into a String cannot fail
        let _ = encode(&mut buf, &self.registry);
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
