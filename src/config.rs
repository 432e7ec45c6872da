//! Engine configuration.
//!
//! The binary fills this from CLI flags / environment (see `main.rs`); tests
//! build it directly.

use std::time::Duration;

/// Default ceiling on worker count when none is configured.
pub const DEFAULT_MAX_THREADS: usize = 8;

/// Default period of the background progress reporter.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct FinderConfig {
    /// Upper bound on the worker count accepted by `start`.
    pub max_threads_to_use: usize,
    /// How often a running session logs its progress.
    pub report_interval: Duration,
}

impl FinderConfig {
    pub fn new(max_threads_to_use: usize) -> Self {
        FinderConfig {
            max_threads_to_use,
            ..Default::default()
        }
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        FinderConfig {
            max_threads_to_use: DEFAULT_MAX_THREADS,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}
