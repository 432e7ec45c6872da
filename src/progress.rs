//! # Progress — Atomic Search Progress Counters
//!
//! Thread-safe progress tracking shared between the workers of one session and
//! the background status reporter. Workers bump the atomics once per candidate;
//! nothing here takes a lock.
//!
//! ## Background Reporter
//!
//! A Tokio task logs tested count, found count, rate (candidates/sec) and the
//! highest candidate reached every reporting interval. It exits when the
//! session's cancellation token fires.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct Progress {
    pub tested: AtomicU64,
    pub found: AtomicU64,
    highest: AtomicI64,
    start: Instant,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            highest: AtomicI64::new(0),
            start: Instant::now(),
        })
    }

    /// Record that `candidate` has been tested.
    pub fn record_tested(&self, candidate: i64) {
        self.tested.fetch_add(1, Ordering::Relaxed);
        self.highest.fetch_max(candidate, Ordering::Relaxed);
    }

    pub fn record_found(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }

    /// Largest candidate any worker has tested. Workers advance independently,
    /// so smaller candidates may still be untested.
    pub fn highest(&self) -> i64 {
        self.highest.load(Ordering::Relaxed)
    }

    pub fn start_reporter(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let progress = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => progress.print_status(),
                }
            }
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            highest = self.highest(),
            tested,
            rate = format_args!("{:.2}", rate),
            found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "search progress"
        );
    }
}
