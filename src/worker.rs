//! # Worker — One Search Task
//!
//! Walks a single [`Progression`] forever, testing each candidate and recording
//! primes in the store. A worker ends when its cancellation token fires, or if
//! the next candidate would overflow `i64`.
//!
//! ## Checkpoints
//!
//! Each iteration begins with `yield_now()` followed by a cancellation check.
//! Cancellation is therefore observed at the next checkpoint: a worker that is
//! mid-test finishes that candidate first.
//!
//! ## Store failures
//!
//! A failed insert is retried for the same candidate after a short backoff.
//! Primes are never skipped.

use crate::db::PrimeStore;
use crate::partition::Progression;
use crate::primality::is_prime;
use crate::progress::Progress;
use crate::prom_metrics::Metrics;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const STORE_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Everything a worker needs besides its progression.
#[derive(Clone)]
pub struct WorkerContext {
    pub store: Arc<dyn PrimeStore>,
    pub progress: Arc<Progress>,
    pub metrics: Arc<Metrics>,
}

/// Marks a worker live from the moment it is created until its future is
/// dropped, whether the worker returned, panicked, or never got polled.
pub struct LiveGuard {
    alive: Arc<AtomicBool>,
    metrics: Arc<Metrics>,
}

impl LiveGuard {
    pub fn new(alive: Arc<AtomicBool>, metrics: Arc<Metrics>) -> Self {
        alive.store(true, Ordering::Release);
        metrics.workers_live.inc();
        LiveGuard { alive, metrics }
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        self.metrics.workers_live.dec();
    }
}

/// Run one worker until `cancel` fires.
pub async fn run_worker(
    worker_id: usize,
    progression: Progression,
    ctx: WorkerContext,
    _live: LiveGuard,
    cancel: CancellationToken,
) {
    debug!(
        worker_id,
        start = progression.start,
        stride = progression.stride,
        "worker started"
    );

    let mut observed = progression.start;
    loop {
        tokio::task::yield_now().await;
        if cancel.is_cancelled() {
            break;
        }

        if is_prime(observed) {
            if !store_with_retry(worker_id, observed, &ctx, &cancel).await {
                break;
            }
            ctx.progress.record_found();
            ctx.metrics.primes_found.inc();
        }
        ctx.progress.record_tested(observed);
        ctx.metrics.candidates_tested.inc();

        match observed.checked_add(progression.stride) {
            Some(next) => observed = next,
            None => {
                warn!(worker_id, last = observed, "candidate space exhausted");
                break;
            }
        }
    }

    debug!(worker_id, last = observed, "worker stopped");
}

/// Insert `prime`, retrying until it sticks. Returns false if cancelled first.
async fn store_with_retry(
    worker_id: usize,
    prime: i64,
    ctx: &WorkerContext,
    cancel: &CancellationToken,
) -> bool {
    loop {
        match ctx.store.insert(prime).await {
            Ok(()) => return true,
            Err(e) => {
                warn!(worker_id, prime, error = %e, "failed to store prime, retrying");
                tokio::select! {
                    _ = cancel.cancelled() => return false,
                    _ = tokio::time::sleep(STORE_RETRY_BACKOFF) => {}
                }
            }
        }
    }
}
