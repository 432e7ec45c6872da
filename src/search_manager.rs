//! # Search Manager — Session Lifecycle
//!
//! Owns the current [`SearchSession`] and drives `start` / `stop` / `list`.
//!
//! ## States
//!
//! ```text
//! Idle ──start──▶ Running ──stop──▶ Stopping ──(all workers exited)──▶ Idle
//! ```
//!
//! The phase is derived, not stored: a session with no live worker is Idle no
//! matter what else it records. A live session whose cancellation has been
//! issued is Stopping.
//!
//! ## Concurrency
//!
//! The session slot sits behind a `tokio::sync::Mutex`, held across the whole
//! of `start` (validate, clear store, spawn) and `stop` (validate, cancel), so
//! two callers can never both pass validation. Workers are spawned on a
//! per-session `TaskTracker`: its `len()` is the authoritative live count and
//! `wait()` is the drain signal.
//!
//! `stop()` returns as soon as cancellation is issued. A background task waits
//! for the tracker to drain and then discards the session. Until the last
//! worker has exited, `start()` keeps failing with a state error.
//!
//! `list_primes` holds a read guard on the reset gate across its completeness
//! check and range query; `start` takes the write guard around clearing the
//! store. A listing therefore never observes a reset between the two steps.
//!
//! Every session token is a child of the manager's shutdown token, which is
//! cancelled on [`SearchManager::shutdown`] and on drop. Shutdown is terminal:
//! `start` fails with a state error afterwards.

use crate::config::FinderConfig;
use crate::db::PrimeStore;
use crate::error::{FinderError, Result};
use crate::partition::{self, Progression};
use crate::progress::Progress;
use crate::prom_metrics::Metrics;
use crate::validator::Validator;
use crate::worker::{run_worker, LiveGuard, WorkerContext};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Running,
    Stopping,
}

/// Per-worker handles kept by the session.
struct WorkerSlot {
    progression: Progression,
    cancel: CancellationToken,
    alive: Arc<AtomicBool>,
}

/// One generation of workers, from a successful `start` until it has drained.
pub struct SearchSession {
    id: u64,
    threads: usize,
    started_at: DateTime<Utc>,
    stop_requested_at: Option<DateTime<Utc>>,
    cancel: CancellationToken,
    workers: BTreeMap<usize, WorkerSlot>,
    tracker: TaskTracker,
    progress: Arc<Progress>,
}

impl SearchSession {
    pub fn live_workers(&self) -> usize {
        self.tracker.len()
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested_at.is_some()
    }

    pub fn phase(&self) -> SearchPhase {
        if self.live_workers() == 0 {
            SearchPhase::Idle
        } else if self.stop_requested() {
            SearchPhase::Stopping
        } else {
            SearchPhase::Running
        }
    }

    /// Cancel every worker and close the tracker. Idempotent.
    fn request_stop(&mut self) {
        if self.stop_requested_at.is_some() {
            return;
        }
        self.stop_requested_at = Some(Utc::now());
        for slot in self.workers.values() {
            slot.cancel.cancel();
        }
        self.cancel.cancel();
        self.tracker.close();
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            threads: self.threads,
            started_at: self.started_at,
            stop_requested_at: self.stop_requested_at,
            live_workers: self.live_workers(),
            tested: self.progress.tested.load(Ordering::Relaxed),
            found: self.progress.found.load(Ordering::Relaxed),
            highest_tested: self.progress.highest(),
            workers: self
                .workers
                .iter()
                .map(|(&id, slot)| WorkerInfo {
                    id,
                    start: slot.progression.start,
                    stride: slot.progression.stride,
                    alive: slot.alive.load(Ordering::Acquire),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct WorkerInfo {
    pub id: usize,
    pub start: i64,
    pub stride: i64,
    pub alive: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionInfo {
    pub id: u64,
    pub threads: usize,
    pub started_at: DateTime<Utc>,
    pub stop_requested_at: Option<DateTime<Utc>>,
    pub live_workers: usize,
    pub tested: u64,
    pub found: u64,
    pub highest_tested: i64,
    pub workers: Vec<WorkerInfo>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchStatus {
    pub phase: SearchPhase,
    pub session: Option<SessionInfo>,
}

pub struct SearchManager {
    config: FinderConfig,
    store: Arc<dyn PrimeStore>,
    validator: Validator,
    metrics: Arc<Metrics>,
    session: Arc<Mutex<Option<SearchSession>>>,
    reset_gate: RwLock<()>,
    next_session_id: AtomicU64,
    shutdown: CancellationToken,
}

impl SearchManager {
    pub fn new(config: FinderConfig, store: Arc<dyn PrimeStore>) -> Self {
        Self::with_metrics(config, store, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(
        config: FinderConfig,
        store: Arc<dyn PrimeStore>,
        metrics: Arc<Metrics>,
    ) -> Self {
        SearchManager {
            validator: Validator::new(config.max_threads_to_use, Arc::clone(&store)),
            config,
            store,
            metrics,
            session: Arc::new(Mutex::new(None)),
            reset_gate: RwLock::new(()),
            next_session_id: AtomicU64::new(1),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PrimeStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Start a new session with `thread_count` workers.
    ///
    /// Clears the store, records 2, and spawns one worker per progression of
    /// [`partition::plan`]. Fails with a validation error for a thread count
    /// outside `1..=max_threads_to_use`, and with a state error while any
    /// worker of the previous session is still running or once the manager
    /// has been shut down.
    pub async fn start(&self, thread_count: i64) -> Result<SessionInfo> {
        let mut current = self.session.lock().await;
        if self.shutdown.is_cancelled() {
            return Err(FinderError::State(
                "Searching has been shut down and cannot be started!".into(),
            ));
        }
        let live = current.as_ref().map_or(0, SearchSession::live_workers);
        self.validator.validate_before_search(thread_count, live)?;

        let threads = thread_count as usize;
        let session = {
            let _reset = self.reset_gate.write().await;
            self.store.clear().await?;
            // 2 is the only even prime and belongs to no worker's progression
            self.store.insert(2).await?;
            self.spawn_session(threads)
        };
        session.progress.record_found();
        let info = session.info();
        self.metrics.sessions_started.inc();
        info!(
            session_id = session.id,
            threads, "started searching prime numbers"
        );
        *current = Some(session);
        Ok(info)
    }

    fn spawn_session(&self, threads: usize) -> SearchSession {
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let cancel = self.shutdown.child_token();
        let tracker = TaskTracker::new();
        let progress = Progress::new();
        let ctx = WorkerContext {
            store: Arc::clone(&self.store),
            progress: Arc::clone(&progress),
            metrics: Arc::clone(&self.metrics),
        };

        let mut workers = BTreeMap::new();
        for (worker_id, progression) in partition::plan(threads).into_iter().enumerate() {
            let worker_cancel = cancel.child_token();
            let alive = Arc::new(AtomicBool::new(false));
            let live = LiveGuard::new(Arc::clone(&alive), Arc::clone(&self.metrics));
            tracker.spawn(run_worker(
                worker_id,
                progression,
                ctx.clone(),
                live,
                worker_cancel.clone(),
            ));
            debug!(session_id = id, worker_id, start = progression.start, "worker spawned");
            workers.insert(
                worker_id,
                WorkerSlot {
                    progression,
                    cancel: worker_cancel,
                    alive,
                },
            );
        }
        progress.start_reporter(self.config.report_interval, cancel.clone());

        SearchSession {
            id,
            threads,
            started_at: Utc::now(),
            stop_requested_at: None,
            cancel,
            workers,
            tracker,
            progress,
        }
    }

    /// Issue cancellation to every worker and return immediately.
    ///
    /// Workers exit at their next checkpoint; the session is discarded in the
    /// background once the last one has. Fails with a state error when no
    /// worker is live, or when a stop is already draining.
    pub async fn stop(&self) -> Result<()> {
        let mut current = self.session.lock().await;
        let (live, stop_requested) = current
            .as_ref()
            .map_or((0, false), |s| (s.live_workers(), s.stop_requested()));
        self.validator
            .validate_before_stopping(live, stop_requested)?;

        if let Some(session) = current.as_mut() {
            session.request_stop();
            let id = session.id;
            let tracker = session.tracker.clone();
            let slot = Arc::clone(&self.session);
            tokio::spawn(async move {
                tracker.wait().await;
                let mut current = slot.lock().await;
                if current.as_ref().is_some_and(|s| s.id == id) {
                    if let Some(session) = current.take() {
                        session.progress.print_status();
                    }
                }
                info!(session_id = id, "prime number searching stopped");
            });
            info!(session_id = id, live_workers = live, "stopping prime number searching");
        }
        Ok(())
    }

    /// Every stored prime in `[min_value, max_value]`, ascending.
    ///
    /// Allowed in any phase. Fails with a validation error on malformed bounds
    /// and with an incomplete-range error until the search has discovered the
    /// largest prime at or below `max_value`.
    pub async fn list_primes(&self, min_value: i64, max_value: i64) -> Result<Vec<i64>> {
        let _reset = self.reset_gate.read().await;
        self.validator
            .validate_before_listing(min_value, max_value)
            .await?;
        Ok(self.store.range_query(min_value, max_value).await?)
    }

    pub async fn phase(&self) -> SearchPhase {
        self.session
            .lock()
            .await
            .as_ref()
            .map_or(SearchPhase::Idle, SearchSession::phase)
    }

    pub async fn status(&self) -> SearchStatus {
        let current = self.session.lock().await;
        SearchStatus {
            phase: current
                .as_ref()
                .map_or(SearchPhase::Idle, SearchSession::phase),
            session: current.as_ref().map(SearchSession::info),
        }
    }

    /// Resolve once every worker of a stopping session has exited.
    /// Returns immediately when no stop is pending.
    pub async fn wait_for_drain(&self) {
        let tracker = {
            let current = self.session.lock().await;
            match current.as_ref() {
                Some(session) if session.stop_requested() => session.tracker.clone(),
                _ => return,
            }
        };
        tracker.wait().await;
    }

    /// Cancel every live worker and wait for all of them to exit.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let mut current = self.session.lock().await;
        if let Some(mut session) = current.take() {
            session.request_stop();
            session.tracker.wait().await;
            info!(session_id = session.id, "search workers shut down");
        }
    }
}

impl Drop for SearchManager {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
