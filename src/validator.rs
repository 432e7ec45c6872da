//! Pre-condition checks run before every public engine operation.
//!
//! Every check here runs before the controller mutates anything, so a
//! rejected call leaves the engine exactly as it was.

use crate::db::PrimeStore;
use crate::error::{FinderError, Result};
use crate::primality::closest_prime_at_or_below;
use std::sync::Arc;

pub struct Validator {
    max_threads_to_use: usize,
    store: Arc<dyn PrimeStore>,
}

impl Validator {
    pub fn new(max_threads_to_use: usize, store: Arc<dyn PrimeStore>) -> Self {
        Validator {
            max_threads_to_use,
            store,
        }
    }

    /// Fails if `thread_count` is outside `1..=max_threads_to_use`, or if any
    /// worker of the previous session is still running.
    pub fn validate_before_search(&self, thread_count: i64, live_workers: usize) -> Result<()> {
        if thread_count < 1 {
            return Err(FinderError::Validation(format!(
                "Thread count must be at least 1, got {}!",
                thread_count
            )));
        }
        if thread_count as u64 > self.max_threads_to_use as u64 {
            return Err(FinderError::Validation(format!(
                "Maximum threads for searching cannot be more than {}!",
                self.max_threads_to_use
            )));
        }
        if live_workers > 0 {
            return Err(FinderError::State("Searching is already running!".into()));
        }
        Ok(())
    }

    /// Fails unless a session has live workers that have not been told to stop.
    pub fn validate_before_stopping(&self, live_workers: usize, stop_requested: bool) -> Result<()> {
        if live_workers == 0 {
            return Err(FinderError::State(
                "Searching isn't in progress, thus cannot be stopped!".into(),
            ));
        }
        if stop_requested {
            return Err(FinderError::State("Searching is already stopping!".into()));
        }
        Ok(())
    }

    /// Fails on malformed bounds, or when the search has not yet discovered
    /// the largest prime at or below `max_value`.
    ///
    /// Workers walk interleaved progressions, so the largest stored prime is
    /// not a progress marker. Presence of the closest prime at or below
    /// `max_value` is.
    pub async fn validate_before_listing(&self, min_value: i64, max_value: i64) -> Result<()> {
        if min_value < 1 || max_value < 1 {
            return Err(FinderError::Validation(format!(
                "Interval bounds must be at least 1, got ({}) - ({})!",
                min_value, max_value
            )));
        }
        if max_value < min_value {
            return Err(FinderError::Validation(format!(
                "Minimum value ({}) cannot be bigger than maximum value ({})!",
                min_value, max_value
            )));
        }

        let target = tokio::task::spawn_blocking(move || closest_prime_at_or_below(max_value))
            .await
            .map_err(|e| FinderError::Store(anyhow::anyhow!("closest prime lookup failed: {}", e)))?;
        let Some(target) = target else {
            return Ok(());
        };
        if !self.store.exists(target).await? {
            return Err(FinderError::IncompleteRange(format!(
                "Searching hasn't finished yet on interval ({}) - ({})!",
                min_value, max_value
            )));
        }
        Ok(())
    }
}
