//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use primefinder::dashboard::{build_router, AppState};
use primefinder::db::{MemoryStore, PrimeStore};
use primefinder::{FinderConfig, SearchManager};
use std::sync::Arc;
use std::time::Duration;

/// Ceiling used by every test engine unless a test asks otherwise.
pub const TEST_MAX_THREADS: usize = 4;

/// Returns the test database URL from the `TEST_DATABASE_URL` environment variable.
/// Panics if the variable is not set.
pub fn test_db_url() -> String {
    std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for database tests")
}

/// Returns true if the test database URL is configured.
pub fn has_test_db() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// A manager over a fresh in-memory store.
pub fn memory_manager(max_threads: usize) -> (Arc<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let manager = SearchManager::new(FinderConfig::new(max_threads), store.clone());
    (AppState::new(manager), store)
}

/// A router plus the state behind it, so tests can reach the engine directly.
pub fn build_test_app() -> (Router, Arc<AppState>, Arc<MemoryStore>) {
    let (state, store) = memory_manager(TEST_MAX_THREADS);
    (build_router(Arc::clone(&state)), state, store)
}

/// Poll until `value` is in the store; panics after 10 seconds.
pub async fn wait_for_prime(store: &dyn PrimeStore, value: i64) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !store.exists(value).await.unwrap() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("search never reached value");
}
