//! End-to-end tests of the search engine through `SearchManager`, without HTTP.
//!
//! Every test runs against a fresh in-memory store. Tests that depend on
//! workers not having run yet use the default current-thread runtime, where a
//! spawned worker makes no progress until the test task yields.

mod common;

use primefinder::db::{MemoryStore, PrimeStore};
use primefinder::partition::plan;
use primefinder::primality::is_prime;
use primefinder::{FinderConfig, FinderError, SearchManager, SearchPhase};
use std::sync::Arc;

fn manager(max_threads: usize) -> (SearchManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (
        SearchManager::new(FinderConfig::new(max_threads), store.clone()),
        store,
    )
}

fn sieve(limit: usize) -> Vec<i64> {
    let mut composite = vec![false; limit + 1];
    let mut primes = Vec::new();
    for n in 2..=limit {
        if !composite[n] {
            primes.push(n as i64);
            let mut m = n * n;
            while m <= limit {
                composite[m] = true;
                m += n;
            }
        }
    }
    primes
}

#[tokio::test]
async fn single_worker_session_end_to_end() {
    let (m, store) = manager(4);
    m.start(1).await.unwrap();
    common::wait_for_prime(store.as_ref(), 7).await;

    assert_eq!(m.list_primes(1, 7).await.unwrap(), vec![2, 3, 5, 7]);

    m.stop().await.unwrap();
    // Workers have not reached a checkpoint yet, so the session is still live
    assert!(matches!(m.start(2).await, Err(FinderError::State(_))));
    assert_eq!(m.phase().await, SearchPhase::Stopping);

    m.wait_for_drain().await;
    let info = m.start(2).await.unwrap();
    let starts: Vec<(i64, i64)> = info.workers.iter().map(|w| (w.start, w.stride)).collect();
    assert_eq!(starts, vec![(3, 4), (5, 4)]);

    // The new session cleared the previous results
    assert!(matches!(
        m.list_primes(1, 1_000_003).await,
        Err(FinderError::IncompleteRange(_))
    ));
    m.shutdown().await;
}

#[tokio::test]
async fn second_stop_while_draining_is_state_error() {
    let (m, _) = manager(2);
    m.start(2).await.unwrap();
    m.stop().await.unwrap();
    assert!(matches!(m.stop().await, Err(FinderError::State(_))));
    m.wait_for_drain().await;
}

#[tokio::test]
async fn failed_calls_leave_engine_unchanged() {
    let (m, store) = manager(2);
    store.insert(11).await.unwrap();

    assert!(matches!(m.start(3).await, Err(FinderError::Validation(_))));
    assert!(matches!(m.start(0).await, Err(FinderError::Validation(_))));
    assert!(matches!(m.stop().await, Err(FinderError::State(_))));
    assert!(matches!(
        m.list_primes(10, 1).await,
        Err(FinderError::Validation(_))
    ));

    assert_eq!(m.phase().await, SearchPhase::Idle);
    assert_eq!(store.range_query(1, 100).await.unwrap(), vec![11]);
}

#[tokio::test]
async fn list_rejects_inverted_interval_while_running() {
    let (m, _) = manager(2);
    m.start(2).await.unwrap();
    assert!(matches!(
        m.list_primes(10, 1).await,
        Err(FinderError::Validation(_))
    ));
    m.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_workers_find_every_prime_below_bound() {
    let (m, store) = manager(5);
    m.start(5).await.unwrap();
    // The listing check proves only the prime closest to the bound; wait
    // until every progression has stored its last prime below 2000
    for progression in plan(5) {
        let last = progression
            .up_to(2000)
            .filter(|&n| is_prime(n))
            .last()
            .unwrap();
        common::wait_for_prime(store.as_ref(), last).await;
    }

    let listed = m.list_primes(1, 2000).await.unwrap();
    assert_eq!(listed, sieve(2000));

    m.stop().await.unwrap();
    m.wait_for_drain().await;
    assert_eq!(m.list_primes(1000, 1010).await.unwrap(), vec![1009]);
}

#[tokio::test]
async fn status_tracks_session_lifecycle() {
    let (m, store) = manager(3);
    let info = m.start(3).await.unwrap();
    assert_eq!(info.threads, 3);
    assert_eq!(info.live_workers, 3);
    assert_eq!(info.found, 1);

    common::wait_for_prime(store.as_ref(), 101).await;
    let status = m.status().await;
    assert_eq!(status.phase, SearchPhase::Running);
    let session = status.session.unwrap();
    assert!(session.tested > 0);
    assert!(session.highest_tested >= 101);
    assert!(session.stop_requested_at.is_none());

    m.stop().await.unwrap();
    let session = m.status().await.session.unwrap();
    assert!(session.stop_requested_at.is_some());

    m.wait_for_drain().await;
    m.shutdown().await;
    assert_eq!(m.phase().await, SearchPhase::Idle);
}

#[tokio::test]
async fn metrics_follow_workers() {
    let (m, store) = manager(2);
    m.start(2).await.unwrap();
    assert_eq!(m.metrics().workers_live.get(), 2);
    assert_eq!(m.metrics().sessions_started.get(), 1);
    common::wait_for_prime(store.as_ref(), 13).await;
    assert!(m.metrics().primes_found.get() >= 4);

    m.shutdown().await;
    assert_eq!(m.metrics().workers_live.get(), 0);
}
