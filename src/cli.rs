//! # CLI Execution Functions
//!
//! Execution logic for each subcommand, kept out of `main.rs`.

use anyhow::Result;
use primefinder::dashboard::{self, AppState};
use primefinder::primality::{closest_prime_at_or_below, is_prime};
use primefinder::{db, SearchManager};
use std::time::Duration;
use tracing::info;

use super::Cli;

const STORE_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub async fn run_serve(cli: &Cli, port: u16) -> Result<()> {
    let store = db::open_store(cli.database_url.as_deref()).await?;
    let manager = SearchManager::new(cli.finder_config(), store);
    dashboard::run(port, AppState::new(manager)).await
}

pub fn run_check(number: i64) -> Result<()> {
    if is_prime(number) {
        println!("{} is prime", number);
    } else {
        println!("{} is not prime", number);
    }
    match closest_prime_at_or_below(number) {
        Some(p) => println!("closest prime at or below {}: {}", number, p),
        None => println!("no prime at or below {}", number),
    }
    Ok(())
}

/// Start a session, wait until every worker has stored the last prime of its
/// progression at or below `until`, print `[1, until]`, then stop and drain.
///
/// The listing check alone only proves the prime closest to `until`; with
/// several workers a slower progression may still be behind it.
pub async fn run_search(cli: &Cli, threads: i64, until: i64) -> Result<()> {
    let store = db::open_store(cli.database_url.as_deref()).await?;
    let manager = SearchManager::new(cli.finder_config(), store);

    let session = manager.start(threads).await?;
    info!(session_id = session.id, threads, until, "searching");

    let markers: Vec<i64> = session
        .workers
        .iter()
        .filter_map(|w| last_prime_of_progression(w.start, w.stride, until))
        .collect();
    for marker in markers {
        while !manager.store().exists(marker).await? {
            tokio::time::sleep(STORE_POLL_INTERVAL).await;
        }
    }
    let listed = manager.list_primes(1, until).await;

    manager.stop().await?;
    manager.wait_for_drain().await;

    for prime in listed? {
        println!("{}", prime);
    }
    Ok(())
}

/// Largest prime in `start, start + stride, …` that is at most `bound`.
fn last_prime_of_progression(start: i64, stride: i64, bound: i64) -> Option<i64> {
    if bound < start {
        return None;
    }
    let mut candidate = start + (bound - start) / stride * stride;
    while candidate >= start {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate -= stride;
    }
    None
}
