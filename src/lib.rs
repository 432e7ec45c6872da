//! # primefinder
//!
//! A controllable, concurrent search for prime numbers. Start it with a worker
//! count, let it discover primes indefinitely, stop it, and list discovered
//! primes in a range once the search has provably covered that range.
//!
//! ## Layout
//!
//! - [`primality`]: trial-division primality test and closest-prime lookup
//! - [`partition`]: splits the odd integers into one progression per worker
//! - [`worker`]: a single cancellable search task
//! - [`search_manager`]: session lifecycle: start, stop, list
//! - [`validator`]: pre-condition checks for every public operation
//! - [`db`]: prime store trait with in-memory and PostgreSQL backings
//! - [`dashboard`]: HTTP API (axum)
//! - [`progress`], [`prom_metrics`]: counters, progress logging, Prometheus

pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod partition;
pub mod primality;
pub mod progress;
pub mod prom_metrics;
pub mod search_manager;
pub mod validator;
pub mod worker;

pub use config::FinderConfig;
pub use error::FinderError;
pub use search_manager::{SearchManager, SearchPhase};
