//! # Database — Prime Store
//!
//! The engine records discovered primes through the [`PrimeStore`] trait and
//! never depends on which backing is in use. Two implementations:
//!
//! - [`MemoryStore`]: an in-process ordered set, used when no database URL is
//!   configured and throughout the test suite.
//! - [`Database`]: PostgreSQL via `sqlx::PgPool`, one `prime_numbers` table
//!   keyed by the prime itself.
//!
//! ## Contract
//!
//! All operations are safe under concurrent callers. `insert` is idempotent.
//! An `insert` that completes before an `exists` call for the same value is
//! visible to that call; this is the only ordering the engine relies on.
//!
//! ## Module Structure
//!
//! - [`memory`]: in-memory store
//! - [`primes`]: PostgreSQL queries for the `prime_numbers` table

mod memory;
mod primes;

pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::sync::Arc;

/// Storage collaborator for discovered primes.
#[async_trait]
pub trait PrimeStore: Send + Sync {
    /// Record a prime. Inserting a value already present is a no-op.
    async fn insert(&self, value: i64) -> Result<()>;

    /// True if `value` has been recorded.
    async fn exists(&self, value: i64) -> Result<bool>;

    /// Every recorded value in `[min, max]`, ascending.
    async fn range_query(&self, min: i64, max: i64) -> Result<Vec<i64>>;

    /// Remove every recorded value.
    async fn clear(&self) -> Result<()>;

    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Connect to PostgreSQL when a URL is given, otherwise fall back to memory.
pub async fn open_store(database_url: Option<&str>) -> Result<Arc<dyn PrimeStore>> {
    match database_url {
        Some(url) => {
            let database = Database::connect(url).await?;
            tracing::info!("using PostgreSQL prime store");
            Ok(Arc::new(database))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory prime store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

// ── Database struct and connection ──────────────────────────────

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL using the provided database URL and make sure the
    /// `prime_numbers` table exists.
    ///
    /// The URL is parsed by hand so percent-encoded usernames and passwords
    /// survive intact.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let url = url::Url::parse(database_url)?;
        let username = urlencoding::decode(url.username())?.into_owned();
        let password = url
            .password()
            .map(|p| urlencoding::decode(p).map(|s| s.into_owned()))
            .transpose()?;
        let mut opts = PgConnectOptions::new()
            .host(url.host_str().unwrap_or("localhost"))
            .port(url.port().unwrap_or(5432))
            .database(url.path().trim_start_matches('/'))
            .username(&username);
        if let Some(ref pw) = password {
            opts = opts.password(pw);
        }
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect_with(opts)
            .await?;
        let database = Database { pool };
        database.ensure_schema().await?;
        Ok(database)
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PrimeStore for Database {
    async fn insert(&self, value: i64) -> Result<()> {
        self.insert_prime(value).await
    }

    async fn exists(&self, value: i64) -> Result<bool> {
        self.prime_exists(value).await
    }

    async fn range_query(&self, min: i64, max: i64) -> Result<Vec<i64>> {
        self.get_primes_between(min, max).await
    }

    async fn clear(&self) -> Result<()> {
        self.delete_all_primes().await
    }

    /// Execute `SELECT 1` to verify database connectivity.
    async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
