//! Prime record queries for the `prime_numbers` table.
//!
//! The table holds one row per discovered prime, keyed by the value itself, so
//! duplicate inserts collapse via `ON CONFLICT DO NOTHING` and existence checks
//! hit the primary-key index.

use super::Database;
use anyhow::Result;

impl Database {
    /// Create the `prime_numbers` table if it does not exist yet.
    pub(super) async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS prime_numbers (
                 prime_number BIGINT PRIMARY KEY
             )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a prime, ignoring duplicates.
    pub async fn insert_prime(&self, value: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO prime_numbers (prime_number) VALUES ($1)
             ON CONFLICT (prime_number) DO NOTHING",
        )
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn prime_exists(&self, value: i64) -> Result<bool> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM prime_numbers WHERE prime_number = $1)",
        )
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    /// All stored primes in `[min, max]`, ascending.
    pub async fn get_primes_between(&self, min: i64, max: i64) -> Result<Vec<i64>> {
        let rows: Vec<i64> = sqlx::query_scalar(
            "SELECT prime_number FROM prime_numbers
             WHERE prime_number BETWEEN $1 AND $2
             ORDER BY prime_number",
        )
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Remove every stored prime. Called once at the start of each session.
    pub async fn delete_all_primes(&self) -> Result<()> {
        sqlx::query("DELETE FROM prime_numbers")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
