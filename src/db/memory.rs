//! In-memory prime store.
//!
//! An ordered set behind a `tokio::sync::RwLock`: workers take the write lock
//! only for the instant of an insert, query callers share the read lock.

use super::PrimeStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    primes: RwLock<BTreeSet<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored primes.
    pub async fn len(&self) -> usize {
        self.primes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.primes.read().await.is_empty()
    }
}

#[async_trait]
impl PrimeStore for MemoryStore {
    async fn insert(&self, value: i64) -> Result<()> {
        self.primes.write().await.insert(value);
        Ok(())
    }

    async fn exists(&self, value: i64) -> Result<bool> {
        Ok(self.primes.read().await.contains(&value))
    }

    async fn range_query(&self, min: i64, max: i64) -> Result<Vec<i64>> {
        if min > max {
            return Ok(Vec::new());
        }
        Ok(self.primes.read().await.range(min..=max).copied().collect())
    }

    async fn clear(&self) -> Result<()> {
        self.primes.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn insert_is_idempotent() {
        let store = MemoryStore::new();
        store.insert(7).await.unwrap();
        store.insert(7).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.exists(7).await.unwrap());
        assert!(!store.exists(11).await.unwrap());
    }

    #[tokio::test]
    async fn range_query_is_inclusive_and_ordered() {
        let store = MemoryStore::new();
        for p in [11, 2, 7, 5, 3, 13] {
            store.insert(p).await.unwrap();
        }
        assert_eq!(store.range_query(3, 11).await.unwrap(), vec![3, 5, 7, 11]);
        assert_eq!(store.range_query(14, 20).await.unwrap(), Vec::<i64>::new());
        assert_eq!(store.range_query(10, 1).await.unwrap(), Vec::<i64>::new());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = MemoryStore::new();
        store.insert(2).await.unwrap();
        store.insert(3).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty().await);
        assert!(!store.exists(2).await.unwrap());
    }

    /// Many writers racing on the same store lose no insert.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_are_all_visible() {
        let store = Arc::new(MemoryStore::new());
        let mut handles = Vec::new();
        for t in 0..8i64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for i in 0..500i64 {
                    store.insert(t * 500 + i).await.unwrap();
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.len().await, 4000);
    }
}
