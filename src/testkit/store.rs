//! Alert store that records reads and writes.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::adapter::store::MemoryStore;
use crate::domain::AlertState;
use crate::error::{Error, Result};
use crate::port::AlertStore;

/// [`MemoryStore`] wrapper counting calls per key.
///
/// Keys registered with [`CountingStore::fail_key`] return `Error::Store`
/// on both read and write; calls to them are still recorded.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    gets: Mutex<Vec<String>>,
    sets: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for `key` fail.
    pub fn fail_key(&self, key: &str) {
        self.failing.lock().insert(key.to_string());
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.failing.lock().contains(key) {
            return Err(Error::Store(format!("{key}: unavailable")));
        }
        Ok(())
    }

    /// Keys read, in call order.
    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().clone()
    }

    /// Keys written, in call order.
    pub fn sets(&self) -> Vec<String> {
        self.sets.lock().clone()
    }
}

#[async_trait]
impl AlertStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<AlertState>> {
        self.gets.lock().push(key.to_string());
        self.check(key)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, state: AlertState, ttl: Duration) -> Result<()> {
        self.sets.lock().push(key.to_string());
        self.check(key)?;
        self.inner.set(key, state, ttl).await
    }
}
