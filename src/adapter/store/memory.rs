//! In-memory alert-state store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::AlertState;
use crate::error::Result;
use crate::port::AlertStore;

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: AlertState,
    expires_at: DateTime<Utc>,
}

/// Process-local store with per-entry expiry.
///
/// State is lost on restart; use `FileStore` to keep it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn expiry_from(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<AlertState>> {
        let now = Utc::now();
        Ok(self
            .entries
            .read()
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.state))
    }

    async fn set(&self, key: &str, state: AlertState, ttl: Duration) -> Result<()> {
        let now = Utc::now();
        let mut entries = self.entries.write();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                state,
                expires_at: expiry_from(now, ttl),
            },
        );
        Ok(())
    }
}
