//! JSON-file alert-state store.
//!
//! The whole map is kept in memory and rewritten on every `set` using a
//! temp file and rename, so a crash never leaves a half-written file.
//! Expired entries are pruned on load and on write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::memory::expiry_from;
use crate::domain::AlertState;
use crate::error::{Error, Result};
use crate::port::AlertStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    state: AlertState,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    expires_at: DateTime<Utc>,
}

/// Alert-state store persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, Entry>>,
}

impl FileStore {
    /// Open the store, loading existing state if the file exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::Store` if the file exists but cannot be read or is
    /// not a valid state map.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut entries = load(&path)?;

        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);

        info!(
            path = %path.display(),
            loaded = entries.len(),
            expired = before - entries.len(),
            "Opened alert state file"
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load(path: &Path) -> Result<HashMap<String, Entry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(Error::Store(format!("{}: {e}", path.display()))),
    };
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    serde_json::from_str(&content).map_err(|e| Error::Store(format!("{}: {e}", path.display())))
}

async fn write_atomic(path: &Path, json: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    let result = async {
        tokio::fs::write(&temp_path, json.as_bytes()).await?;
        tokio::fs::rename(&temp_path, path).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result
}

#[async_trait]
impl AlertStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<AlertState>> {
        let now = Utc::now();
        Ok(self
            .entries
            .lock()
            .await
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.state))
    }

    async fn set(&self, key: &str, state: AlertState, ttl: Duration) -> Result<()> {
        let now = Utc::now();
        let mut entries = self.entries.lock().await;

        // Only commit once the file is written; a failed write leaves no state.
        let mut next: HashMap<String, Entry> = entries
            .iter()
            .filter(|(_, e)| e.expires_at > now)
            .map(|(k, e)| (k.clone(), *e))
            .collect();
        next.insert(
            key.to_string(),
            Entry {
                state,
                expires_at: expiry_from(now, ttl),
            },
        );

        let json = serde_json::to_string_pretty(&next)?;
        write_atomic(&self.path, &json)
            .await
            .map_err(|e| Error::Store(format!("{}: {e}", self.path.display())))?;

        *entries = next;
        debug!(key = %key, entries = entries.len(), "Persisted alert state");
        Ok(())
    }
}
