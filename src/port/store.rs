//! Store port for alert-state persistence.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::AlertState;
use crate::error::Result;

/// Key-value storage for per-symbol alert state.
///
/// # Implementation Notes
///
/// - `get` returns `None` for keys never written and for keys whose TTL
///   has elapsed.
/// - `set` overwrites and restarts the TTL.
/// - A `get` followed by a `set` is not atomic; callers that evaluate the
///   same key concurrently must serialize themselves.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Read the state stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<AlertState>>;

    /// Write `state` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, state: AlertState, ttl: Duration) -> Result<()>;
}
