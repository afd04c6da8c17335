//! Stateful alert throttle.
//!
//! Wraps the pure [`ThrottlePolicy`] with reads and writes against an
//! [`AlertStore`]. Callers must serialize evaluations for a given store;
//! the scanner does so with its cycle lock.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{alert_key, AlertPriority, AlertState, Opportunity, ThrottlePolicy};
use crate::error::Result;
use crate::port::AlertStore;

pub struct AlertThrottle {
    policy: ThrottlePolicy,
    store: Arc<dyn AlertStore>,
}

impl AlertThrottle {
    pub fn new(policy: ThrottlePolicy, store: Arc<dyn AlertStore>) -> Self {
        Self { policy, store }
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    /// Decide whether `opportunity` should alert at `now_ms`.
    ///
    /// Spreads at or below the threshold return `None` without touching the
    /// store. When an alert is returned, the new state has already been
    /// persisted.
    ///
    /// # Errors
    ///
    /// Propagates store failures. Nothing is written if the read fails.
    pub async fn evaluate(
        &self,
        opportunity: &Opportunity,
        now_ms: i64,
    ) -> Result<Option<AlertPriority>> {
        let spread = opportunity.delta_spread_8h();
        if !self.policy.qualifies(spread) {
            return Ok(None);
        }

        let key = alert_key(opportunity.symbol());
        let prior = self.store.get(&key).await?;

        let Some(priority) = self.policy.decide(prior.as_ref(), spread, now_ms) else {
            debug!(
                symbol = %opportunity.symbol(),
                spread = %spread,
                last_spread = ?prior.map(|s| s.last_spread),
                "Alert suppressed by throttle"
            );
            return Ok(None);
        };

        self.store
            .set(&key, AlertState::new(now_ms, spread), self.policy.state_ttl)
            .await?;

        Ok(Some(priority))
    }
}
