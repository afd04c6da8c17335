//! Alert throttling rules.
//!
//! A symbol whose spread stays above the alert threshold would otherwise be
//! announced on every poll. The throttle remembers when each symbol last
//! alerted and at what spread, and only lets a repeat alert through once the
//! window has lapsed or the spread has widened by the escalation delta.
//!
//! This module is pure: it decides, given the persisted state, whether to
//! alert. Reading and writing the state lives in `app::throttle`.

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Prefix of alert-state keys in the store.
pub const ALERT_KEY_PREFIX: &str = "alert:";

/// Store key for a symbol's alert state.
#[must_use]
pub fn alert_key(symbol: &Symbol) -> String {
    format!("{ALERT_KEY_PREFIX}{symbol}")
}

/// Persisted record of the last alert sent for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertState {
    /// When the alert was sent, epoch milliseconds.
    pub timestamp: i64,
    /// Spread at the time of the alert, percent per 8 hours.
    pub last_spread: Decimal,
}

impl AlertState {
    pub fn new(timestamp: i64, last_spread: Decimal) -> Self {
        Self {
            timestamp,
            last_spread,
        }
    }
}

/// How urgently an alert should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    /// First alert for a symbol, or first after the window lapsed.
    Standard,
    /// Spread widened sharply inside the window.
    High,
}

impl fmt::Display for AlertPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("STANDARD"),
            Self::High => f.write_str("HIGH"),
        }
    }
}

/// Throttle parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrottlePolicy {
    /// Spread (percent) that must be exceeded to consider alerting.
    pub threshold: Decimal,
    /// Repeat-alert window in milliseconds.
    pub window_ms: i64,
    /// Extra spread (percent) that re-alerts inside the window.
    pub escalation_delta: Decimal,
    /// How long the store keeps state after the last alert.
    pub state_ttl: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            threshold: Decimal::TEN,
            window_ms: 3_600_000,
            escalation_delta: Decimal::TWO,
            state_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl ThrottlePolicy {
    /// Whether a spread is wide enough to enter the state machine at all.
    #[must_use]
    pub fn qualifies(&self, spread: Decimal) -> bool {
        spread > self.threshold
    }

    /// Whether persisted state is older than the window at `now_ms`.
    #[must_use]
    pub fn is_stale(&self, state: &AlertState, now_ms: i64) -> bool {
        now_ms.saturating_sub(state.timestamp) > self.window_ms
    }

    /// Decide whether to alert for a spread given the prior state.
    ///
    /// Returns the priority to alert with, or `None` to stay quiet. When an
    /// alert is returned the caller must persist `AlertState::new(now_ms, spread)`.
    #[must_use]
    pub fn decide(
        &self,
        prior: Option<&AlertState>,
        spread: Decimal,
        now_ms: i64,
    ) -> Option<AlertPriority> {
        if !self.qualifies(spread) {
            return None;
        }

        match prior {
            None => Some(AlertPriority::Standard),
            Some(state) if self.is_stale(state, now_ms) => Some(AlertPriority::Standard),
            Some(state) if spread >= state.last_spread + self.escalation_delta => {
                Some(AlertPriority::High)
            }
            Some(_) => None,
        }
    }
}
