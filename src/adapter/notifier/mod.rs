//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.

#[cfg(feature = "telegram")]
mod telegram;

#[cfg(feature = "telegram")]
pub use telegram::{format_event_message, parse_chat_ids, TelegramConfig, TelegramNotifier};

use std::time::Duration;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::port::{Event, Notifier};

/// Upper bound on how long shutdown waits for queued notifications.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Registry of notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Close every notifier and wait for queued events to be delivered.
    ///
    /// Gives up after `timeout`; anything still queued is logged as lost.
    pub async fn shutdown(&self, timeout: Duration) {
        let pending: Vec<_> = self.notifiers.iter().filter_map(|n| n.close()).collect();
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        if tokio::time::timeout(timeout, join_all(pending)).await.is_err() {
            warn!(
                notifiers = count,
                timeout_secs = timeout.as_secs(),
                "Notifier shutdown timed out, queued notifications may be lost"
            );
        } else {
            info!(notifiers = count, "Notifiers drained");
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::ArbitrageAlert(e) => {
                let opp = &e.opportunity;
                info!(
                    priority = %e.priority,
                    symbol = %opp.symbol,
                    spread = %opp.spread.round_dp(4),
                    net_apr = %opp.net_apr.round_dp(2),
                    long = %opp.long.exchange,
                    short = %opp.short.exchange,
                    "Arbitrage alert"
                );
            }
            Event::Digest(e) => {
                let top = e.opportunities.first();
                info!(
                    count = e.opportunities.len(),
                    top_symbol = top.map_or("-", |o| o.symbol.as_str()),
                    top_spread = %top.map(|o| o.spread.round_dp(4)).unwrap_or_default(),
                    generated_at = %e.generated_at,
                    "Funding digest"
                );
            }
        }
    }
}
