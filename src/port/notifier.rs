//! Notifier port for event notifications.
//!
//! This module defines the trait for sending notifications about
//! throttled spread alerts and periodic top-N digests.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use rust_decimal::Decimal;

use crate::domain::{AlertPriority, ExchangeId, NormalizedObservation, Opportunity};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A spread passed the throttle and should be announced.
    ArbitrageAlert(AlertEvent),
    /// Periodic summary of the widest spreads.
    Digest(DigestEvent),
}

/// One side of a recommended position.
#[derive(Debug, Clone, PartialEq)]
pub struct LegEvent {
    /// Venue to trade on.
    pub exchange: ExchangeId,
    /// Funding rate per interval as the venue reports it.
    pub raw_rate: Decimal,
    /// Funding interval in hours.
    pub interval_hours: Decimal,
    /// 8-hour equivalent rate.
    pub rate_8h: Decimal,
}

impl From<&NormalizedObservation> for LegEvent {
    fn from(obs: &NormalizedObservation) -> Self {
        Self {
            exchange: obs.exchange,
            raw_rate: obs.raw_rate,
            interval_hours: obs.interval_hours,
            rate_8h: obs.rate_8h,
        }
    }
}

/// Snapshot of an opportunity for notification payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityEvent {
    /// Canonical symbol.
    pub symbol: String,
    /// Spread in percent per 8 hours.
    pub spread: Decimal,
    /// Non-compounding annualized spread in percent.
    pub net_apr: Decimal,
    /// Human-readable action.
    pub recommendation: String,
    /// Low-funding side.
    pub long: LegEvent,
    /// High-funding side.
    pub short: LegEvent,
}

impl From<&Opportunity> for OpportunityEvent {
    fn from(opp: &Opportunity) -> Self {
        Self {
            symbol: opp.symbol().to_string(),
            spread: opp.delta_spread_8h(),
            net_apr: opp.net_apr(),
            recommendation: opp.recommendation().to_string(),
            long: LegEvent::from(opp.min()),
            short: LegEvent::from(opp.max()),
        }
    }
}

/// Throttled spread alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    /// Why the throttle let this through.
    pub priority: AlertPriority,
    /// The opportunity being announced.
    pub opportunity: OpportunityEvent,
}

impl AlertEvent {
    /// Create an alert for an opportunity.
    #[must_use]
    pub fn new(priority: AlertPriority, opportunity: &Opportunity) -> Self {
        Self {
            priority,
            opportunity: OpportunityEvent::from(opportunity),
        }
    }
}

/// Periodic top-N summary.
#[derive(Debug, Clone)]
pub struct DigestEvent {
    /// When the underlying cycle ran.
    pub generated_at: DateTime<Utc>,
    /// Widest spreads first.
    pub opportunities: Vec<OpportunityEvent>,
}

impl DigestEvent {
    /// Build a digest from the first `top_n` ranked opportunities.
    #[must_use]
    pub fn from_ranked(
        generated_at: DateTime<Utc>,
        ranked: &[Opportunity],
        top_n: usize,
    ) -> Self {
        Self {
            generated_at,
            opportunities: ranked.iter().take(top_n).map(OpportunityEvent::from).collect(),
        }
    }
}

/// Trait for notification handlers.
///
/// Implement this trait to receive events from the system.
/// Notifications are fire-and-forget (async but not awaited).
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Delivery failures are the implementation's to log; they never reach
///   the scanner
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);

    /// Stop accepting events.
    ///
    /// Notifiers that deliver from a background task return a future that
    /// resolves once everything queued before the call has been handled.
    fn close(&self) -> Option<BoxFuture<'static, ()>> {
        None
    }
}
