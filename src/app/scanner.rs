//! Poll-cycle service.
//!
//! One cycle fetches every source concurrently, turns the combined quotes
//! into ranked opportunities, and, when a throttle is attached, emits the
//! alerts it lets through. Cycles are serialized on an internal lock so two
//! overlapping cycles can never both read stale alert state for a symbol.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapter::notifier::NotifierRegistry;
use crate::app::throttle::AlertThrottle;
use crate::domain::{process_observations, ExchangeId, Opportunity};
use crate::error::{Error, Result};
use crate::port::{AlertEvent, Event, FundingSource};

/// Outcome of fetching one exchange during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub exchange: ExchangeId,
    /// Raw observations returned; zero when the fetch failed.
    pub observations: usize,
    pub failed: bool,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Widest spread first.
    pub opportunities: Vec<Opportunity>,
    /// One entry per source, in source order.
    pub sources: Vec<SourceReport>,
    /// Alerts emitted this cycle, in ranked order.
    pub alerts: Vec<AlertEvent>,
}

impl CycleReport {
    /// Total raw observations across sources.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.sources.iter().map(|s| s.observations).sum()
    }

    /// Exchanges whose fetch failed.
    pub fn failed_exchanges(&self) -> impl Iterator<Item = ExchangeId> + '_ {
        self.sources.iter().filter(|s| s.failed).map(|s| s.exchange)
    }
}

pub struct Scanner {
    sources: Vec<Box<dyn FundingSource>>,
    throttle: Option<AlertThrottle>,
    notifiers: Arc<NotifierRegistry>,
    cycle_lock: Mutex<()>,
}

impl Scanner {
    /// Scanner over `sources` with no throttle and no notifiers.
    pub fn new(sources: Vec<Box<dyn FundingSource>>) -> Self {
        Self {
            sources,
            throttle: None,
            notifiers: Arc::new(NotifierRegistry::new()),
            cycle_lock: Mutex::new(()),
        }
    }

    /// Evaluate alerts through `throttle` every cycle.
    #[must_use]
    pub fn with_throttle(mut self, throttle: AlertThrottle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    #[must_use]
    pub fn with_notifiers(mut self, notifiers: Arc<NotifierRegistry>) -> Self {
        self.notifiers = notifiers;
        self
    }

    pub fn notifiers(&self) -> &Arc<NotifierRegistry> {
        &self.notifiers
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run one poll cycle at `now_ms` (epoch milliseconds).
    ///
    /// A failing source contributes nothing and is recorded in the report.
    /// A store failure skips that symbol's alert only.
    ///
    /// # Errors
    ///
    /// Returns `Error::Aggregation` when the combined observations violate
    /// the observation contract; no partial result is produced.
    pub async fn run_cycle(&self, now_ms: i64) -> Result<CycleReport> {
        let _cycle = self.cycle_lock.lock().await;

        let fetches = self.sources.iter().map(|source| async move {
            let exchange = source.exchange();
            (exchange, source.fetch().await)
        });
        let results = join_all(fetches).await;

        let mut raw = Vec::new();
        let mut sources = Vec::with_capacity(results.len());
        for (exchange, result) in results {
            match result {
                Ok(observations) => {
                    debug!(exchange = %exchange, count = observations.len(), "Source fetched");
                    sources.push(SourceReport {
                        exchange,
                        observations: observations.len(),
                        failed: false,
                    });
                    raw.extend(observations);
                }
                Err(e) => {
                    warn!(exchange = %exchange, error = %e, "Source fetch failed, continuing without it");
                    sources.push(SourceReport {
                        exchange,
                        observations: 0,
                        failed: true,
                    });
                }
            }
        }

        let opportunities =
            process_observations(raw).map_err(|e| Error::Aggregation(e.to_string()))?;

        let alerts = match &self.throttle {
            Some(throttle) => self.emit_alerts(throttle, &opportunities, now_ms).await,
            None => Vec::new(),
        };

        info!(
            sources = sources.len(),
            failed = sources.iter().filter(|s| s.failed).count(),
            opportunities = opportunities.len(),
            alerts = alerts.len(),
            top_spread = %opportunities
                .first()
                .map(|o| o.delta_spread_8h().round_dp(4))
                .unwrap_or_default(),
            "Poll cycle complete"
        );

        Ok(CycleReport {
            opportunities,
            sources,
            alerts,
        })
    }

    async fn emit_alerts(
        &self,
        throttle: &AlertThrottle,
        opportunities: &[Opportunity],
        now_ms: i64,
    ) -> Vec<AlertEvent> {
        let mut alerts = Vec::new();

        for opportunity in opportunities {
            match throttle.evaluate(opportunity, now_ms).await {
                Ok(Some(priority)) => {
                    info!(
                        symbol = %opportunity.symbol(),
                        priority = %priority,
                        spread = %opportunity.delta_spread_8h().round_dp(4),
                        "Alert triggered"
                    );
                    let event = AlertEvent::new(priority, opportunity);
                    self.notifiers
                        .notify_all(Event::ArbitrageAlert(event.clone()));
                    alerts.push(event);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        symbol = %opportunity.symbol(),
                        error = %e,
                        "Alert state unavailable, skipping alert"
                    );
                }
            }
        }

        alerts
    }
}
