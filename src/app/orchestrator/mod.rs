//! App orchestration module.
//!
//! Drives the poll loop: one scanner cycle per tick, alerts emitted by the
//! scanner, and the optional periodic digest.

mod builder;
mod digest;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::signal;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::adapter::notifier::{NotifierRegistry, SHUTDOWN_TIMEOUT};
use crate::app::config::Config;
use crate::app::scanner::{CycleReport, Scanner};
use crate::error::Result;
use crate::port::{DigestEvent, Event};

pub use builder::build_read_only_scanner;
use builder::{build_alerting_scanner, build_notifier_registry};
use digest::DigestSchedule;

/// Options for [`App::run`] that do not live in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Run a single cycle and return.
    pub once: bool,
}

/// Main application entry point.
pub struct App;

impl App {
    /// Run poll cycles until Ctrl-C, or once with `RunOptions::once`.
    ///
    /// # Errors
    ///
    /// See [`App::run_until`].
    pub async fn run(config: Config, options: RunOptions) -> Result<()> {
        Self::run_until(config, options, async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
            }
            info!("Shutdown signal received");
        })
        .await
    }

    /// Run poll cycles until `shutdown` resolves.
    ///
    /// A cycle in progress finishes before shutdown is honored. On every
    /// exit path the notifiers are drained so alerts from the last cycle
    /// are delivered.
    ///
    /// # Errors
    ///
    /// Startup failures (store, configuration) are returned. In loop mode a
    /// failed cycle is logged and the loop continues; with `once` it is
    /// returned.
    pub async fn run_until<F>(config: Config, options: RunOptions, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            exchanges = ?config.exchanges.enabled,
            interval_secs = config.scan.interval_secs,
            alerts = config.alert.enabled,
            digest = config.digest.enabled,
            "Starting fundwatch"
        );

        let notifiers = Arc::new(build_notifier_registry(&config));
        info!(notifiers = notifiers.len(), "Notifiers initialized");

        let result = match build_alerting_scanner(&config, notifiers.clone()) {
            Ok(scanner) => poll(&config, options, &scanner, &notifiers, shutdown).await,
            Err(e) => Err(e),
        };

        notifiers.shutdown(SHUTDOWN_TIMEOUT).await;
        result
    }
}

async fn poll<F>(
    config: &Config,
    options: RunOptions,
    scanner: &Scanner,
    notifiers: &NotifierRegistry,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut digest = config
        .digest
        .enabled
        .then(|| DigestSchedule::new(config.digest.interval()));

    let mut ticker = interval(config.scan.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => return Ok(()),
            _ = ticker.tick() => {}
        }

        let now = Utc::now();
        match scanner.run_cycle(now.timestamp_millis()).await {
            Ok(report) => {
                if let Some(schedule) = digest.as_mut() {
                    send_digest_if_due(schedule, notifiers, &report, config.digest.top_n, now);
                }
            }
            Err(e) if options.once => return Err(e),
            Err(e) => error!(error = %e, "Poll cycle failed"),
        }

        if options.once {
            return Ok(());
        }
    }
}

fn send_digest_if_due(
    schedule: &mut DigestSchedule,
    notifiers: &NotifierRegistry,
    report: &CycleReport,
    top_n: usize,
    generated_at: chrono::DateTime<Utc>,
) {
    let now = Instant::now();
    if report.opportunities.is_empty() || !schedule.is_due(now) {
        return;
    }

    let event = DigestEvent::from_ranked(generated_at, &report.opportunities, top_n);
    info!(count = event.opportunities.len(), "Sending digest");
    notifiers.notify_all(Event::Digest(event));
    schedule.mark_sent(now);
}
