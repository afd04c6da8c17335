//! Handler for the `scan` command.
//!
//! One read-only cycle: no throttle, no alert store, no notifications.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

use crate::app::{build_read_only_scanner, Config};
use crate::cli::{output, ScanArgs};
use crate::domain::{NormalizedObservation, Opportunity};
use crate::error::Result;

#[derive(Tabled)]
struct OpportunityRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Spread (8h %)")]
    spread: String,
    #[tabled(rename = "Net APR %")]
    net_apr: String,
    #[tabled(rename = "Long")]
    long: String,
    #[tabled(rename = "Short")]
    short: String,
}

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

fn leg(obs: &NormalizedObservation) -> String {
    format!(
        "{} {}% ({}h)",
        obs.exchange,
        fixed(obs.raw_rate * Decimal::ONE_HUNDRED, 4),
        obs.interval_hours.normalize()
    )
}

fn rows(opportunities: &[Opportunity]) -> Vec<OpportunityRow> {
    opportunities
        .iter()
        .enumerate()
        .map(|(i, opp)| OpportunityRow {
            rank: i + 1,
            symbol: opp.symbol().to_string(),
            spread: fixed(opp.delta_spread_8h(), 4),
            net_apr: fixed(opp.net_apr(), 2),
            long: leg(opp.min()),
            short: leg(opp.max()),
        })
        .collect()
}

/// Execute the scan command.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;

    // stdout carries the table or JSON; logs only on request, to stderr
    if let Some(ref level) = args.log_level {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(level))
            .with_writer(std::io::stderr)
            .init();
    }

    let scanner = build_read_only_scanner(&config);
    let report = scanner.run_cycle(Utc::now().timestamp_millis()).await?;

    let shown = match args.top {
        Some(n) => &report.opportunities[..n.min(report.opportunities.len())],
        None => &report.opportunities[..],
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    output::section("Funding spreads");
    output::key_value("Exchanges", report.sources.len());
    output::key_value("Quotes", report.observation_count());
    output::key_value("Symbols", report.opportunities.len());
    for exchange in report.failed_exchanges() {
        output::warn(&format!("{exchange} unavailable this cycle"));
    }
    println!();

    if shown.is_empty() {
        output::note("No symbol is listed on two or more exchanges.");
        return Ok(());
    }

    let table = Table::new(rows(shown)).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
    println!();

    Ok(())
}
