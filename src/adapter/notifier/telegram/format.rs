//! Message formatting for Telegram notifications.
//!
//! Messages use Telegram's HTML parse mode.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::AlertPriority;
use crate::port::{AlertEvent, DigestEvent, Event, LegEvent};

use super::notifier::TelegramConfig;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Format an event into a Telegram message, or None if the event should be skipped.
pub fn format_event_message(event: &Event, config: &TelegramConfig) -> Option<String> {
    match event {
        Event::ArbitrageAlert(e) if config.notify_alerts => Some(format_alert(e)),
        Event::Digest(e) if config.notify_digest && !e.opportunities.is_empty() => {
            Some(format_digest(e))
        }
        _ => None,
    }
}

fn priority_label(priority: AlertPriority) -> &'static str {
    match priority {
        AlertPriority::Standard => "STANDARD",
        AlertPriority::High => "HIGH-PRIORITY 🚀",
    }
}

/// Fixed-point rendering, rounding half away from zero.
fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Raw rate as a percentage with four decimals.
fn rate_pct(rate: Decimal) -> String {
    fixed(rate * Decimal::ONE_HUNDRED, 4)
}

fn hours(interval: Decimal) -> String {
    interval.normalize().to_string()
}

fn format_alert(e: &AlertEvent) -> String {
    let opp = &e.opportunity;
    let leg = |label: &str, leg: &LegEvent| {
        format!(
            "{label}: {} at {}% ({}h)",
            leg.exchange,
            rate_pct(leg.raw_rate),
            hours(leg.interval_hours)
        )
    };

    format!(
        "<b>{} Arbitrage Alert: {}</b>\n\
        Spread: <b>{}%</b> (8h)\n\
        Action: {}\n\
        {}\n\
        {}",
        priority_label(e.priority),
        escape_html(&opp.symbol),
        fixed(opp.spread, 2),
        escape_html(&opp.recommendation),
        leg("Short", &opp.short),
        leg("Long", &opp.long),
    )
}

fn medal(rank: usize) -> String {
    match rank {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => format!("#{}", n + 1),
    }
}

fn format_digest(e: &DigestEvent) -> String {
    let mut msg = format!(
        "🔔 <b>Funding Rate Digest</b>\n📅 {} UTC\n{RULE}\n\n",
        e.generated_at.format("%d %b %Y • %H:%M")
    );

    for (i, opp) in e.opportunities.iter().enumerate() {
        msg.push_str(&format!(
            "{} <b>{}</b>\n   📊 Spread: <b>{}%</b> (8h)\n   💰 Net APR: <b>+{}%</b>\n   🟢 Long: {} ({}% / {}h)\n   🔴 Short: {} ({}% / {}h)\n\n",
            medal(i),
            escape_html(&opp.symbol),
            fixed(opp.spread, 4),
            fixed(opp.net_apr, 2),
            opp.long.exchange,
            rate_pct(opp.long.raw_rate),
            hours(opp.long.interval_hours),
            opp.short.exchange,
            rate_pct(opp.short.raw_rate),
            hours(opp.short.interval_hours),
        ));
    }

    msg.push_str(RULE);
    msg
}

/// Escape text for Telegram's HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
