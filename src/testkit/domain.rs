//! Builders for domain primitives used across tests.

use rust_decimal::Decimal;

use crate::domain::{process_observations, ExchangeId, Opportunity, RawObservation};

/// Raw observation on an 8-hour interval.
pub fn obs_8h(exchange: ExchangeId, raw_symbol: &str, raw_rate: Decimal) -> RawObservation {
    RawObservation::new(exchange, raw_symbol, raw_rate, Decimal::from(8))
}

/// Raw observation on a 1-hour interval.
pub fn obs_1h(exchange: ExchangeId, raw_symbol: &str, raw_rate: Decimal) -> RawObservation {
    RawObservation::new(exchange, raw_symbol, raw_rate, Decimal::ONE)
}

/// Two Binance/Bybit 8h quotes for `base` whose spread is `spread_pct` percent.
///
/// Binance quotes zero, so it is always the long leg.
pub fn spread_pair(base: &str, spread_pct: Decimal) -> Vec<RawObservation> {
    let symbol = format!("{base}USDT");
    vec![
        obs_8h(ExchangeId::Binance, &symbol, Decimal::ZERO),
        obs_8h(ExchangeId::Bybit, &symbol, spread_pct / Decimal::ONE_HUNDRED),
    ]
}

/// Single opportunity for `base` with the given spread.
///
/// # Panics
///
/// Never for valid input; the builder only produces positive intervals.
pub fn opportunity(base: &str, spread_pct: Decimal) -> Opportunity {
    process_observations(spread_pair(base, spread_pct))
        .expect("valid observations")
        .remove(0)
}
