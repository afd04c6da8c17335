//! Cross-exchange funding spread opportunities.
//!
//! An [`Opportunity`] is built from one [`SymbolGroup`] with at least two
//! quotes. It records the highest and lowest 8-hour rates, the spread between
//! them in percent, the non-compounding annualized return, and the
//! long/short recommendation that collects the differential.

use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{SymbolGroup, SymbolGroups};
use super::error::DomainError;
use super::exchange::ExchangeId;
use super::observation::NormalizedObservation;
use super::symbol::Symbol;

/// Converts a rate fraction into percent.
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// 8-hour funding periods per day.
const PERIODS_PER_DAY: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Absolute spread between two 8-hour rates, in percent.
#[must_use]
pub fn spread_pct(a: Decimal, b: Decimal) -> Decimal {
    (a - b).abs() * PERCENT
}

/// Annualize an 8-hour percentage spread without compounding.
#[must_use]
pub fn net_apr(spread_8h_pct: Decimal) -> Decimal {
    spread_8h_pct * PERIODS_PER_DAY * DAYS_PER_YEAR
}

/// Recommendation string: long the cheap side, short the expensive side.
#[must_use]
pub fn recommendation(long: ExchangeId, short: ExchangeId) -> String {
    format!("Long {long} / Short {short}")
}

/// A detected funding spread for one symbol.
///
/// Immutable once built; opportunities are recomputed every poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    symbol: Symbol,
    #[serde(rename = "maxObservation")]
    max: NormalizedObservation,
    #[serde(rename = "minObservation")]
    min: NormalizedObservation,
    #[serde(rename = "deltaSpread8h")]
    delta_spread_8h: Decimal,
    net_apr: Decimal,
    recommendation: String,
    #[serde(rename = "exchanges")]
    observations: Vec<NormalizedObservation>,
}

impl Opportunity {
    /// Build an opportunity from a symbol group.
    ///
    /// A single pass tracks the maximum and minimum `rate_8h`; on ties the
    /// first observation in arrival order is kept.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GroupTooSmall` for groups with fewer than two
    /// observations.
    pub fn from_group(group: SymbolGroup) -> Result<Self, DomainError> {
        if !group.has_spread() {
            return Err(DomainError::GroupTooSmall {
                symbol: group.symbol().to_string(),
                count: group.len(),
            });
        }

        let symbol = group.symbol().clone();
        let observations = group.into_observations();

        let mut max_idx = 0;
        let mut min_idx = 0;
        for (i, obs) in observations.iter().enumerate().skip(1) {
            if obs.rate_8h > observations[max_idx].rate_8h {
                max_idx = i;
            }
            if obs.rate_8h < observations[min_idx].rate_8h {
                min_idx = i;
            }
        }

        let max = observations[max_idx].clone();
        let min = observations[min_idx].clone();
        let delta_spread_8h = spread_pct(max.rate_8h, min.rate_8h);

        Ok(Self {
            symbol,
            net_apr: net_apr(delta_spread_8h),
            recommendation: recommendation(min.exchange, max.exchange),
            delta_spread_8h,
            max,
            min,
            observations,
        })
    }

    /// Canonical symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Highest 8-hour rate: the side to short.
    pub fn max(&self) -> &NormalizedObservation {
        &self.max
    }

    /// Lowest 8-hour rate: the side to go long.
    pub fn min(&self) -> &NormalizedObservation {
        &self.min
    }

    /// Spread between the extrema, in percent per 8 hours.
    pub fn delta_spread_8h(&self) -> Decimal {
        self.delta_spread_8h
    }

    /// Non-compounding annualized spread, in percent.
    pub fn net_apr(&self) -> Decimal {
        self.net_apr
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    /// Every quote in the group, in arrival order.
    pub fn observations(&self) -> &[NormalizedObservation] {
        &self.observations
    }
}

/// Build opportunities for every group that has at least two quotes.
///
/// Single-quote groups are skipped, not reported as errors.
pub fn compute_opportunities(groups: SymbolGroups) -> Vec<Opportunity> {
    groups
        .into_iter()
        .filter(SymbolGroup::has_spread)
        .filter_map(|group| Opportunity::from_group(group).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{group_by_symbol, RawObservation};
    use rust_decimal_macros::dec;

    fn obs(exchange: ExchangeId, raw: &str, rate_8h: Decimal) -> Option<NormalizedObservation> {
        RawObservation::new(exchange, raw, rate_8h, dec!(8))
            .normalize()
            .unwrap()
    }

    fn single_group(items: Vec<Option<NormalizedObservation>>) -> SymbolGroup {
        group_by_symbol(items).into_iter().next().unwrap()
    }

    #[test]
    fn computes_extrema_spread_and_apr() {
        let group = single_group(vec![
            obs(ExchangeId::Binance, "BTCUSDT", dec!(0.0001)),
            obs(ExchangeId::Gate, "BTC_USDT", dec!(0.0009)),
            obs(ExchangeId::Okx, "BTC-USDT-SWAP", dec!(0.0005)),
        ]);

        let opp = Opportunity::from_group(group).unwrap();

        assert_eq!(opp.symbol().as_str(), "BTC-PERP");
        assert_eq!(opp.max().exchange, ExchangeId::Gate);
        assert_eq!(opp.min().exchange, ExchangeId::Binance);
        assert_eq!(opp.delta_spread_8h(), dec!(0.08));
        assert_eq!(opp.net_apr(), dec!(87.6));
        assert_eq!(opp.recommendation(), "Long Binance / Short Gate");
        assert_eq!(opp.observations().len(), 3);
    }

    #[test]
    fn ties_keep_first_encountered() {
        let group = single_group(vec![
            obs(ExchangeId::Bybit, "ETHUSDT", dec!(0.0003)),
            obs(ExchangeId::Binance, "ETHUSDT", dec!(0.0003)),
            obs(ExchangeId::Gate, "ETH_USDT", dec!(0.0001)),
            obs(ExchangeId::Okx, "ETH-USDT-SWAP", dec!(0.0001)),
        ]);

        let opp = Opportunity::from_group(group).unwrap();
        assert_eq!(opp.max().exchange, ExchangeId::Bybit);
        assert_eq!(opp.min().exchange, ExchangeId::Gate);
    }

    #[test]
    fn flat_group_has_zero_spread() {
        let group = single_group(vec![
            obs(ExchangeId::Bybit, "ETHUSDT", dec!(0.0001)),
            obs(ExchangeId::Binance, "ETHUSDT", dec!(0.0001)),
        ]);

        let opp = Opportunity::from_group(group).unwrap();
        assert_eq!(opp.delta_spread_8h(), Decimal::ZERO);
        assert_eq!(opp.max().exchange, ExchangeId::Bybit);
        assert_eq!(opp.min().exchange, ExchangeId::Bybit);
    }

    #[test]
    fn negative_rates_are_handled() {
        let group = single_group(vec![
            obs(ExchangeId::Bybit, "SOLUSDT", dec!(-0.0020)),
            obs(ExchangeId::Binance, "SOLUSDT", dec!(0.0005)),
        ]);

        let opp = Opportunity::from_group(group).unwrap();
        assert_eq!(opp.delta_spread_8h(), dec!(0.25));
        assert_eq!(opp.recommendation(), "Long Bybit / Short Binance");
    }

    #[test]
    fn spread_is_symmetric() {
        let pairs = [
            (dec!(0.0001), dec!(0.0009)),
            (dec!(-0.003), dec!(0.002)),
            (dec!(0.5), dec!(0.5)),
        ];
        for (a, b) in pairs {
            assert_eq!(spread_pct(a, b), spread_pct(b, a));
            assert!(spread_pct(a, b) >= Decimal::ZERO);
        }
    }

    #[test]
    fn single_observation_group_is_rejected() {
        let group = single_group(vec![obs(ExchangeId::Bybit, "ETHUSDT", dec!(0.0001))]);
        assert!(matches!(
            Opportunity::from_group(group),
            Err(DomainError::GroupTooSmall { count: 1, .. })
        ));
    }

    #[test]
    fn compute_skips_singletons() {
        let groups = group_by_symbol(vec![
            obs(ExchangeId::Binance, "BTCUSDT", dec!(0.0001)),
            obs(ExchangeId::Bybit, "BTCUSDT", dec!(0.0002)),
            obs(ExchangeId::Gate, "DOGE_USDT", dec!(0.0100)),
        ]);

        let opps = compute_opportunities(groups);
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].symbol().as_str(), "BTC-PERP");
    }

    #[test]
    fn serializes_record_shape() {
        let group = single_group(vec![
            obs(ExchangeId::Binance, "BTCUSDT", dec!(0.0001)),
            obs(ExchangeId::Bybit, "BTCUSDT", dec!(0.0002)),
        ]);
        let json = serde_json::to_value(Opportunity::from_group(group).unwrap()).unwrap();

        assert_eq!(json["symbol"], "BTC-PERP");
        assert_eq!(json["maxObservation"]["exchange"], "bybit");
        assert_eq!(json["minObservation"]["exchange"], "binance");
        assert!(json.get("deltaSpread8h").is_some());
        assert!(json.get("netApr").is_some());
        assert_eq!(json["exchanges"].as_array().unwrap().len(), 2);
    }
}
