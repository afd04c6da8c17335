//! Opportunity ranking.

use super::opportunity::Opportunity;

/// Sort opportunities by spread, widest first.
///
/// The sort is stable: equal spreads keep their input order.
pub fn rank_opportunities(mut opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
    opportunities.sort_by(|a, b| b.delta_spread_8h().cmp(&a.delta_spread_8h()));
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{compute_opportunities, group_by_symbol, ExchangeId, RawObservation};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn pair(base: &str, low: Decimal, high: Decimal) -> Vec<RawObservation> {
        vec![
            RawObservation::new(ExchangeId::Binance, format!("{base}USDT"), low, dec!(8)),
            RawObservation::new(ExchangeId::Hyperliquid, base, high, dec!(8)),
        ]
    }

    fn ranked(raw: Vec<RawObservation>) -> Vec<Opportunity> {
        let normalized = raw.into_iter().map(|r| r.normalize().unwrap());
        rank_opportunities(compute_opportunities(group_by_symbol(normalized)))
    }

    #[test]
    fn sorts_descending_by_spread() {
        let mut raw = pair("BTC", dec!(0.0001), dec!(0.0002));
        raw.extend(pair("ETH", dec!(0.0001), dec!(0.0011)));
        raw.extend(pair("SOL", dec!(0.0001), dec!(0.0006)));

        let symbols: Vec<_> = ranked(raw)
            .iter()
            .map(|o| o.symbol().to_string())
            .collect();
        assert_eq!(symbols, vec!["ETH-PERP", "SOL-PERP", "BTC-PERP"]);
    }

    #[test]
    fn equal_spreads_keep_input_order() {
        let mut raw = pair("ZEC", dec!(0.0001), dec!(0.0003));
        raw.extend(pair("ADA", dec!(0.0001), dec!(0.0003)));
        raw.extend(pair("MNT", dec!(0.0002), dec!(0.0004)));

        let symbols: Vec<_> = ranked(raw)
            .iter()
            .map(|o| o.symbol().to_string())
            .collect();
        assert_eq!(symbols, vec!["ZEC-PERP", "ADA-PERP", "MNT-PERP"]);
    }

    #[test]
    fn output_is_non_increasing() {
        let mut raw = Vec::new();
        for (i, base) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            let high = Decimal::new(((i * 7) % 5) as i64 + 1, 4);
            raw.extend(pair(base, Decimal::ZERO, high));
        }

        let opps = ranked(raw);
        assert_eq!(opps.len(), 6);
        assert!(opps
            .windows(2)
            .all(|w| w[0].delta_spread_8h() >= w[1].delta_spread_8h()));
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(rank_opportunities(Vec::new()).is_empty());
    }
}
