//! Exchange identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Perpetual-futures venues the scanner knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    Binance,
    Bybit,
    Gate,
    Okx,
    Bitget,
    Hyperliquid,
    Lighter,
    Paradex,
    Variational,
}

impl ExchangeId {
    /// Every supported venue, in default polling order.
    pub const ALL: [ExchangeId; 9] = [
        ExchangeId::Binance,
        ExchangeId::Hyperliquid,
        ExchangeId::Bybit,
        ExchangeId::Gate,
        ExchangeId::Okx,
        ExchangeId::Bitget,
        ExchangeId::Lighter,
        ExchangeId::Paradex,
        ExchangeId::Variational,
    ];

    /// Display name used in recommendations and notifications.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::Bybit => "Bybit",
            Self::Gate => "Gate",
            Self::Okx => "OKX",
            Self::Bitget => "Bitget",
            Self::Hyperliquid => "Hyperliquid",
            Self::Lighter => "Lighter",
            Self::Paradex => "Paradex",
            Self::Variational => "Variational",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExchangeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown exchange '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_venue_name() {
        assert_eq!(ExchangeId::Okx.to_string(), "OKX");
        assert_eq!(ExchangeId::Hyperliquid.to_string(), "Hyperliquid");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("okx".parse::<ExchangeId>(), Ok(ExchangeId::Okx));
        assert_eq!(" Binance ".parse::<ExchangeId>(), Ok(ExchangeId::Binance));
        assert!("kraken".parse::<ExchangeId>().is_err());
    }

    #[test]
    fn deserializes_lowercase() {
        let id: ExchangeId = serde_json::from_str("\"paradex\"").unwrap();
        assert_eq!(id, ExchangeId::Paradex);
    }
}
