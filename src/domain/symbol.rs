//! Canonical symbols and per-exchange standardization rules.
//!
//! Every venue names the same perpetual differently (`1000PEPEUSDT`,
//! `PEPE_USDT`, `PEPE-USDT-SWAP`, `PEPE`). Standardization maps each raw
//! name to one exchange-agnostic symbol such as `PEPE-PERP`, or rejects
//! it when it is not a USD(T)-margined perpetual the scanner understands.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::exchange::ExchangeId;

/// Suffix appended to every canonical symbol.
pub const PERP_SUFFIX: &str = "-PERP";

/// Contract-size multiplier prefixes, longest first.
const SIZE_PREFIXES: &[&str] = &["10000", "1000"];

/// Exchange-agnostic market identifier, e.g. `BTC-PERP`.
///
/// The inner String is private so every symbol goes through [`standardize`]
/// or an explicit constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol from an already canonical name.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// How one exchange spells its perpetual markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRule {
    /// Quote suffix the raw symbol must end with. `None` accepts bare names.
    pub quote_suffix: Option<&'static str>,
    /// Size-multiplier prefixes to strip from the base, checked in order.
    pub strip_prefixes: &'static [&'static str],
}

const USDT_LINEAR: SymbolRule = SymbolRule {
    quote_suffix: Some("USDT"),
    strip_prefixes: SIZE_PREFIXES,
};

const UNDERSCORE_USDT: SymbolRule = SymbolRule {
    quote_suffix: Some("_USDT"),
    strip_prefixes: SIZE_PREFIXES,
};

const DASH_USDT_SWAP: SymbolRule = SymbolRule {
    quote_suffix: Some("-USDT-SWAP"),
    strip_prefixes: SIZE_PREFIXES,
};

const DASH_USD_PERP: SymbolRule = SymbolRule {
    quote_suffix: Some("-USD-PERP"),
    strip_prefixes: SIZE_PREFIXES,
};

const BARE_NAME: SymbolRule = SymbolRule {
    quote_suffix: None,
    strip_prefixes: &[],
};

impl SymbolRule {
    /// The rule a given exchange's symbols follow.
    #[must_use]
    pub const fn for_exchange(exchange: ExchangeId) -> Self {
        match exchange {
            ExchangeId::Binance | ExchangeId::Bybit | ExchangeId::Bitget => USDT_LINEAR,
            ExchangeId::Gate => UNDERSCORE_USDT,
            ExchangeId::Okx => DASH_USDT_SWAP,
            ExchangeId::Paradex => DASH_USD_PERP,
            ExchangeId::Hyperliquid | ExchangeId::Lighter | ExchangeId::Variational => BARE_NAME,
        }
    }

    /// Extract the base asset from a raw symbol, or `None` if it does not match.
    #[must_use]
    pub fn base<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let mut base = match self.quote_suffix {
            Some(suffix) => raw.strip_suffix(suffix)?,
            None => raw,
        };

        if let Some(rest) = self
            .strip_prefixes
            .iter()
            .find_map(|prefix| base.strip_prefix(*prefix))
        {
            base = rest;
        }

        (!base.is_empty()).then_some(base)
    }
}

/// Map an exchange's raw symbol to its canonical form.
///
/// Returns `None` for markets outside the exchange's recognized quote
/// pattern, which the caller silently drops.
#[must_use]
pub fn standardize(exchange: ExchangeId, raw: &str) -> Option<Symbol> {
    SymbolRule::for_exchange(exchange)
        .base(raw)
        .map(|base| Symbol(format!("{base}{PERP_SUFFIX}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(exchange: ExchangeId, raw: &str) -> Option<String> {
        standardize(exchange, raw).map(|s| s.as_str().to_string())
    }

    #[test]
    fn usdt_linear_strips_suffix() {
        assert_eq!(canon(ExchangeId::Binance, "BTCUSDT").as_deref(), Some("BTC-PERP"));
        assert_eq!(canon(ExchangeId::Bybit, "ETHUSDT").as_deref(), Some("ETH-PERP"));
        assert_eq!(canon(ExchangeId::Bitget, "SOLUSDT").as_deref(), Some("SOL-PERP"));
    }

    #[test]
    fn usdt_linear_strips_size_prefix() {
        assert_eq!(canon(ExchangeId::Binance, "1000PEPEUSDT").as_deref(), Some("PEPE-PERP"));
        assert_eq!(canon(ExchangeId::Bybit, "10000SATSUSDT").as_deref(), Some("SATS-PERP"));
    }

    #[test]
    fn longer_prefix_wins() {
        // "10000X" must lose all five digits, not just "1000" leaving "0X".
        assert_eq!(canon(ExchangeId::Binance, "10000XUSDT").as_deref(), Some("X-PERP"));
    }

    #[test]
    fn wrong_quote_asset_is_rejected() {
        assert_eq!(canon(ExchangeId::Binance, "BTCUSD"), None);
        assert_eq!(canon(ExchangeId::Binance, "BTCUSDC"), None);
        assert_eq!(canon(ExchangeId::Gate, "BTC_USD"), None);
        assert_eq!(canon(ExchangeId::Okx, "BTC-USD-SWAP"), None);
        assert_eq!(canon(ExchangeId::Paradex, "BTC-USD-OPTION"), None);
    }

    #[test]
    fn gate_underscore_symbols() {
        assert_eq!(canon(ExchangeId::Gate, "BTC_USDT").as_deref(), Some("BTC-PERP"));
        assert_eq!(canon(ExchangeId::Gate, "1000BONK_USDT").as_deref(), Some("BONK-PERP"));
    }

    #[test]
    fn okx_swap_symbols() {
        assert_eq!(canon(ExchangeId::Okx, "BTC-USDT-SWAP").as_deref(), Some("BTC-PERP"));
        assert_eq!(canon(ExchangeId::Okx, "1000BONK-USDT-SWAP").as_deref(), Some("BONK-PERP"));
    }

    #[test]
    fn paradex_perp_symbols() {
        assert_eq!(canon(ExchangeId::Paradex, "ETH-USD-PERP").as_deref(), Some("ETH-PERP"));
    }

    #[test]
    fn bare_names_always_match() {
        assert_eq!(canon(ExchangeId::Hyperliquid, "BTC").as_deref(), Some("BTC-PERP"));
        assert_eq!(canon(ExchangeId::Lighter, "kPEPE").as_deref(), Some("kPEPE-PERP"));
        // Bare-name venues keep size prefixes verbatim.
        assert_eq!(canon(ExchangeId::Hyperliquid, "1000X").as_deref(), Some("1000X-PERP"));
    }

    #[test]
    fn empty_base_is_rejected() {
        assert_eq!(canon(ExchangeId::Hyperliquid, ""), None);
        assert_eq!(canon(ExchangeId::Binance, "USDT"), None);
        assert_eq!(canon(ExchangeId::Binance, "1000USDT"), None);
    }

    #[test]
    fn suffix_must_be_at_the_end() {
        assert_eq!(canon(ExchangeId::Binance, "USDTBTC"), None);
    }
}
