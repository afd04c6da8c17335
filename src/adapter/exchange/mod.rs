//! Funding-rate sources for each supported venue.
//!
//! Every adapter implements [`FundingSource`] and keeps its response parsing
//! in a pure `parse_*` function so fixtures can be tested without the
//! network. Adapters only report what the venue says; symbol
//! standardization and 8-hour normalization happen in the domain.

mod binance;
mod bitget;
mod bybit;
mod gate;
mod hyperliquid;
mod lighter;
mod okx;
mod paradex;
mod variational;

pub use binance::{parse_binance, BinanceSource};
pub use bitget::{parse_bitget, BitgetSource};
pub use bybit::{parse_bybit, BybitSource};
pub use gate::{parse_gate, GateSource};
pub use hyperliquid::{parse_hyperliquid, HyperliquidSource};
pub use lighter::{parse_lighter, LighterSource};
pub use okx::{parse_okx, OkxSource, OKX_INSTRUMENTS};
pub use paradex::{parse_paradex, ParadexSource};
pub use variational::{parse_variational, VariationalSource};

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ExchangeId;
use crate::error::Result;
use crate::port::FundingSource;

const HOUR_MS: i64 = 3_600_000;

/// Build the HTTP client shared by every adapter.
#[must_use]
pub fn http_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!("fundwatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        })
}

/// Create the adapter for one exchange.
#[must_use]
pub fn build_source(exchange: ExchangeId, http: HttpClient) -> Box<dyn FundingSource> {
    match exchange {
        ExchangeId::Binance => Box::new(BinanceSource::new(http)),
        ExchangeId::Bybit => Box::new(BybitSource::new(http)),
        ExchangeId::Gate => Box::new(GateSource::new(http)),
        ExchangeId::Okx => Box::new(OkxSource::new(http)),
        ExchangeId::Bitget => Box::new(BitgetSource::new(http)),
        ExchangeId::Hyperliquid => Box::new(HyperliquidSource::new(http)),
        ExchangeId::Lighter => Box::new(LighterSource::new(http)),
        ExchangeId::Paradex => Box::new(ParadexSource::new(http)),
        ExchangeId::Variational => Box::new(VariationalSource::new(http)),
    }
}

/// Create adapters for the enabled exchanges, in the given order.
///
/// Duplicate entries are collapsed.
#[must_use]
pub fn build_sources(enabled: &[ExchangeId], http: &HttpClient) -> Vec<Box<dyn FundingSource>> {
    let mut seen = Vec::with_capacity(enabled.len());
    for exchange in enabled {
        if !seen.contains(exchange) {
            seen.push(*exchange);
        }
    }
    seen.into_iter()
        .map(|exchange| build_source(exchange, http.clone()))
        .collect()
}

/// GET a URL and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(http: &HttpClient, url: &str) -> Result<T> {
    debug!(url = %url, "GET");
    let body = http.get(url).send().await?.error_for_status()?.json().await?;
    Ok(body)
}

/// Start of the next UTC hour after `now_ms`.
pub(crate) fn next_hour_ms(now_ms: i64) -> i64 {
    (now_ms.div_euclid(HOUR_MS) + 1) * HOUR_MS
}

/// Parse a decimal from a JSON string or number.
///
/// Venues disagree on whether numbers are quoted, and some use scientific
/// notation for small rates.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Parse an integer from a JSON string or number.
pub(crate) fn i64_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Serde helper for optional decimals that may arrive quoted or bare.
///
/// Unparseable values become `None` instead of failing the whole payload.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// Serde helper for optional integers that may arrive quoted or bare.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(i64_from_value))
}
