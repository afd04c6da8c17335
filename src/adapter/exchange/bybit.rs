//! Bybit v5 linear perpetuals.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, lenient_decimal, lenient_i64};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::{Error, Result};
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

const DEFAULT_INTERVAL_HOURS: i64 = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickersResponse {
    #[serde(default)]
    pub ret_code: i64,
    #[serde(default)]
    pub ret_msg: String,
    pub result: Option<TickersResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TickersResult {
    #[serde(default)]
    pub list: Vec<Ticker>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_interval_hour: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub next_funding_time: Option<i64>,
}

pub fn parse_bybit(tickers: Vec<Ticker>) -> Vec<RawObservation> {
    tickers
        .into_iter()
        .filter_map(|t| {
            let rate = t.funding_rate?;
            let hours = t
                .funding_interval_hour
                .filter(|h| *h > 0)
                .unwrap_or(DEFAULT_INTERVAL_HOURS);
            let mut obs =
                RawObservation::new(ExchangeId::Bybit, t.symbol, rate, Decimal::from(hours));
            if let Some(next) = t.next_funding_time.filter(|n| *n > 0) {
                obs = obs.with_next_funding_time(next);
            }
            Some(obs)
        })
        .collect()
}

pub struct BybitSource {
    http: HttpClient,
    base_url: String,
}

impl BybitSource {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl FundingSource for BybitSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Bybit
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!("{}/v5/market/tickers?category=linear", self.base_url);
        let response: TickersResponse = get_json(&self.http, &url).await?;

        if response.ret_code != 0 {
            return Err(Error::Exchange {
                exchange: ExchangeId::Bybit,
                reason: format!("retCode {}: {}", response.ret_code, response.ret_msg),
            });
        }

        let tickers = response.result.map(|r| r.list).unwrap_or_default();
        let observations = parse_bybit(tickers);
        debug!(count = observations.len(), "Fetched Bybit funding rates");
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FIXTURE: &str = r#"{
        "retCode": 0,
        "retMsg": "OK",
        "result": {
            "category": "linear",
            "list": [
                {"symbol":"BTCUSDT","lastPrice":"64000","fundingRate":"0.0001","fundingIntervalHour":"8","nextFundingTime":"1700006400000"},
                {"symbol":"SOLUSDT","fundingRate":"-0.00042","fundingIntervalHour":"4","nextFundingTime":"1700006400000"},
                {"symbol":"BTCPERP","fundingRate":"0.0002","nextFundingTime":""},
                {"symbol":"BTC-27JUN25","fundingRate":"","nextFundingTime":"0"}
            ]
        }
    }"#;

    fn tickers() -> Vec<Ticker> {
        let response: TickersResponse = serde_json::from_str(FIXTURE).unwrap();
        response.result.unwrap().list
    }

    #[test]
    fn parses_quoted_fields() {
        let obs = parse_bybit(tickers());
        assert_eq!(obs.len(), 3);

        assert_eq!(obs[0].raw_rate, dec!(0.0001));
        assert_eq!(obs[0].interval_hours, dec!(8));
        assert_eq!(obs[0].next_funding_time, Some(1_700_006_400_000));

        assert_eq!(obs[1].raw_symbol, "SOLUSDT");
        assert_eq!(obs[1].interval_hours, dec!(4));
    }

    #[test]
    fn missing_interval_defaults_and_bad_rows_drop() {
        let obs = parse_bybit(tickers());
        assert_eq!(obs[2].raw_symbol, "BTCPERP");
        assert_eq!(obs[2].interval_hours, dec!(8));
        assert_eq!(obs[2].next_funding_time, None);
        assert!(obs.iter().all(|o| o.raw_symbol != "BTC-27JUN25"));
    }
}
