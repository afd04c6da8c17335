//! Bitget USDT-M futures.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, lenient_decimal, lenient_i64};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::{Error, Result};
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://api.bitget.com";

const SUCCESS_CODE: &str = "00000";
const DEFAULT_INTERVAL_HOURS: i64 = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct FundRateResponse {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<Vec<FundRate>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRate {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_rate_interval: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub next_update: Option<i64>,
}

/// Parse a current-fund-rate response.
///
/// # Errors
///
/// Returns `Error::Exchange` when Bitget reports a non-success code.
pub fn parse_bitget(response: FundRateResponse) -> Result<Vec<RawObservation>> {
    if response.code != SUCCESS_CODE {
        return Err(Error::Exchange {
            exchange: ExchangeId::Bitget,
            reason: format!("code {}: {}", response.code, response.msg),
        });
    }

    Ok(response
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|row| {
            let rate = row.funding_rate?;
            let hours = row
                .funding_rate_interval
                .filter(|h| *h > 0)
                .unwrap_or(DEFAULT_INTERVAL_HOURS);
            let mut obs =
                RawObservation::new(ExchangeId::Bitget, row.symbol, rate, Decimal::from(hours));
            if let Some(next) = row.next_update.filter(|t| *t > 0) {
                obs = obs.with_next_funding_time(next);
            }
            Some(obs)
        })
        .collect())
}

pub struct BitgetSource {
    http: HttpClient,
    base_url: String,
}

impl BitgetSource {
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
impl FundingSource for BitgetSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Bitget
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!(
            "{}/api/v2/mix/market/current-fund-rate?productType=USDT-FUTURES",
            self.base_url
        );
        let response: FundRateResponse = get_json(&self.http, &url).await?;

        let observations = parse_bitget(response)?;
        debug!(count = observations.len(), "Fetched Bitget funding rates");
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_success_payload() {
        let response: FundRateResponse = serde_json::from_str(
            r#"{"code":"00000","msg":"success","requestTime":1700000000000,"data":[
                {"symbol":"BTCUSDT","fundingRate":"0.000068","fundingRateInterval":"8","nextUpdate":"1700006400000"},
                {"symbol":"ORDIUSDT","fundingRate":"0.0005","fundingRateInterval":"4"},
                {"symbol":"BROKENUSDT","fundingRate":""}
            ]}"#,
        )
        .unwrap();

        let obs = parse_bitget(response).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].raw_rate, dec!(0.000068));
        assert_eq!(obs[0].interval_hours, dec!(8));
        assert_eq!(obs[0].next_funding_time, Some(1_700_006_400_000));
        assert_eq!(obs[1].interval_hours, dec!(4));
        assert_eq!(obs[1].next_funding_time, None);
    }

    #[test]
    fn non_success_code_is_an_error() {
        let response: FundRateResponse =
            serde_json::from_str(r#"{"code":"40034","msg":"Parameter verification failed","data":null}"#)
                .unwrap();

        let err = parse_bitget(response).unwrap_err();
        assert!(matches!(
            err,
            Error::Exchange {
                exchange: ExchangeId::Bitget,
                ..
            }
        ));
        assert!(err.to_string().contains("40034"));
    }
}
