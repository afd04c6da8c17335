//! Lighter perpetuals.
//!
//! Lighter settles hourly but quotes the 8-hour expected rate, so the
//! reported value is divided by eight to recover the per-hour rate.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, lenient_decimal, next_hour_ms};
use crate::domain::{ExchangeId, RawObservation, REFERENCE_HOURS};
use crate::error::Result;
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://mainnet.zklighter.elliot.ai";

#[derive(Debug, Clone, Deserialize)]
pub struct FundingRatesResponse {
    #[serde(default)]
    pub funding_rates: Vec<FundingRate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FundingRate {
    #[serde(default)]
    pub symbol: Option<String>,
    /// Venue the rate belongs to, when the endpoint mixes in reference rates.
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub rate: Option<Decimal>,
}

pub fn parse_lighter(response: FundingRatesResponse, now_ms: i64) -> Vec<RawObservation> {
    let next = next_hour_ms(now_ms);

    response
        .funding_rates
        .into_iter()
        .filter(|row| {
            row.exchange
                .as_deref()
                .map_or(true, |venue| venue.eq_ignore_ascii_case("lighter"))
        })
        .filter_map(|row| {
            let symbol = row.symbol.filter(|s| !s.is_empty())?;
            let rate_8h = row.rate?;
            Some(
                RawObservation::new(
                    ExchangeId::Lighter,
                    symbol,
                    rate_8h / REFERENCE_HOURS,
                    Decimal::ONE,
                )
                .with_next_funding_time(next),
            )
        })
        .collect()
}

pub struct LighterSource {
    http: HttpClient,
    base_url: String,
}

impl LighterSource {
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
impl FundingSource for LighterSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Lighter
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!("{}/api/v1/funding-rates", self.base_url);
        let response: FundingRatesResponse = get_json(&self.http, &url).await?;

        let observations = parse_lighter(response, Utc::now().timestamp_millis());
        debug!(count = observations.len(), "Fetched Lighter funding rates");
        Ok(observations)
    }
}
