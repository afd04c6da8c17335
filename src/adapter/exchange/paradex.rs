//! Paradex perpetuals.
//!
//! Funding is continuous; it is reported here as an hourly rate derived
//! from the 8-hour figure in the market summary.

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

pub const DEFAULT_BASE_URL: &str = "https://api.prod.paradex.trade";

#[derive(Debug, Clone, Deserialize)]
pub struct MarketsSummaryResponse {
    #[serde(default)]
    pub results: Vec<MarketSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketSummary {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding_rate: Option<Decimal>,
}

pub fn parse_paradex(response: MarketsSummaryResponse, now_ms: i64) -> Vec<RawObservation> {
    let next = next_hour_ms(now_ms);

    response
        .results
        .into_iter()
        .filter_map(|row| {
            let symbol = row.symbol.filter(|s| !s.is_empty())?;
            let rate_8h = row.funding_rate?;
            Some(
                RawObservation::new(
                    ExchangeId::Paradex,
                    symbol,
                    rate_8h / REFERENCE_HOURS,
                    Decimal::ONE,
                )
                .with_next_funding_time(next),
            )
        })
        .collect()
}

pub struct ParadexSource {
    http: HttpClient,
    base_url: String,
}

impl ParadexSource {
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
impl FundingSource for ParadexSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Paradex
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!("{}/v1/markets/summary?market=ALL", self.base_url);
        let response: MarketsSummaryResponse = get_json(&self.http, &url).await?;

        let observations = parse_paradex(response, Utc::now().timestamp_millis());
        debug!(count = observations.len(), "Fetched Paradex funding rates");
        Ok(observations)
    }
}
