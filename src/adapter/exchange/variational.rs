//! Variational perpetuals.
//!
//! `funding_rate` is annualized (e.g. `-0.55` means -55% a year), so the
//! per-interval rate is the annual figure divided by the number of
//! intervals in a 365-day year.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, lenient_decimal, lenient_i64, next_hour_ms};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::Result;
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://omni-client-api.prod.ap-northeast-1.variational.io";

const HOURS_PER_YEAR: Decimal = Decimal::from_parts(8760, 0, 0, false, 0);
const SECS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);
const DEFAULT_INTERVAL_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_interval_s: Option<i64>,
}

pub fn parse_variational(response: StatsResponse, now_ms: i64) -> Vec<RawObservation> {
    let next = next_hour_ms(now_ms);

    response
        .listings
        .into_iter()
        .filter_map(|row| {
            let ticker = row.ticker.filter(|t| !t.is_empty())?;
            let annualized = row.funding_rate?;
            let hours = row
                .funding_interval_s
                .filter(|s| *s > 0)
                .map_or(DEFAULT_INTERVAL_HOURS, |s| Decimal::from(s) / SECS_PER_HOUR);
            let raw_rate = annualized * hours / HOURS_PER_YEAR;
            Some(
                RawObservation::new(ExchangeId::Variational, ticker, raw_rate, hours)
                    .with_next_funding_time(next),
            )
        })
        .collect()
}

pub struct VariationalSource {
    http: HttpClient,
    base_url: String,
}

impl VariationalSource {
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
impl FundingSource for VariationalSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Variational
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!("{}/metadata/stats", self.base_url);
        let response: StatsResponse = get_json(&self.http, &url).await?;

        let observations = parse_variational(response, Utc::now().timestamp_millis());
        debug!(count = observations.len(), "Fetched Variational funding rates");
        Ok(observations)
    }
}
