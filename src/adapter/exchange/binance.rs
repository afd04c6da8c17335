//! Binance USDⓈ-M futures.
//!
//! `premiumIndex` carries the current rate for every perpetual; the
//! settlement interval comes from `fundingInfo`, which only lists symbols
//! whose interval differs from the 8-hour default.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, lenient_decimal, lenient_i64};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::Result;
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

const DEFAULT_INTERVAL_HOURS: i64 = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumIndex {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last_funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub next_funding_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingInfo {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_interval_hours: Option<i64>,
}

/// Join premium-index rows with their funding interval.
pub fn parse_binance(premium: Vec<PremiumIndex>, info: Vec<FundingInfo>) -> Vec<RawObservation> {
    let intervals: HashMap<String, i64> = info
        .into_iter()
        .filter_map(|row| {
            row.funding_interval_hours
                .filter(|hours| *hours > 0)
                .map(|hours| (row.symbol, hours))
        })
        .collect();

    premium
        .into_iter()
        .filter_map(|row| {
            let rate = row.last_funding_rate?;
            let hours = intervals
                .get(&row.symbol)
                .copied()
                .unwrap_or(DEFAULT_INTERVAL_HOURS);
            let mut obs =
                RawObservation::new(ExchangeId::Binance, row.symbol, rate, Decimal::from(hours));
            if let Some(next) = row.next_funding_time.filter(|t| *t > 0) {
                obs = obs.with_next_funding_time(next);
            }
            Some(obs)
        })
        .collect()
}

pub struct BinanceSource {
    http: HttpClient,
    base_url: String,
}

impl BinanceSource {
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
impl FundingSource for BinanceSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Binance
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let premium_url = format!("{}/fapi/v1/premiumIndex", self.base_url);
        let info_url = format!("{}/fapi/v1/fundingInfo", self.base_url);

        let (premium, info) = tokio::try_join!(
            get_json::<Vec<PremiumIndex>>(&self.http, &premium_url),
            get_json::<Vec<FundingInfo>>(&self.http, &info_url),
        )?;

        let observations = parse_binance(premium, info);
        debug!(count = observations.len(), "Fetched Binance funding rates");
        Ok(observations)
    }
}
