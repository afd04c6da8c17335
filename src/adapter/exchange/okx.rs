//! OKX perpetual swaps.
//!
//! The funding-rate endpoint only answers one instrument per request, so a
//! fixed list of liquid swaps is polled in small batches with a pause in
//! between. An instrument that fails is skipped; the batch continues.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{get_json, lenient_decimal, lenient_i64};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::Result;
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";

/// Swaps polled every cycle.
pub const OKX_INSTRUMENTS: [&str; 50] = [
    "BTC-USDT-SWAP", "ETH-USDT-SWAP", "SOL-USDT-SWAP", "DOGE-USDT-SWAP",
    "XRP-USDT-SWAP", "ADA-USDT-SWAP", "AVAX-USDT-SWAP", "LINK-USDT-SWAP",
    "WLD-USDT-SWAP", "ORDI-USDT-SWAP", "PEPE-USDT-SWAP", "SUI-USDT-SWAP",
    "APT-USDT-SWAP", "AR-USDT-SWAP", "TIA-USDT-SWAP", "SEI-USDT-SWAP",
    "INJ-USDT-SWAP", "OP-USDT-SWAP", "ARB-USDT-SWAP", "NEAR-USDT-SWAP",
    "FTM-USDT-SWAP", "MATIC-USDT-SWAP", "DOT-USDT-SWAP", "LTC-USDT-SWAP",
    "BCH-USDT-SWAP", "TRX-USDT-SWAP", "ATOM-USDT-SWAP", "RNDR-USDT-SWAP",
    "IMX-USDT-SWAP", "STX-USDT-SWAP", "TAO-USDT-SWAP", "FIL-USDT-SWAP",
    "XLM-USDT-SWAP", "UNI-USDT-SWAP", "MKR-USDT-SWAP", "TON-USDT-SWAP",
    "OM-USDT-SWAP", "FET-USDT-SWAP", "JUP-USDT-SWAP", "PYTH-USDT-SWAP",
    "ONDO-USDT-SWAP", "PENDLE-USDT-SWAP", "GALA-USDT-SWAP", "SAND-USDT-SWAP",
    "ENA-USDT-SWAP", "WIF-USDT-SWAP", "BOME-USDT-SWAP", "FLOKI-USDT-SWAP",
    "1000BONK-USDT-SWAP", "SHIB-USDT-SWAP",
];

const BATCH_SIZE: usize = 5;
const BATCH_PAUSE: Duration = Duration::from_secs(1);
const INTERVAL_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

#[derive(Debug, Clone, Deserialize)]
pub struct FundingRateResponse {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub data: Vec<FundingRate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRate {
    pub inst_id: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub next_funding_time: Option<i64>,
}

/// Turn per-instrument responses into observations.
///
/// Only the first row of each response is used.
pub fn parse_okx(responses: Vec<FundingRateResponse>) -> Vec<RawObservation> {
    responses
        .into_iter()
        .filter_map(|response| response.data.into_iter().next())
        .filter_map(|row| {
            let rate = row.funding_rate?;
            let mut obs = RawObservation::new(ExchangeId::Okx, row.inst_id, rate, INTERVAL_HOURS);
            if let Some(next) = row.next_funding_time.or(row.funding_time).filter(|t| *t > 0) {
                obs = obs.with_next_funding_time(next);
            }
            Some(obs)
        })
        .collect()
}

pub struct OkxSource {
    http: HttpClient,
    base_url: String,
    instruments: Vec<String>,
}

impl OkxSource {
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            instruments: OKX_INSTRUMENTS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Poll a different instrument list.
    #[must_use]
    pub fn with_instruments(mut self, instruments: Vec<String>) -> Self {
        self.instruments = instruments;
        self
    }

    async fn fetch_one(&self, inst_id: &str) -> Option<FundingRateResponse> {
        let url = format!(
            "{}/api/v5/public/funding-rate?instId={}",
            self.base_url, inst_id
        );
        match get_json::<FundingRateResponse>(&self.http, &url).await {
            Ok(response) if response.code.is_empty() || response.code == "0" => Some(response),
            Ok(response) => {
                warn!(inst_id = %inst_id, code = %response.code, "OKX rejected funding request");
                None
            }
            Err(e) => {
                warn!(inst_id = %inst_id, error = %e, "OKX funding request failed");
                None
            }
        }
    }
}

#[async_trait]
impl FundingSource for OkxSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Okx
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let mut responses = Vec::with_capacity(self.instruments.len());

        for (i, batch) in self.instruments.chunks(BATCH_SIZE).enumerate() {
            if i > 0 {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
            let results = join_all(batch.iter().map(|id| self.fetch_one(id))).await;
            responses.extend(results.into_iter().flatten());
        }

        let observations = parse_okx(responses);
        debug!(count = observations.len(), "Fetched OKX funding rates");
        Ok(observations)
    }
}
