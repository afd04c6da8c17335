//! Gate USDT-settled futures.
//!
//! Gate reports the interval and next settlement in seconds. A
//! `funding_next_apply` that has already passed is replaced with the next
//! interval boundary.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{get_json, lenient_decimal, lenient_i64};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::Result;
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://api.gateio.ws";

const DEFAULT_INTERVAL_SECS: i64 = 28_800;
const SECS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

#[derive(Debug, Clone, Deserialize)]
pub struct Contract {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_interval: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub funding_next_apply: Option<i64>,
    #[serde(default)]
    pub in_delisting: bool,
}

fn next_settlement_ms(next_apply_secs: Option<i64>, interval_secs: i64, now_ms: i64) -> i64 {
    let interval_ms = interval_secs * 1000;
    match next_apply_secs.map(|s| s * 1000) {
        Some(next) if next > now_ms => next,
        _ => {
            let periods = now_ms.div_euclid(interval_ms);
            let boundary = periods * interval_ms;
            if boundary == now_ms {
                boundary
            } else {
                boundary + interval_ms
            }
        }
    }
}

pub fn parse_gate(contracts: Vec<Contract>, now_ms: i64) -> Vec<RawObservation> {
    contracts
        .into_iter()
        .filter(|c| !c.in_delisting)
        .filter_map(|c| {
            let rate = c.funding_rate?;
            let interval_secs = c
                .funding_interval
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_INTERVAL_SECS);
            let hours = Decimal::from(interval_secs) / SECS_PER_HOUR;
            let next = next_settlement_ms(c.funding_next_apply, interval_secs, now_ms);
            Some(
                RawObservation::new(ExchangeId::Gate, c.name, rate, hours)
                    .with_next_funding_time(next),
            )
        })
        .collect()
}

pub struct GateSource {
    http: HttpClient,
    base_url: String,
}

impl GateSource {
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
impl FundingSource for GateSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Gate
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!("{}/api/v4/futures/usdt/contracts", self.base_url);
        let contracts: Vec<Contract> = get_json(&self.http, &url).await?;

        let observations = parse_gate(contracts, Utc::now().timestamp_millis());
        debug!(count = observations.len(), "Fetched Gate funding rates");
        Ok(observations)
    }
}
