//! Hyperliquid perpetuals.
//!
//! `metaAndAssetCtxs` answers with a two-element array: the universe
//! metadata and the per-asset contexts, aligned by index. Funding settles
//! hourly at the top of the hour.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{lenient_decimal, next_hour_ms};
use crate::domain::{ExchangeId, RawObservation};
use crate::error::Result;
use crate::port::FundingSource;

pub const DEFAULT_BASE_URL: &str = "https://api.hyperliquid.xyz";

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub universe: Vec<Asset>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(default)]
    pub is_delisted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetContext {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub funding: Option<Decimal>,
}

/// Response of the `metaAndAssetCtxs` info request.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaAndAssetContexts(pub Meta, pub Vec<AssetContext>);

pub fn parse_hyperliquid(response: MetaAndAssetContexts, now_ms: i64) -> Vec<RawObservation> {
    let MetaAndAssetContexts(meta, contexts) = response;
    let next = next_hour_ms(now_ms);

    meta.universe
        .into_iter()
        .zip(contexts)
        .filter(|(asset, _)| !asset.is_delisted)
        .filter_map(|(asset, ctx)| {
            let rate = ctx.funding?;
            Some(
                RawObservation::new(ExchangeId::Hyperliquid, asset.name, rate, Decimal::ONE)
                    .with_next_funding_time(next),
            )
        })
        .collect()
}

pub struct HyperliquidSource {
    http: HttpClient,
    base_url: String,
}

impl HyperliquidSource {
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
impl FundingSource for HyperliquidSource {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Hyperliquid
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let url = format!("{}/info", self.base_url);
        debug!(url = %url, "POST metaAndAssetCtxs");

        let response: MetaAndAssetContexts = self
            .http
            .post(&url)
            .json(&json!({ "type": "metaAndAssetCtxs" }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let observations = parse_hyperliquid(response, Utc::now().timestamp_millis());
        debug!(count = observations.len(), "Fetched Hyperliquid funding rates");
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FIXTURE: &str = r#"[
        {"universe":[
            {"name":"BTC","szDecimals":5,"maxLeverage":50},
            {"name":"ETH","szDecimals":4,"maxLeverage":50},
            {"name":"OLD","szDecimals":0,"maxLeverage":3,"isDelisted":true},
            {"name":"kPEPE","szDecimals":0,"maxLeverage":10}
        ]},
        [
            {"funding":"0.0000125","openInterest":"1000.0","markPx":"64000.0"},
            {"funding":"-0.00000625","openInterest":"5000.0"},
            {"funding":"0.0001"},
            {"funding":null}
        ]
    ]"#;

    #[test]
    fn zips_universe_with_contexts() {
        let response: MetaAndAssetContexts = serde_json::from_str(FIXTURE).unwrap();
        let obs = parse_hyperliquid(response, 1_700_000_000_000);

        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].raw_symbol, "BTC");
        assert_eq!(obs[0].raw_rate, dec!(0.0000125));
        assert_eq!(obs[0].interval_hours, Decimal::ONE);
        assert_eq!(obs[1].raw_symbol, "ETH");
        assert_eq!(obs[1].raw_rate, dec!(-0.00000625));
    }

    #[test]
    fn next_funding_is_top_of_hour() {
        let response: MetaAndAssetContexts = serde_json::from_str(FIXTURE).unwrap();
        let obs = parse_hyperliquid(response, 1_700_000_000_000);
        assert!(obs
            .iter()
            .all(|o| o.next_funding_time == Some(1_700_002_800_000)));
    }
}
