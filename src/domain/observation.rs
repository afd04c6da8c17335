//! Funding-rate observations as they flow through a poll cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::exchange::ExchangeId;
use super::rate::normalize_to_8h;
use super::symbol::{standardize, Symbol};

/// One funding quote as reported by an exchange adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub exchange: ExchangeId,
    pub raw_symbol: String,
    /// Funding rate for one interval, as a fraction (0.0001 = 0.01%).
    pub raw_rate: Decimal,
    pub interval_hours: Decimal,
    /// Next settlement, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_funding_time: Option<i64>,
}

impl RawObservation {
    pub fn new(
        exchange: ExchangeId,
        raw_symbol: impl Into<String>,
        raw_rate: Decimal,
        interval_hours: Decimal,
    ) -> Self {
        Self {
            exchange,
            raw_symbol: raw_symbol.into(),
            raw_rate,
            interval_hours,
            next_funding_time: None,
        }
    }

    #[must_use]
    pub fn with_next_funding_time(mut self, epoch_ms: i64) -> Self {
        self.next_funding_time = Some(epoch_ms);
        self
    }

    /// Check the observation contract.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NegativeInterval` for a negative interval.
    /// A zero interval is tolerated and normalizes to a zero rate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.interval_hours.is_sign_negative() && !self.interval_hours.is_zero() {
            return Err(DomainError::NegativeInterval {
                exchange: self.exchange,
                symbol: self.raw_symbol.clone(),
                interval_hours: self.interval_hours,
            });
        }
        Ok(())
    }

    /// Standardize and normalize this observation.
    ///
    /// Returns `Ok(None)` when the raw symbol is not a market the exchange's
    /// symbol rule recognizes.
    pub fn normalize(self) -> Result<Option<NormalizedObservation>, DomainError> {
        self.validate()?;

        let Some(symbol) = standardize(self.exchange, &self.raw_symbol) else {
            return Ok(None);
        };
        let rate_8h = normalize_to_8h(self.raw_rate, self.interval_hours);

        Ok(Some(NormalizedObservation {
            exchange: self.exchange,
            raw_symbol: self.raw_symbol,
            symbol,
            raw_rate: self.raw_rate,
            interval_hours: self.interval_hours,
            rate_8h,
            next_funding_time: self.next_funding_time,
        }))
    }
}

/// An observation mapped onto a canonical symbol and the 8-hour basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedObservation {
    pub exchange: ExchangeId,
    pub raw_symbol: String,
    pub symbol: Symbol,
    pub raw_rate: Decimal,
    pub interval_hours: Decimal,
    #[serde(rename = "rate8h")]
    pub rate_8h: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_funding_time: Option<i64>,
}
