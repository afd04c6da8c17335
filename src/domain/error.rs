//! Domain validation errors for core domain types.
//!
//! These errors are raised when an observation handed to the core breaks
//! the observation contract (for example a negative funding interval).
//!
//! # Examples
//!
//! ```
//! use fundwatch::domain::error::DomainError;
//! use fundwatch::domain::{ExchangeId, RawObservation};
//! use rust_decimal_macros::dec;
//!
//! let raw = RawObservation::new(ExchangeId::Gate, "BTC_USDT", dec!(0.0001), dec!(-8));
//! assert!(matches!(raw.validate(), Err(DomainError::NegativeInterval { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::exchange::ExchangeId;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Funding intervals are durations and cannot be negative.
    #[error("{exchange} {symbol}: funding interval must not be negative, got {interval_hours}h")]
    NegativeInterval {
        /// Venue that produced the observation.
        exchange: ExchangeId,
        /// Raw symbol as reported by the venue.
        symbol: String,
        /// The invalid interval.
        interval_hours: Decimal,
    },

    /// Opportunities need at least two quotes.
    #[error("symbol group {symbol} has {count} observation(s), need at least 2")]
    GroupTooSmall {
        /// Canonical symbol of the group.
        symbol: String,
        /// Number of observations in the group.
        count: usize,
    },
}
