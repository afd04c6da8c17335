//! Exchange port for funding-rate retrieval.

use async_trait::async_trait;

use crate::domain::{ExchangeId, RawObservation};
use crate::error::Result;

/// A venue that reports current funding rates.
///
/// Implementations translate the venue's native response into raw
/// observations and nothing more; symbol standardization and rate
/// normalization happen in the core. An empty list is a valid answer.
#[async_trait]
pub trait FundingSource: Send + Sync {
    /// Which venue this source reads.
    fn exchange(&self) -> ExchangeId;

    /// Fetch the current funding quotes.
    async fn fetch(&self) -> Result<Vec<RawObservation>>;
}
