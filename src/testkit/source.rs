//! Test doubles for [`FundingSource`].

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ExchangeId, RawObservation};
use crate::error::{Error, Result};
use crate::port::FundingSource;

/// Returns the same observations on every fetch.
pub struct StaticSource {
    exchange: ExchangeId,
    observations: Vec<RawObservation>,
}

impl StaticSource {
    pub fn new(exchange: ExchangeId, observations: Vec<RawObservation>) -> Self {
        Self {
            exchange,
            observations,
        }
    }
}

#[async_trait]
impl FundingSource for StaticSource {
    fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        Ok(self.observations.clone())
    }
}

/// Source whose observations can be swapped between cycles.
///
/// Clones share the same observations, so a test keeps one clone as a
/// handle and hands the other to the scanner.
#[derive(Clone)]
pub struct SharedSource {
    exchange: ExchangeId,
    observations: Arc<Mutex<Vec<RawObservation>>>,
    fetches: Arc<Mutex<usize>>,
}

impl SharedSource {
    pub fn new(exchange: ExchangeId) -> Self {
        Self {
            exchange,
            observations: Arc::new(Mutex::new(Vec::new())),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    /// Replace what the next fetch returns.
    pub fn set(&self, observations: Vec<RawObservation>) {
        *self.observations.lock() = observations;
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock()
    }
}

#[async_trait]
impl FundingSource for SharedSource {
    fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        *self.fetches.lock() += 1;
        Ok(self.observations.lock().clone())
    }
}

/// Always fails with an exchange error.
pub struct FailingSource {
    exchange: ExchangeId,
}

impl FailingSource {
    pub fn new(exchange: ExchangeId) -> Self {
        Self { exchange }
    }
}

#[async_trait]
impl FundingSource for FailingSource {
    fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        Err(Error::Exchange {
            exchange: self.exchange,
            reason: "connection refused".into(),
        })
    }
}
