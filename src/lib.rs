//! Fundwatch - cross-exchange perpetual funding-rate spread scanner.
//!
//! Polls public funding-rate endpoints, maps every quote onto a canonical
//! `BASE-PERP` symbol and an 8-hour rate, and ranks symbols by the spread
//! between the highest- and lowest-funding venue. A throttle decides which
//! spreads are worth an alert.
//!
//! # Modules
//!
//! - [`domain`] - Pure types and math: symbols, normalization, spreads, throttle policy
//! - [`port`] - Traits at the edges: funding sources, alert store, notifiers
//! - [`adapter`] - Exchange clients, stores, and notifiers implementing the ports
//! - [`app`] - Configuration, poll cycles, and the run loop
//! - [`cli`] - Command-line handlers
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram notifier
//! - `testkit` - Test doubles for integration tests
//!
//! # Example
//!
//! ```
//! use fundwatch::domain::{process_observations, ExchangeId, RawObservation};
//! use rust_decimal_macros::dec;
//!
//! let ranked = process_observations(vec![
//!     RawObservation::new(ExchangeId::Binance, "BTCUSDT", dec!(0.0001), dec!(8)),
//!     RawObservation::new(ExchangeId::Hyperliquid, "BTC", dec!(0.000125), dec!(1)),
//! ])
//! .unwrap();
//!
//! assert_eq!(ranked[0].symbol().as_str(), "BTC-PERP");
//! assert_eq!(ranked[0].delta_spread_8h(), dec!(0.09));
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(feature = "testkit")]
pub mod testkit;
