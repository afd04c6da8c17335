//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via the `testkit` feature (integration tests).
//!
//! # Modules
//!
//! - [`source`] - Scripted [`FundingSource`](crate::port::FundingSource)
//!   implementations: `StaticSource`, `SharedSource`, `FailingSource`.
//! - [`store`] - `CountingStore`, an alert store that records its calls.
//! - [`notifier`] - `RecordingNotifier`, which keeps every event it receives.
//! - [`domain`] - Builders for observations and opportunities.

pub mod domain;
pub mod notifier;
pub mod source;
pub mod store;
