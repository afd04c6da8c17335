//! Implementations of ports (hexagonal adapters).

pub mod exchange;
pub mod notifier;
pub mod store;
