//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the synchronous core and the outside
//! world: exchanges that supply funding quotes, the key-value store that
//! remembers alert state, and the notifiers that deliver alerts.
//!
//! ```text
//!     ┌─────────┐        ┌─────────────────────┐        ┌───────────┐
//!     │Exchange │ ─────▶ │  Domain + Scanner   │ ─────▶ │ Notifier  │
//!     │ Adapter │        │                     │        │  Adapter  │
//!     └─────────┘        └──────────┬──────────┘        └───────────┘
//!                                   │
//!                            ┌──────▼──────┐
//!                            │ AlertStore  │
//!                            └─────────────┘
//! ```

mod exchange;
mod notifier;
mod store;

pub use exchange::FundingSource;
pub use notifier::{AlertEvent, DigestEvent, Event, LegEvent, Notifier, OpportunityEvent};
pub use store::AlertStore;
