//! Exchange-agnostic domain logic.
//!
//! Everything in here is synchronous and free of I/O: symbol
//! standardization, rate normalization, grouping, spread computation,
//! ranking, and the alert throttle's decision rules.

mod aggregate;
mod alert;
mod exchange;
mod observation;
mod opportunity;
mod pipeline;
mod rank;
mod rate;
mod symbol;

pub mod error;

pub use aggregate::{group_by_symbol, SymbolGroup, SymbolGroups};
pub use alert::{alert_key, AlertPriority, AlertState, ThrottlePolicy, ALERT_KEY_PREFIX};
pub use exchange::ExchangeId;
pub use observation::{NormalizedObservation, RawObservation};
pub use opportunity::{compute_opportunities, net_apr, recommendation, spread_pct, Opportunity};
pub use pipeline::process_observations;
pub use rank::rank_opportunities;
pub use rate::{normalize_to_8h, REFERENCE_HOURS};
pub use symbol::{standardize, Symbol, SymbolRule, PERP_SUFFIX};
