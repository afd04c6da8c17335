//! Application layer - configuration, poll cycles, and alert throttling.

mod config;
mod orchestrator;
mod scanner;
mod throttle;

pub use config::{
    AlertConfig, Config, DigestConfig, ExchangesConfig, LoggingConfig, ScanConfig, StoreBackend,
    StoreConfig, TelegramAppConfig, DEFAULT_CONFIG_PATH,
};
pub use orchestrator::{build_read_only_scanner, App, RunOptions};
pub use scanner::{CycleReport, Scanner, SourceReport};
pub use throttle::AlertThrottle;
