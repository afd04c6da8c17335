//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to the documented defaults. Telegram credentials come from
//! the environment (`TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_IDS`), never from
//! the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::{ExchangeId, ThrottlePolicy};
use crate::error::{ConfigError, Result};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub exchanges: ExchangesConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub telegram: TelegramAppConfig,
    #[serde(default)]
    pub digest: DigestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Polling cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Seconds between poll cycles.
    #[serde(default = "default_scan_interval_secs")]
    pub interval_secs: u64,
}

const fn default_scan_interval_secs() -> u64 {
    60
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_scan_interval_secs(),
        }
    }
}

impl ScanConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Which venues to poll and how long to wait for them.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangesConfig {
    #[serde(default = "default_enabled_exchanges")]
    pub enabled: Vec<ExchangeId>,
    /// HTTP request timeout per venue call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled_exchanges() -> Vec<ExchangeId> {
    ExchangeId::ALL.to_vec()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for ExchangesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_exchanges(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExchangesConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Alert throttle settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Spread in percent that must be exceeded.
    #[serde(default = "default_threshold")]
    pub threshold: Decimal,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Spread increase in percent that re-alerts inside the window.
    #[serde(default = "default_escalation_delta")]
    pub escalation_delta: Decimal,
    #[serde(default = "default_state_ttl_secs")]
    pub state_ttl_secs: u64,
}

const fn default_true() -> bool {
    true
}

fn default_threshold() -> Decimal {
    Decimal::TEN
}

const fn default_window_secs() -> u64 {
    3600
}

fn default_escalation_delta() -> Decimal {
    Decimal::TWO
}

const fn default_state_ttl_secs() -> u64 {
    86_400
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_threshold(),
            window_secs: default_window_secs(),
            escalation_delta: default_escalation_delta(),
            state_ttl_secs: default_state_ttl_secs(),
        }
    }
}

impl AlertConfig {
    /// Throttle parameters for the domain state machine.
    #[must_use]
    pub fn policy(&self) -> ThrottlePolicy {
        ThrottlePolicy {
            threshold: self.threshold,
            window_ms: i64::try_from(self.window_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            escalation_delta: self.escalation_delta,
            state_ttl: Duration::from_secs(self.state_ttl_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

/// Where alert state lives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// State file, required by the `file` backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Telegram notification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub notify_alerts: bool,
    #[serde(default = "default_true")]
    pub notify_digest: bool,
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_alerts: true,
            notify_digest: true,
        }
    }
}

/// Periodic top-N summary.
#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_digest_interval_secs")]
    pub interval_secs: u64,
}

const fn default_top_n() -> usize {
    5
}

const fn default_digest_interval_secs() -> u64 {
    3600
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            top_n: default_top_n(),
            interval_secs: default_digest_interval_secs(),
        }
    }
}

impl DigestConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load `path`, or fall back to defaults when the file does not exist.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Parse and validate TOML text.
    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("logging.format", "must be \"pretty\" or \"json\""));
        }
        if self.scan.interval_secs == 0 {
            return Err(invalid("scan.interval_secs", "must be greater than 0"));
        }
        if self.exchanges.enabled.is_empty() {
            return Err(invalid("exchanges.enabled", "at least one exchange is required"));
        }
        if self.exchanges.timeout_secs == 0 {
            return Err(invalid("exchanges.timeout_secs", "must be greater than 0"));
        }

        let alert = &self.alert;
        if alert.threshold.is_sign_negative() {
            return Err(invalid("alert.threshold", "must be non-negative"));
        }
        if alert.escalation_delta.is_sign_negative() {
            return Err(invalid("alert.escalation_delta", "must be non-negative"));
        }
        if alert.window_secs == 0 {
            return Err(invalid("alert.window_secs", "must be greater than 0"));
        }
        if alert.state_ttl_secs == 0 {
            return Err(invalid("alert.state_ttl_secs", "must be greater than 0"));
        }
        if alert.state_ttl_secs < alert.window_secs {
            return Err(invalid(
                "alert.state_ttl_secs",
                "must be at least alert.window_secs",
            ));
        }

        if self.store.backend == StoreBackend::File && self.store.path.is_none() {
            return Err(ConfigError::MissingField { field: "store.path" }.into());
        }

        if self.digest.top_n == 0 {
            return Err(invalid("digest.top_n", "must be at least 1"));
        }
        if self.digest.interval_secs == 0 {
            return Err(invalid("digest.interval_secs", "must be greater than 0"));
        }

        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.scan.interval_secs, 60);
        assert_eq!(config.exchanges.enabled.len(), 9);
        assert_eq!(config.exchanges.timeout_secs, 10);
        assert!(config.alert.enabled);
        assert_eq!(config.alert.threshold, dec!(10));
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(!config.telegram.enabled);
        assert!(!config.digest.enabled);
        assert_eq!(config.digest.top_n, 5);
    }

    #[test]
    fn alert_section_maps_to_policy() {
        let config = Config::parse(
            r#"
            [alert]
            threshold = 5.5
            window_secs = 600
            escalation_delta = "1.25"
            state_ttl_secs = 7200
            "#,
        )
        .unwrap();

        let policy = config.alert.policy();
        assert_eq!(policy.threshold, dec!(5.5));
        assert_eq!(policy.window_ms, 600_000);
        assert_eq!(policy.escalation_delta, dec!(1.25));
        assert_eq!(policy.state_ttl, Duration::from_secs(7200));
    }

    #[test]
    fn default_policy_matches_domain_default() {
        assert_eq!(AlertConfig::default().policy(), ThrottlePolicy::default());
    }

    #[test]
    fn exchanges_parse_by_lowercase_name() {
        let config = Config::parse(
            r#"
            [exchanges]
            enabled = ["binance", "okx", "hyperliquid"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.exchanges.enabled,
            vec![ExchangeId::Binance, ExchangeId::Okx, ExchangeId::Hyperliquid]
        );
    }

    #[test]
    fn unknown_exchange_is_a_parse_error() {
        let err = Config::parse("[exchanges]\nenabled = [\"kraken\"]").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn ttl_shorter_than_window_is_rejected() {
        let err = Config::parse("[alert]\nwindow_secs = 7200\nstate_ttl_secs = 3600").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "alert.state_ttl_secs",
                ..
            })
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = Config::parse("[alert]\nthreshold = -1.0").unwrap_err();
        assert!(err.to_string().contains("alert.threshold"));
    }

    #[test]
    fn file_backend_requires_path() {
        let err = Config::parse("[store]\nbackend = \"file\"").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "store.path" })
        ));

        let ok = Config::parse("[store]\nbackend = \"file\"\npath = \"state/alerts.json\"").unwrap();
        assert_eq!(ok.store.path, Some(PathBuf::from("state/alerts.json")));
    }

    #[test]
    fn empty_exchange_list_is_rejected() {
        assert!(Config::parse("[exchanges]\nenabled = []").is_err());
    }

    #[test]
    fn zero_top_n_is_rejected() {
        assert!(Config::parse("[digest]\ntop_n = 0").is_err());
    }

    #[test]
    fn bad_log_format_is_rejected() {
        assert!(Config::parse("[logging]\nformat = \"xml\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default("/nonexistent/fundwatch.toml").unwrap();
        assert_eq!(config.scan.interval_secs, 60);
        assert!(Config::load("/nonexistent/fundwatch.toml").is_err());
    }
}
