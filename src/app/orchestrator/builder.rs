//! Wiring from configuration to services.

use std::sync::Arc;

use tracing::info;
#[cfg(feature = "telegram")]
use tracing::warn;

use crate::adapter::exchange::{build_sources, http_client};
use crate::adapter::notifier::{LogNotifier, NotifierRegistry};
#[cfg(feature = "telegram")]
use crate::adapter::notifier::{TelegramConfig, TelegramNotifier};
use crate::adapter::store::{FileStore, MemoryStore};
use crate::app::config::{Config, StoreBackend, StoreConfig};
use crate::app::scanner::Scanner;
use crate::app::throttle::AlertThrottle;
use crate::error::{ConfigError, Result};
use crate::port::AlertStore;

/// Open the configured alert-state store.
#[allow(clippy::result_large_err)]
pub(crate) fn build_store(config: &StoreConfig) -> Result<Arc<dyn AlertStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory alert state");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::File => {
            let path = config
                .path
                .as_ref()
                .ok_or(ConfigError::MissingField { field: "store.path" })?;
            Ok(Arc::new(FileStore::open(path)?))
        }
    }
}

/// Build notifier registry from configuration.
pub(crate) fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();

    // Always add log notifier
    registry.register(Box::new(LogNotifier));

    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        if let Some(tg_config) = TelegramConfig::from_env() {
            let tg_config = TelegramConfig {
                notify_alerts: config.telegram.notify_alerts,
                notify_digest: config.telegram.notify_digest,
                ..tg_config
            };
            info!(chats = tg_config.chat_ids.len(), "Telegram notifier enabled");
            registry.register(Box::new(TelegramNotifier::new(tg_config)));
        } else {
            warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_IDS not set");
        }
    }

    // Suppress unused variable warning when telegram feature is disabled
    #[cfg(not(feature = "telegram"))]
    let _ = config;

    registry
}

/// Scanner that only reads: no throttle, no store, no notifiers.
pub fn build_read_only_scanner(config: &Config) -> Scanner {
    let http = http_client(config.exchanges.timeout());
    Scanner::new(build_sources(&config.exchanges.enabled, &http))
}

/// Scanner for the `run` loop, with throttle and notifiers as configured.
#[allow(clippy::result_large_err)]
pub(crate) fn build_alerting_scanner(
    config: &Config,
    notifiers: Arc<NotifierRegistry>,
) -> Result<Scanner> {
    let scanner = build_read_only_scanner(config).with_notifiers(notifiers);

    if !config.alert.enabled {
        info!("Alerts disabled");
        return Ok(scanner);
    }

    let store = build_store(&config.store)?;
    let throttle = AlertThrottle::new(config.alert.policy(), store);
    Ok(scanner.with_throttle(throttle))
}
