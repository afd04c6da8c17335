//! Configuration validation command.

use std::path::Path;

use crate::app::{Config, StoreBackend};
use crate::cli::output;
use crate::error::{ConfigError, Result};

/// Validate a configuration file without polling any exchange.
///
/// # Errors
///
/// Returns an error when the file is missing, unreadable, or invalid.
#[allow(clippy::result_large_err)]
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::note(&format!("Checking configuration: {}", path.display()));

    if !path.exists() {
        return Err(ConfigError::Other(format!(
            "configuration file not found: {}",
            path.display()
        ))
        .into());
    }

    let config = Config::load(path)?;
    output::ok("Configuration file is valid");

    output::section("Summary");
    let exchanges: Vec<String> = config
        .exchanges
        .enabled
        .iter()
        .map(ToString::to_string)
        .collect();
    output::key_value("Exchanges", exchanges.join(", "));
    output::key_value("Interval", format!("{}s", config.scan.interval_secs));
    if config.alert.enabled {
        output::key_value("Threshold", format!("{}%", config.alert.threshold));
        output::key_value("Window", format!("{}s", config.alert.window_secs));
        output::key_value("Escalation", format!("+{}%", config.alert.escalation_delta));
    } else {
        output::key_value("Alerts", "disabled");
    }
    let store = match (&config.store.backend, &config.store.path) {
        (StoreBackend::File, Some(p)) => format!("file ({})", p.display()),
        _ => "memory".to_string(),
    };
    output::key_value("Store", store);
    if config.digest.enabled {
        output::key_value(
            "Digest",
            format!("top {} every {}s", config.digest.top_n, config.digest.interval_secs),
        );
    }
    println!();

    check_telegram(&config);
    Ok(())
}

fn check_telegram(config: &Config) {
    if !config.telegram.enabled {
        output::note("Telegram notifications disabled");
        return;
    }

    let token = std::env::var("TELEGRAM_BOT_TOKEN").ok();
    let chats = std::env::var("TELEGRAM_CHAT_IDS")
        .or_else(|_| std::env::var("TELEGRAM_CHAT_ID"))
        .ok();

    if token.is_some() && chats.is_some() {
        output::ok("Telegram configured and enabled");
    } else {
        output::warn("Telegram enabled but missing environment variables:");
        if token.is_none() {
            println!("    - TELEGRAM_BOT_TOKEN");
        }
        if chats.is_none() {
            println!("    - TELEGRAM_CHAT_IDS");
        }
    }
}
