//! Handler for the `run` command.

use tracing::info;

use crate::app::{App, Config, RunOptions};
use crate::cli::RunArgs;
use crate::error::Result;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;

    // Apply CLI overrides
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(secs) = args.interval {
        config.scan.interval_secs = secs;
    }
    if args.telegram_enabled {
        config.telegram.enabled = true;
    }
    config.validate()?;

    config.init_logging();
    info!(config = %args.config.display(), once = args.once, "fundwatch starting");

    // App::run handles Ctrl-C and drains notifiers before returning
    let result = App::run(config, RunOptions { once: args.once }).await;

    info!("fundwatch stopped");
    result
}
