//! Telegram delivery.
//!
//! Provides the [`TelegramNotifier`], which queues events on a channel and
//! sends them from a background worker to every configured chat.

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::port::{Event, Notifier};

use super::format::format_event_message;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Chats that receive every message.
    pub chat_ids: Vec<i64>,
    /// Send throttled spread alerts.
    pub notify_alerts: bool,
    /// Send periodic top-N digests.
    pub notify_digest: bool,
}

impl TelegramConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` and either `TELEGRAM_CHAT_IDS`
    /// (comma separated) or `TELEGRAM_CHAT_ID`. Returns `None` if the
    /// token is missing or no chat id parses.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())?;
        let raw_ids = std::env::var("TELEGRAM_CHAT_IDS")
            .or_else(|_| std::env::var("TELEGRAM_CHAT_ID"))
            .ok()?;
        let chat_ids = parse_chat_ids(&raw_ids);
        if chat_ids.is_empty() {
            return None;
        }

        Some(Self {
            bot_token,
            chat_ids,
            notify_alerts: true,
            notify_digest: true,
        })
    }
}

/// Parse a comma-separated chat id list, skipping invalid entries.
#[must_use]
pub fn parse_chat_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(chat_id = %s, "Ignoring invalid Telegram chat id");
                None
            }
        })
        .collect()
}

/// Telegram notifier that sends messages to one or more chats.
pub struct TelegramNotifier {
    /// Channel sender for queuing outbound notifications; `None` once closed.
    sender: Mutex<Option<mpsc::UnboundedSender<Event>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier and spawn the background worker.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(telegram_worker(config, receiver));
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        let sent = self
            .sender
            .lock()
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_ok());
        if !sent {
            warn!("Telegram notifier closed, dropping event");
        }
    }

    fn close(&self) -> Option<BoxFuture<'static, ()>> {
        // Dropping the sender lets the worker drain the queue and exit.
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take()?;
        Some(Box::pin(async move {
            if let Err(e) = worker.await {
                error!(error = %e, "Telegram worker failed");
            }
        }))
    }
}

/// Background worker that sends Telegram messages.
async fn telegram_worker(config: TelegramConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let bot = Bot::new(&config.bot_token);

    info!(chats = config.chat_ids.len(), "Telegram notifier started");

    while let Some(event) = receiver.recv().await {
        let Some(text) = format_event_message(&event, &config) else {
            continue;
        };

        for &chat_id in &config.chat_ids {
            if let Err(e) = bot
                .send_message(ChatId(chat_id), &text)
                .parse_mode(ParseMode::Html)
                .await
            {
                error!(chat_id, error = %e, "Failed to send Telegram message");
            }
        }
    }

    warn!("Telegram notifier worker shutting down");
}
