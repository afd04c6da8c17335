//! Telegram notifications.
//!
//! Requires the `telegram` feature to be enabled.

mod format;
mod notifier;

pub use format::format_event_message;
pub use notifier::{parse_chat_ids, TelegramConfig, TelegramNotifier};
