// src/models/mod.rs

//! Domain models for the review watcher.

mod config;
mod credentials;
mod homework;
mod window;

// Re-export all public types
pub use config::{
    ApiConfig, Config, HttpConfig, LoggingConfig, Messages, PollConfig, TelegramConfig,
};
pub use credentials::{Credentials, PRACTICUM_TOKEN, TELEGRAM_CHAT_ID, TELEGRAM_TOKEN};
pub use homework::{HomeworkBatch, HomeworkRecord, HomeworkStatus};
pub use window::PollWindow;
