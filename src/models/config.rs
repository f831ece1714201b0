//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::HomeworkStatus;

/// Root application configuration.
///
/// Secrets are not part of it; see [`crate::models::Credentials`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Review API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// HTTP client behavior shared by both services
    #[serde(default)]
    pub http: HttpConfig,

    /// Polling schedule
    #[serde(default)]
    pub poll: PollConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Notification texts
    #[serde(default)]
    pub messages: Messages,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            return Err(AppError::validation("api.endpoint is empty"));
        }
        Url::parse(&self.api.endpoint)?;
        Url::parse(&self.telegram.api_url)?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.poll.interval_secs == 0 {
            return Err(AppError::validation("poll.interval_secs must be > 0"));
        }
        self.messages.validate()
    }
}

/// Review API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Homework statuses endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL, without the `/bot<token>` part
    #[serde(default = "defaults::telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::telegram_api_url(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
        }
    }
}

/// Polling schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Fixed delay between cycles, success or failure
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Notification texts.
///
/// Supported placeholders:
/// - `status_changed`: `{name}`, `{verdict}`
/// - `failure`: `{error}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "defaults::status_changed")]
    pub status_changed: String,

    #[serde(default = "defaults::failure")]
    pub failure: String,

    #[serde(default = "defaults::approved")]
    pub approved: String,

    #[serde(default = "defaults::reviewing")]
    pub reviewing: String,

    #[serde(default = "defaults::rejected")]
    pub rejected: String,
}

impl Messages {
    /// Verdict text for a status.
    pub fn verdict(&self, status: HomeworkStatus) -> &str {
        match status {
            HomeworkStatus::Approved => &self.approved,
            HomeworkStatus::Reviewing => &self.reviewing,
            HomeworkStatus::Rejected => &self.rejected,
        }
    }

    /// Render the status-change sentence for a homework.
    pub fn status_changed(&self, name: &str, status: HomeworkStatus) -> String {
        self.status_changed
            .replace("{name}", name)
            .replace("{verdict}", self.verdict(status))
    }

    /// Render the error notification for a failed cycle.
    pub fn failure(&self, error: &AppError) -> String {
        self.failure.replace("{error}", &error.to_string())
    }

    fn validate(&self) -> Result<()> {
        if !self.status_changed.contains("{verdict}") {
            return Err(AppError::validation(
                "messages.status_changed must contain {verdict}",
            ));
        }
        if !self.failure.contains("{error}") {
            return Err(AppError::validation("messages.failure must contain {error}"));
        }
        for (key, text) in [
            ("approved", &self.approved),
            ("reviewing", &self.reviewing),
            ("rejected", &self.rejected),
        ] {
            if text.trim().is_empty() {
                return Err(AppError::validation(format!("messages.{key} is empty")));
            }
        }
        Ok(())
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            status_changed: defaults::status_changed(),
            failure: defaults::failure(),
            approved: defaults::approved(),
            reviewing: defaults::reviewing(),
            rejected: defaults::rejected(),
        }
    }
}

mod defaults {
    // Service defaults
    pub fn endpoint() -> String {
        "https://practicum.yandex.ru/api/user_api/homework_statuses/".into()
    }
    pub fn telegram_api_url() -> String {
        "https://api.telegram.org".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "review-watch/0.1".into()
    }

    // Poll defaults
    pub fn interval() -> u64 {
        600
    }

    pub fn log_level() -> String {
        "info".into()
    }

    // Message defaults
    pub fn status_changed() -> String {
        "Changed review status for \"{name}\". {verdict}".into()
    }
    pub fn failure() -> String {
        "Program failure: {error}".into()
    }
    pub fn approved() -> String {
        "Work reviewed: the reviewer liked everything. Hooray!".into()
    }
    pub fn reviewing() -> String {
        "Work has been taken up for review.".into()
    }
    pub fn rejected() -> String {
        "Work reviewed: the reviewer has comments.".into()
    }
}
