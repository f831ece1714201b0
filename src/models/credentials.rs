//! Secrets supplied through the environment.

use std::env;
use std::fmt;

/// Environment variable holding the review API OAuth token.
pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat identifier.
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// The three credentials the watcher needs.
#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Read credentials from process environment variables.
    ///
    /// Unset variables come back empty; see [`Credentials::missing`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            practicum_token: read(PRACTICUM_TOKEN),
            telegram_token: read(TELEGRAM_TOKEN),
            telegram_chat_id: read(TELEGRAM_CHAT_ID),
        }
    }

    /// Names of the credentials that are empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN, &self.practicum_token),
            (TELEGRAM_TOKEN, &self.telegram_token),
            (TELEGRAM_CHAT_ID, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |s: &str| if s.is_empty() { "<empty>" } else { "<set>" };
        f.debug_struct("Credentials")
            .field("practicum_token", &mask(&self.practicum_token))
            .field("telegram_token", &mask(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}
