// src/services/messenger.rs

//! Telegram delivery channel.

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::http::describe_error;

/// A channel that delivers plain text messages.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver one message. No retries.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Bot API `sendMessage` payload.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API reply envelope.
#[derive(Debug, Deserialize)]
struct BotReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages to a single chat through the Telegram Bot API.
pub struct TelegramMessenger {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramMessenger {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn build_request(&self, text: &str) -> Result<Request> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        );
        self.client
            .post(url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .build()
            .map_err(|e| AppError::delivery(describe_error(e)))
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, text: &str) -> Result<()> {
        let request = self.build_request(text)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::delivery(describe_error(e)))?;

        let status = response.status();
        let reply = response.json::<BotReply>().await.ok();

        match reply {
            Some(BotReply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(BotReply { description, .. }) => Err(AppError::delivery(format!(
                "Telegram answered {}: {}",
                status,
                description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(AppError::delivery(format!(
                "Telegram answered {status} with an unreadable body"
            ))),
        }
    }
}
