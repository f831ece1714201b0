// src/utils/http.rs

//! HTTP client utilities.

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
///
/// Timeouts are left at the transport defaults.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .build()?)
}

/// Render a transport error and its causes without the request URL.
///
/// Bot API URLs embed the bot token, so it must never reach logs or chats.
pub fn describe_error(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut text = error.to_string();
    let mut source = std::error::Error::source(&error);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
