// src/pipeline/notify.rs

//! Notification delivery with error-streak suppression.

use crate::pipeline::ErrorMemo;
use crate::services::Messenger;

/// Outcome of an error notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDelivery {
    /// Delivered and remembered for the rest of the streak
    Sent,
    /// Same text already delivered during this streak
    Suppressed,
    /// Delivery failed; the text stays unremembered
    Failed,
}

/// Delivers status and error messages to a [`Messenger`].
pub struct Notifier {
    messenger: Box<dyn Messenger>,
    memo: ErrorMemo,
}

impl Notifier {
    pub fn new(messenger: Box<dyn Messenger>) -> Self {
        Self {
            messenger,
            memo: ErrorMemo::new(),
        }
    }

    /// Deliver a status message once. Failures are logged, never raised.
    pub async fn send_status(&self, text: &str) -> bool {
        match self.messenger.send(text).await {
            Ok(()) => {
                log::info!("Sent status message: {}", text);
                true
            }
            Err(e) => {
                log::error!("Failed to send status message: {}", e);
                false
            }
        }
    }

    /// Deliver an error message unless it was already sent in this streak.
    pub async fn send_error(&mut self, text: &str) -> ErrorDelivery {
        if self.memo.contains(text) {
            log::info!("Error already reported, not resending: {}", text);
            return ErrorDelivery::Suppressed;
        }

        match self.messenger.send(text).await {
            Ok(()) => {
                log::info!("Sent error message: {}", text);
                self.memo.record(text);
                ErrorDelivery::Sent
            }
            Err(e) => {
                log::error!("Failed to send error message: {}", e);
                ErrorDelivery::Failed
            }
        }
    }

    /// End the current error streak.
    pub fn reset(&mut self) {
        if !self.memo.is_empty() {
            log::debug!("Clearing {} remembered error(s)", self.memo.len());
        }
        self.memo.clear();
    }

    pub fn memo(&self) -> &ErrorMemo {
        &self.memo
    }
}
