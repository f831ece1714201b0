// src/pipeline/poll.rs

//! Poll loop driver.
//!
//! Each cycle runs fetch → validate → translate → notify against the
//! current [`PollWindow`]. A failed cycle is reported through the
//! [`Notifier`] and leaves the window where it was; the loop then sleeps
//! the same fixed interval as after a successful cycle.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials, Messages, PollWindow};
use crate::pipeline::notify::{ErrorDelivery, Notifier};
use crate::pipeline::{check_response, parse_status};
use crate::services::{HomeworkSource, PracticumClient, TelegramMessenger};
use crate::utils::http;

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// The latest homework changed status; `delivered` is false if the
    /// channel refused the message.
    StatusChanged { message: String, delivered: bool },
    /// The API reported no changes in the window.
    NoChange,
    /// The cycle failed; `error` is the notification text.
    Failed {
        error: String,
        delivery: ErrorDelivery,
    },
}

/// Result of a fetch that passed validation and translation.
struct Observation {
    message: Option<String>,
    cursor: Option<i64>,
}

/// Owns the loop state: window, notifier and collaborators.
pub struct Poller {
    source: Box<dyn HomeworkSource>,
    notifier: Notifier,
    messages: Messages,
    window: PollWindow,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: Box<dyn HomeworkSource>,
        notifier: Notifier,
        messages: Messages,
        window: PollWindow,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            notifier,
            messages,
            window,
            interval,
        }
    }

    pub fn window(&self) -> PollWindow {
        self.window
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Run one cycle.
    ///
    /// Cycle failures are reported and folded into the returned report.
    /// Any other error kind is a defect and is returned as `Err`.
    pub async fn tick(&mut self) -> Result<CycleReport> {
        match self.observe().await {
            Ok(Observation { message, cursor }) => {
                let report = match message {
                    Some(message) => {
                        let delivered = self.notifier.send_status(&message).await;
                        CycleReport::StatusChanged { message, delivered }
                    }
                    None => {
                        log::info!(
                            "No homework status changes since {}",
                            self.window.from_date()
                        );
                        CycleReport::NoChange
                    }
                };

                self.notifier.reset();
                if self.window.advance(cursor) {
                    log::debug!("Poll window moved to {}", self.window.from_date());
                }
                Ok(report)
            }
            Err(error) if error.is_cycle_failure() => {
                log::error!("Poll cycle failed: {}", error);
                let text = self.messages.failure(&error);
                let delivery = self.notifier.send_error(&text).await;
                Ok(CycleReport::Failed {
                    error: text,
                    delivery,
                })
            }
            Err(error) => Err(error),
        }
    }

    /// Run cycles until `shutdown` resolves, sleeping the fixed interval
    /// after every cycle.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        log::info!(
            "Polling every {}s starting from {}",
            self.interval.as_secs(),
            self.window.from_date()
        );

        loop {
            self.tick().await?;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    log::info!("Shutdown requested, stopping poll loop");
                    return Ok(());
                }
            }
        }
    }

    async fn observe(&self) -> Result<Observation> {
        let body = self.source.fetch(Some(self.window.from_date())).await?;
        let batch = check_response(body)?;
        let message = batch
            .latest()
            .map(|record| parse_status(record, &self.messages))
            .transpose()?;

        Ok(Observation {
            message,
            cursor: batch.current_date,
        })
    }
}

/// Refuse to start when any credential is empty.
///
/// Logs the problem and makes one attempt to notify the channel.
pub async fn check_credentials(
    credentials: &Credentials,
    notifier: &mut Notifier,
    messages: &Messages,
) -> Result<()> {
    let missing = credentials.missing();
    if missing.is_empty() {
        return Ok(());
    }

    let error = AppError::MissingCredentials(missing);
    log::error!("{}", error);
    notifier.send_error(&messages.failure(&error)).await;
    Err(error)
}

/// Wire the real services and check credentials.
///
/// `from_date` overrides the initial window, which otherwise starts now.
pub async fn prepare(
    config: &Config,
    credentials: &Credentials,
    from_date: Option<i64>,
) -> Result<Poller> {
    let client = http::create_async_client(&config.http)?;

    let messenger = TelegramMessenger::new(
        client.clone(),
        &config.telegram.api_url,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    );
    let mut notifier = Notifier::new(Box::new(messenger));
    check_credentials(credentials, &mut notifier, &config.messages).await?;

    let source = PracticumClient::new(client, &config.api.endpoint, &credentials.practicum_token);
    let window = from_date.map(PollWindow::new).unwrap_or_else(PollWindow::now);

    Ok(Poller::new(
        Box::new(source),
        notifier,
        config.messages.clone(),
        window,
        Duration::from_secs(config.poll.interval_secs),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::error::SchemaError;
    use crate::testing::{RecordingMessenger, ScriptedSource};

    const INTERVAL: Duration = Duration::from_secs(600);

    fn poller(replies: Vec<Result<Value>>) -> (Poller, ScriptedSource, RecordingMessenger) {
        let source = ScriptedSource::new(replies);
        let messenger = RecordingMessenger::default();
        let poller = Poller::new(
            Box::new(source.clone()),
            Notifier::new(Box::new(messenger.clone())),
            Messages::default(),
            PollWindow::new(500),
            INTERVAL,
        );
        (poller, source, messenger)
    }

    fn unavailable() -> Result<Value> {
        Err(AppError::transport(
            "unexpected status 503 Service Unavailable from review API",
        ))
    }

    fn approved() -> Result<Value> {
        Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        }))
    }

    #[tokio::test]
    async fn test_status_change_advances_window() {
        let (mut poller, source, messenger) = poller(vec![approved()]);

        let report = poller.tick().await.unwrap();

        let expected =
            "Changed review status for \"hw1\". Work reviewed: the reviewer liked everything. Hooray!";
        assert_eq!(
            report,
            CycleReport::StatusChanged {
                message: expected.to_string(),
                delivered: true
            }
        );
        assert_eq!(messenger.sent(), vec![expected]);
        assert_eq!(source.calls(), vec![Some(500)]);
        assert_eq!(poller.window().from_date(), 1000);
    }

    #[tokio::test]
    async fn test_empty_batch_is_no_change() {
        let (mut poller, _source, messenger) = poller(vec![Ok(json!({"homeworks": []}))]);

        assert_eq!(poller.tick().await.unwrap(), CycleReport::NoChange);
        assert!(messenger.sent().is_empty());
        assert_eq!(poller.window().from_date(), 500);
    }

    #[tokio::test]
    async fn test_transport_failure_reports_once() {
        let (mut poller, source, messenger) = poller(vec![unavailable()]);

        let report = poller.tick().await.unwrap();

        let expected = "Program failure: API request failed: unexpected status 503 Service Unavailable from review API";
        assert_eq!(
            report,
            CycleReport::Failed {
                error: expected.to_string(),
                delivery: ErrorDelivery::Sent
            }
        );
        assert_eq!(messenger.sent(), vec![expected]);
        assert_eq!(source.calls(), vec![Some(500)]);
        assert_eq!(poller.window().from_date(), 500);
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_window() {
        let (mut poller, _source, messenger) =
            poller(vec![Ok(json!({"current_date": 2000, "homeworks": "none"}))]);

        let report = poller.tick().await.unwrap();

        assert!(matches!(report, CycleReport::Failed { .. }));
        assert_eq!(
            messenger.sent(),
            vec![format!(
                "Program failure: {}",
                AppError::from(SchemaError::HomeworksNotArray)
            )]
        );
        assert_eq!(poller.window().from_date(), 500);
    }

    #[tokio::test]
    async fn test_unknown_status_takes_error_path() {
        let (mut poller, _source, messenger) = poller(vec![Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "lost"}],
            "current_date": 1000
        }))]);

        let report = poller.tick().await.unwrap();

        assert!(matches!(report, CycleReport::Failed { .. }));
        assert_eq!(
            messenger.sent(),
            vec!["Program failure: Unknown homework status 'lost'"]
        );
        assert_eq!(poller.window().from_date(), 500);
    }

    #[tokio::test]
    async fn test_incomplete_record_takes_error_path() {
        let (mut poller, source, messenger) = poller(vec![Ok(json!({
            "homeworks": [{"status": "approved"}],
            "current_date": 1000
        }))]);

        let report = poller.tick().await.unwrap();

        assert_eq!(
            report,
            CycleReport::Failed {
                error: "Program failure: Incomplete homework record: homework_name".into(),
                delivery: ErrorDelivery::Sent,
            }
        );
        assert_eq!(source.calls(), vec![Some(500)]);
        assert_eq!(
            messenger.sent(),
            vec!["Program failure: Incomplete homework record: homework_name"]
        );
        assert_eq!(poller.window().from_date(), 500);
    }

    #[tokio::test]
    async fn test_error_streak_and_reset() {
        let (mut poller, _source, messenger) = poller(vec![
            unavailable(),
            unavailable(),
            Ok(json!({"homework": []})),
            approved(),
            unavailable(),
        ]);

        for _ in 0..5 {
            poller.tick().await.unwrap();
        }

        let sent = messenger.sent();
        assert_eq!(sent.len(), 4);
        assert!(sent[0].contains("503"));
        assert!(sent[1].contains("'homeworks'"));
        assert!(sent[2].starts_with("Changed review status"));
        assert!(sent[3].contains("503"));
        assert!(!poller.notifier().memo().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_error_is_suppressed() {
        let (mut poller, _source, messenger) = poller(vec![unavailable(), unavailable()]);

        poller.tick().await.unwrap();
        let second = poller.tick().await.unwrap();

        assert!(matches!(
            second,
            CycleReport::Failed {
                delivery: ErrorDelivery::Suppressed,
                ..
            }
        ));
        assert_eq!(messenger.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_status_delivery_failure_still_succeeds() {
        let (mut poller, _source, messenger) = poller(vec![unavailable(), approved()]);

        poller.tick().await.unwrap();
        messenger.set_failing(true);
        let report = poller.tick().await.unwrap();

        assert!(matches!(
            report,
            CycleReport::StatusChanged {
                delivered: false,
                ..
            }
        ));
        assert!(poller.notifier().memo().is_empty());
        assert_eq!(poller.window().from_date(), 1000);
    }

    #[tokio::test]
    async fn test_unexpected_error_kind_surfaces() {
        let (mut poller, _source, messenger) =
            poller(vec![Err(AppError::config("endpoint missing"))]);

        assert!(matches!(poller.tick().await, Err(AppError::Config(_))));
        assert!(messenger.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_sleeps_and_resumes_after_failure() {
        let (mut poller, source, messenger) = poller(vec![unavailable(), approved()]);
        let started = tokio::time::Instant::now();

        poller
            .run_until(tokio::time::sleep(INTERVAL + INTERVAL / 2))
            .await
            .unwrap();

        assert_eq!(source.calls(), vec![Some(500), Some(500)]);
        assert_eq!(messenger.sent().len(), 2);
        assert_eq!(poller.window().from_date(), 1000);
        let elapsed = started.elapsed();
        assert!(elapsed >= INTERVAL + INTERVAL / 2 && elapsed < INTERVAL * 2);
    }

    #[tokio::test]
    async fn test_missing_credentials_block_start() {
        let messenger = RecordingMessenger::default();
        let mut notifier = Notifier::new(Box::new(messenger.clone()));
        let credentials = Credentials {
            practicum_token: "y0_abc".into(),
            telegram_token: "123:xyz".into(),
            telegram_chat_id: String::new(),
        };

        let err = check_credentials(&credentials, &mut notifier, &Messages::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingCredentials(ref names) if names == &["TELEGRAM_CHAT_ID"]));
        let sent = messenger.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("TELEGRAM_CHAT_ID"));
    }

    #[tokio::test]
    async fn test_complete_credentials_pass() {
        let messenger = RecordingMessenger::default();
        let mut notifier = Notifier::new(Box::new(messenger.clone()));
        let credentials = Credentials {
            practicum_token: "y0_abc".into(),
            telegram_token: "123:xyz".into(),
            telegram_chat_id: "42".into(),
        };

        check_credentials(&credentials, &mut notifier, &Messages::default())
            .await
            .unwrap();
        assert!(messenger.sent().is_empty());
    }
}
