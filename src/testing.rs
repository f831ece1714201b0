//! Test doubles shared across module tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::services::{HomeworkSource, Messenger};

/// Serve a single HTTP response on a random local port.
///
/// Returns the base URL and a handle resolving to the raw request text.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
            if request_complete(&raw) {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (url, handle)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

/// Source replaying scripted replies, then failing once exhausted.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    replies: Arc<Mutex<VecDeque<Result<Value>>>>,
    calls: Arc<Mutex<Vec<Option<i64>>>>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Result<Value>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::default(),
        }
    }

    /// `from_date` values the source was queried with.
    pub fn calls(&self) -> Vec<Option<i64>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HomeworkSource for ScriptedSource {
    async fn fetch(&self, from_date: Option<i64>) -> Result<Value> {
        self.calls.lock().unwrap().push(from_date);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::transport("script exhausted")))
    }
}

/// Messenger that records delivered texts and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, text: &str) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::delivery("channel unavailable"));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
