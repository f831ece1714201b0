// src/services/fetcher.rs

//! Review API client.
//!
//! Issues the timestamped homework status query and returns the decoded
//! body. Shape checks are left to [`crate::pipeline::check_response`].

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Request, StatusCode};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::utils::http::describe_error;

/// Source of raw homework status replies.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Query statuses changed since `from_date` (unix seconds, now if `None`).
    ///
    /// Performs exactly one request; retrying is up to the caller.
    async fn fetch(&self, from_date: Option<i64>) -> Result<Value>;
}

/// Homework status client for the Practicum review API.
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(client: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    fn build_request(&self, from_date: i64) -> Result<Request> {
        self.client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
            .map_err(|e| AppError::transport(describe_error(e)))
    }

    fn check_status(status: StatusCode) -> Result<()> {
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(AppError::transport(format!(
                "unexpected status {status} from review API"
            )))
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: Option<i64>) -> Result<Value> {
        let from_date = from_date.unwrap_or_else(|| Utc::now().timestamp());
        let request = self.build_request(from_date)?;
        log::debug!("Querying review API from_date={}", from_date);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| AppError::transport(describe_error(e)))?;
        Self::check_status(response.status())?;

        response.json::<Value>().await.map_err(|e| {
            AppError::transport(format!("response body is not JSON: {}", describe_error(e)))
        })
    }
}
