//! HTTP client for the homework status endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::error::{ApiError, Result};

/// Default status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Query parameter carrying the poll cursor.
pub const SINCE_PARAM: &str = "since";

/// Something that can return the raw status response for a cursor.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch all status changes since the given Unix timestamp.
    async fn fetch(&self, since: i64) -> Result<Value>;
}

/// Client for the review API, authenticated with an OAuth token.
#[derive(Debug, Clone)]
pub struct ReviewClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl ReviewClient {
    /// Creates a client for `endpoint` with a bounded request timeout.
    pub fn new(endpoint: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Connection)?;

        Ok(Self {
            http,
            endpoint,
            token: token.into(),
        })
    }

    /// Perform one GET against the endpoint.
    ///
    /// Non-200 answers of any class map to [`ApiError::ServerStatus`]. Nothing
    /// is retried here.
    pub async fn get_api_answer(&self, since: i64) -> Result<Value> {
        info!(endpoint = %self.endpoint, since, "requesting homework statuses");

        let response = self
            .http
            .get(self.endpoint.clone())
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[(SINCE_PARAM, since)])
            .send()
            .await
            .map_err(ApiError::Connection)?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = %status, "unexpected API status");
            return Err(ApiError::ServerStatus(status));
        }

        let body = response.text().await.map_err(ApiError::Connection)?;
        let json = serde_json::from_str(&body)?;
        debug!(bytes = body.len(), "received API answer");
        Ok(json)
    }
}

#[async_trait]
impl HomeworkSource for ReviewClient {
    async fn fetch(&self, since: i64) -> Result<Value> {
        self.get_api_answer(since).await
    }
}
