//! HTTP transport for the Zendesk REST API.
//!
//! This module provides `HttpClient`, the reqwest-backed [`Transport`].
//!
//! # Retry Logic
//!
//! The client automatically retries transient failures:
//! - HTTP 429 (rate limit): `Retry-After` if sent, else exponential backoff from 100ms
//! - HTTP 5xx: fixed 500ms delay
//! - Timeouts and connection errors: fixed 100ms delay
//!
//! Client errors (4xx except 429) are not retried.
//!
//! # Security
//!
//! The API token is never logged. All error messages are sanitized before logging.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::ZendeskError;
use crate::transport::{QueryParams, Transport};

/// Initial delay for exponential backoff (milliseconds).
const INITIAL_BACKOFF_MS: u64 = 100;

/// Ceiling for the rate-limit backoff (milliseconds).
const MAX_BACKOFF_MS: u64 = 30_000;

/// Delay before retrying after server error (milliseconds).
const SERVER_ERROR_DELAY_MS: u64 = 500;

/// Maximum length for raw error bodies carried in error messages.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the Zendesk API.
///
/// Handles authentication, request formatting, retries and response parsing.
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying HTTP client.
    http: Client,

    /// Base URL, e.g. `https://acme.zendesk.com/api/v2`.
    endpoint: String,

    /// Basic-auth user (`{email}/token`).
    auth_user: String,

    /// API token.
    /// SECURITY: Never log this value!
    token: String,

    /// Timeout applied to every request, kept for error reporting.
    timeout: Duration,

    /// Default retry count for transient failures.
    max_retries: u32,
}

impl HttpClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ZendeskError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("zendesk-sdk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ZendeskError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            auth_user: config.auth_user(),
            token: config.token().to_string(),
            timeout: config.timeout,
            max_retries: config.max_retries,
        })
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Tests connectivity by fetching the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Authentication` for bad credentials, or the
    /// transport error for anything else.
    pub async fn test_connection(&self) -> Result<(), ZendeskError> {
        tracing::debug!("Testing connection to Zendesk");

        match self.get("users/me.json", &QueryParams::new(), Some(0)).await {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    error = %e.sanitized_display(&self.token),
                    "Connection test failed"
                );
                Err(e)
            }
        }
    }

    /// Executes an operation with retry logic for transient failures.
    async fn with_retry<T, F, Fut>(
        &self,
        operation: &str,
        max_retries: Option<u32>,
        f: F,
    ) -> Result<T, ZendeskError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ZendeskError>>,
    {
        let max_attempts = attempt_budget(max_retries.unwrap_or(self.max_retries));
        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempts < max_attempts => {
                    let actual_delay = if e.is_rate_limit() {
                        e.retry_after().unwrap_or(delay)
                    } else if matches!(e, ZendeskError::ServiceUnavailable { .. }) {
                        Duration::from_millis(SERVER_ERROR_DELAY_MS)
                    } else {
                        e.retry_after().unwrap_or(delay)
                    };

                    tracing::debug!(
                        operation = operation,
                        attempt = attempts,
                        max_attempts = max_attempts,
                        delay_ms = actual_delay.as_millis() as u64,
                        error = %e.sanitized_display(&self.token),
                        "Retrying after transient error"
                    );

                    tokio::time::sleep(actual_delay).await;

                    if e.is_rate_limit() {
                        delay = next_backoff(delay);
                    }
                }
                Err(e) => {
                    if attempts > 1 {
                        tracing::debug!(
                            operation = operation,
                            attempts = attempts,
                            "All retry attempts exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Makes a single request without retry logic.
    ///
    /// Returns `None` when the response body is empty (e.g. 204 No Content).
    async fn request_inner(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ZendeskError> {
        let url = self.url_for(path);

        tracing::debug!(method = %method, path = %path, "Making Zendesk API request");

        let mut req = self
            .http
            .request(method.clone(), &url)
            .basic_auth(&self.auth_user, Some(&self.token))
            .header("Accept", "application/json");

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                return ZendeskError::timeout(self.timeout, format!("{} {}", method, path));
            }
            ZendeskError::Http(e)
        })?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response).await);
        }

        let text = response.text().await.map_err(ZendeskError::Http)?;

        tracing::trace!(body_len = text.len(), "Zendesk API response");

        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(ZendeskError::Serialization)
    }

    /// Makes a request with automatic retry for transient failures.
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Option<Value>, ZendeskError> {
        let operation = format!("{} {}", method, path);
        self.with_retry(&operation, max_retries, || {
            self.request_inner(method.clone(), path, params, body)
        })
        .await
    }

    /// Handles HTTP-level errors and converts to ZendeskError.
    async fn handle_http_error(&self, status: StatusCode, response: reqwest::Response) -> ZendeskError {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let message = ZendeskError::sanitize_message(&error_message(&body), &self.token);

        tracing::debug!(status = %status, message = %message, "Zendesk API error response");

        ZendeskError::from_status(status, message, retry_after)
    }
}

/// Pulls a human-readable message out of a Zendesk error body.
///
/// Zendesk uses several shapes: `{"error": "RecordNotFound", "description": ".."}`,
/// `{"error": {"title": "..", "message": ".."}}` and plain text.
/// Total attempts allowed for a retry count.
fn attempt_budget(max_retries: u32) -> u32 {
    max_retries.saturating_add(1)
}

/// Doubles a backoff delay, capped at [`MAX_BACKOFF_MS`].
fn next_backoff(delay: Duration) -> Duration {
    delay
        .saturating_mul(2)
        .min(Duration::from_millis(MAX_BACKOFF_MS))
}

fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let description = json.get("description").and_then(Value::as_str);
        match json.get("error") {
            Some(Value::String(error)) => {
                return match description {
                    Some(description) => format!("{}: {}", error, description),
                    None => error.clone(),
                };
            }
            Some(Value::Object(error)) => {
                let title = error.get("title").and_then(Value::as_str);
                let message = error.get("message").and_then(Value::as_str);
                match (title, message) {
                    (Some(t), Some(m)) => return format!("{}: {}", t, m),
                    (Some(t), None) => return t.to_string(),
                    (None, Some(m)) => return m.to_string(),
                    (None, None) => {}
                }
            }
            _ => {}
        }
        if let Some(description) = description {
            return description.to_string();
        }
    }

    let body = body.trim();
    if body.chars().count() > MAX_ERROR_BODY_LEN {
        let truncated: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
        format!("{}...", truncated)
    } else {
        body.to_string()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(
        &self,
        path: &str,
        params: &QueryParams,
        max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError> {
        self.request(Method::GET, path, Some(params), None, max_retries)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError> {
        self.request(Method::POST, path, None, body, max_retries)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError> {
        self.request(Method::PUT, path, None, body, max_retries)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn delete(
        &self,
        path: &str,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Option<Value>, ZendeskError> {
        self.request(Method::DELETE, path, None, body, max_retries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> HttpClient {
        let config = Config::new("acme", "agent@example.com", "secret-token-1")
            .unwrap()
            .with_endpoint("https://acme.zendesk.com/api/v2/")
            .unwrap();
        HttpClient::new(&config).unwrap()
    }

    #[test]
    fn test_attempt_budget_saturates() {
        assert_eq!(attempt_budget(0), 1);
        assert_eq!(attempt_budget(3), 4);
        assert_eq!(attempt_budget(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_backoff_doubles_up_to_ceiling() {
        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        delay = next_backoff(delay);
        assert_eq!(delay, Duration::from_millis(200));

        for _ in 0..100 {
            delay = next_backoff(delay);
        }
        assert_eq!(delay, Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(next_backoff(Duration::MAX), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_url_for_tolerates_leading_slash() {
        let client = test_client();
        assert_eq!(
            client.url_for("/tickets/1.json"),
            "https://acme.zendesk.com/api/v2/tickets/1.json"
        );
        assert_eq!(
            client.url_for("tickets/1.json"),
            "https://acme.zendesk.com/api/v2/tickets/1.json"
        );
    }

    #[test]
    fn test_error_message_string_with_description() {
        let body = r#"{"error": "RecordNotFound", "description": "Not found"}"#;
        assert_eq!(error_message(body), "RecordNotFound: Not found");
    }

    #[test]
    fn test_error_message_object() {
        let body = r#"{"error": {"title": "Forbidden", "message": "You do not have access"}}"#;
        assert_eq!(error_message(body), "Forbidden: You do not have access");
    }

    #[test]
    fn test_error_message_plain_text_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LEN + 20);
        let message = error_message(&body);
        assert!(message.ends_with("..."));
        assert_eq!(message.len(), MAX_ERROR_BODY_LEN + 3);
    }
}
