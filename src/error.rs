//! Error types for the Zendesk SDK.
//!
//! This module defines `ZendeskError`, the unified error type returned by the
//! transport, the paginators, the enrichment orchestrator and every resource
//! facade.
//!
//! # Security
//!
//! Error messages may be built from server responses. Use
//! `sanitize_message()` before logging anything that could echo the API token.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Position of a paginator at the moment a page fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Resource path being paginated.
    pub path: String,
    /// 1-based page number (offset pagination only).
    pub page: Option<u32>,
    /// Cursor sent with the failing request, if any.
    pub cursor: Option<String>,
    /// Requested page size.
    pub page_size: u32,
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (page_size={}", self.path, self.page_size)?;
        if let Some(page) = self.page {
            write!(f, ", page={}", page)?;
        }
        if let Some(cursor) = &self.cursor {
            write!(f, ", cursor={}", cursor)?;
        }
        write!(f, ")")
    }
}

/// Unified error type for all SDK operations.
#[derive(Error, Debug)]
pub enum ZendeskError {
    /// Configuration error - missing or invalid settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// The HTTP status code returned.
        status: StatusCode,
        /// Error message extracted from the response body.
        message: String,
        /// Server-provided retry hint, if any.
        retry_after: Option<Duration>,
    },

    /// Authentication failed (HTTP 401).
    #[error("authentication failed: {message} - check ZENDESK_EMAIL and ZENDESK_TOKEN")]
    Authentication {
        /// Error message extracted from the response body.
        message: String,
    },

    /// Rate limited by the server (HTTP 429).
    #[error("rate limited by server: {message}")]
    RateLimited {
        /// Error message extracted from the response body.
        message: String,
        /// Suggested retry delay, if provided by server.
        retry_after: Option<Duration>,
    },

    /// Server-side failure (HTTP 5xx).
    #[error("service temporarily unavailable ({status}): {message}")]
    ServiceUnavailable {
        /// The specific status code.
        status: StatusCode,
        /// Error message extracted from the response body.
        message: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?}: {operation}")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A response was missing the key its envelope should carry.
    #[error("unexpected response: missing `{field}`")]
    UnexpectedResponse {
        /// The envelope key that was expected.
        field: String,
    },

    /// An entity handed to the enrichment orchestrator has no identifier.
    #[error("{entity} has no id")]
    MissingId {
        /// Kind of entity, e.g. "ticket".
        entity: &'static str,
    },

    /// A page fetch failed in the middle of a traversal.
    #[error("pagination failed at {context}: {source}")]
    Pagination {
        /// Where the paginator was when the fetch failed.
        context: PageContext,
        /// The underlying transport error.
        #[source]
        source: Box<ZendeskError>,
    },
}

impl ZendeskError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        ZendeskError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ZendeskError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ZendeskError::Validation(message.into())
    }

    /// Creates an error for a response envelope missing `field`.
    pub fn unexpected_response(field: impl Into<String>) -> Self {
        ZendeskError::UnexpectedResponse {
            field: field.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        ZendeskError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Wraps a transport error with the paginator position it happened at.
    pub fn pagination(context: PageContext, source: ZendeskError) -> Self {
        ZendeskError::Pagination {
            context,
            source: Box::new(source),
        }
    }

    /// Builds the typed error for a non-success HTTP status.
    pub fn from_status(status: StatusCode, message: String, retry_after: Option<Duration>) -> Self {
        // empty bodies still get a readable message
        let message = if message.trim().is_empty() {
            status.canonical_reason().unwrap_or("no details").to_string()
        } else {
            message
        };
        match status.as_u16() {
            401 => ZendeskError::Authentication { message },
            429 => ZendeskError::RateLimited {
                message,
                retry_after,
            },
            _ if status.is_server_error() => ZendeskError::ServiceUnavailable { status, message },
            _ => ZendeskError::HttpStatus {
                status,
                message,
                retry_after,
            },
        }
    }

    /// Returns the HTTP status this error stands for, if any.
    ///
    /// Pagination errors report the status of the error they wrap.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ZendeskError::HttpStatus { status, .. } => Some(status.as_u16()),
            ZendeskError::ServiceUnavailable { status, .. } => Some(status.as_u16()),
            ZendeskError::Authentication { .. } => Some(401),
            ZendeskError::RateLimited { .. } => Some(429),
            ZendeskError::Pagination { source, .. } => source.status_code(),
            _ => None,
        }
    }

    /// Returns true for the search API's result-window ceiling (HTTP 422 on deep pages).
    #[must_use]
    pub fn is_result_window_limit(&self) -> bool {
        self.status_code() == Some(422)
    }

    /// Returns true if this error is transient and the operation should be retried.
    ///
    /// Retryable errors include:
    /// - Rate limiting (HTTP 429)
    /// - Server errors (HTTP 5xx)
    /// - Timeouts and connection failures
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ZendeskError::RateLimited { .. } => true,
            ZendeskError::ServiceUnavailable { .. } => true,
            ZendeskError::Timeout { .. } => true,
            ZendeskError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns true if this is a rate limit error, indicating we should back off.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ZendeskError::RateLimited { .. })
    }

    /// Returns the suggested delay before retry, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ZendeskError::RateLimited { retry_after, .. } => *retry_after,
            ZendeskError::HttpStatus { retry_after, .. } => *retry_after,
            ZendeskError::ServiceUnavailable { .. } => Some(Duration::from_millis(500)),
            ZendeskError::Timeout { .. } => Some(Duration::from_millis(100)),
            ZendeskError::Pagination { source, .. } => source.retry_after(),
            _ => None,
        }
    }

    /// Sanitizes an error message to remove any occurrence of the API token.
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the token replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, token: &str) -> String {
        if token.is_empty() {
            return message.to_string();
        }
        message.replace(token, "[REDACTED]")
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display(&self, token: &str) -> String {
        Self::sanitize_message(&self.to_string(), token)
    }
}
