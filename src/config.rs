//! Configuration management for the Zendesk SDK.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ZendeskError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for connecting to a Zendesk account.
///
/// The API token is stored but never logged or exposed in error messages.
#[derive(Clone)]
pub struct Config {
    /// Zendesk subdomain (`mycompany` for `mycompany.zendesk.com`).
    pub subdomain: String,

    /// Agent email used for token authentication.
    pub email: String,

    /// API token.
    /// This value must never be logged or included in error messages.
    token: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Retries for transient failures (429, 5xx, timeouts).
    pub max_retries: u32,

    /// Overrides the computed API endpoint (proxies, tests).
    endpoint_override: Option<String>,
}

impl Config {
    /// Creates a validated configuration with default timeout and retries.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if any value fails validation.
    pub fn new(
        subdomain: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ZendeskError> {
        let subdomain = Self::validate_subdomain(subdomain.into())?;
        let email = Self::validate_email(email.into())?;
        let token = token.into();
        Self::validate_token(&token)?;

        Ok(Config {
            subdomain,
            email,
            token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            endpoint_override: None,
        })
    }

    /// Loads configuration from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `ZENDESK_SUBDOMAIN`: Account subdomain
    /// - `ZENDESK_EMAIL`: Agent email
    /// - `ZENDESK_TOKEN`: API token
    ///
    /// # Optional Environment Variables
    ///
    /// - `ZENDESK_TIMEOUT_SECS`: Request timeout (default 30)
    /// - `ZENDESK_MAX_RETRIES`: Retry count (default 3)
    /// - `ZENDESK_ENDPOINT`: Full API base URL, overriding the subdomain
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, ZendeskError> {
        let mut config = Self::new(
            Self::get_required_env("ZENDESK_SUBDOMAIN")?,
            Self::get_required_env("ZENDESK_EMAIL")?,
            Self::get_required_env("ZENDESK_TOKEN")?,
        )?;

        if let Some(secs) = Self::get_optional_env("ZENDESK_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                ZendeskError::invalid_config("ZENDESK_TIMEOUT_SECS must be a whole number")
            })?;
            config = config.with_timeout(Duration::from_secs(secs))?;
        }

        if let Some(retries) = Self::get_optional_env("ZENDESK_MAX_RETRIES") {
            let retries = retries.parse::<u32>().map_err(|_| {
                ZendeskError::invalid_config("ZENDESK_MAX_RETRIES must be a whole number")
            })?;
            config = config.with_max_retries(retries);
        }

        if let Some(endpoint) = Self::get_optional_env("ZENDESK_ENDPOINT") {
            config = config.with_endpoint(endpoint)?;
        }

        Ok(config)
    }

    /// Sets the request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` for a zero timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ZendeskError> {
        if timeout.is_zero() {
            return Err(ZendeskError::invalid_config("timeout must be greater than zero"));
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// Sets the default retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Points the client at a different API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Config` if the URL is not http(s).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ZendeskError> {
        self.endpoint_override = Some(Self::validate_endpoint(endpoint.into())?);
        Ok(self)
    }

    /// Base API URL, without trailing slash.
    pub fn endpoint(&self) -> String {
        match &self.endpoint_override {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.zendesk.com/api/v2", self.subdomain),
        }
    }

    /// Basic-auth user name for token authentication.
    pub fn auth_user(&self) -> String {
        format!("{}/token", self.email)
    }

    /// Returns the API token.
    ///
    /// Only for building the auth header and sanitizing messages; never log it.
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, ZendeskError> {
        Self::get_optional_env(name).ok_or_else(|| ZendeskError::missing_env(name))
    }

    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.trim().is_empty())
    }

    fn validate_subdomain(subdomain: String) -> Result<String, ZendeskError> {
        let subdomain = subdomain.trim().to_lowercase();
        if subdomain.is_empty()
            || !subdomain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_SUBDOMAIN can only contain letters, numbers, hyphens and underscores",
            ));
        }
        Ok(subdomain)
    }

    fn validate_email(email: String) -> Result<String, ZendeskError> {
        let email = email.trim().to_string();
        if !email.contains('@') {
            return Err(ZendeskError::invalid_config("ZENDESK_EMAIL is not a valid email"));
        }
        Ok(email)
    }

    /// Validates the token is not empty or a placeholder value.
    fn validate_token(token: &str) -> Result<(), ZendeskError> {
        if token.trim().is_empty() {
            return Err(ZendeskError::missing_env("ZENDESK_TOKEN"));
        }

        let token_lower = token.to_lowercase();
        let placeholder_patterns = ["your_token", "your_api_token", "placeholder", "xxx", "changeme"];

        for pattern in placeholder_patterns {
            if token_lower.contains(pattern) {
                return Err(ZendeskError::invalid_config(
                    "ZENDESK_TOKEN appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }

    /// Validates and normalizes an endpoint URL.
    fn validate_endpoint(endpoint: String) -> Result<String, ZendeskError> {
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&endpoint)
            .map_err(|e| ZendeskError::invalid_config(format!("invalid endpoint URL: {}", e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ZendeskError::invalid_config(
                "ZENDESK_ENDPOINT must start with http:// or https://",
            ));
        }

        Ok(endpoint)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("endpoint", &self.endpoint())
            .finish()
    }
}
