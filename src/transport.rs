//! The four-verb transport contract every other layer is written against.
//!
//! [`HttpClient`](crate::http_client::HttpClient) is the production
//! implementation. Paginators, the enrichment orchestrator and the resource
//! facades only ever hold an `Arc<dyn Transport>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ZendeskError;

/// Query string parameters, kept sorted so requests are reproducible.
pub type QueryParams = BTreeMap<String, String>;

/// Builds a [`QueryParams`] from literal pairs.
pub fn query<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> QueryParams
where
    K: Into<String>,
    V: ToString,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// Signed JSON-over-HTTP calls against the API root.
///
/// Paths are relative to the API endpoint (`tickets/1.json`). Every verb may
/// fail with a typed HTTP error; retrying 429 and 5xx responses is the
/// implementation's job. `max_retries` overrides the configured retry count
/// for a single call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with query parameters.
    async fn get(
        &self,
        path: &str,
        params: &QueryParams,
        max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError>;

    /// POST a JSON body.
    async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError>;

    /// PUT a JSON body.
    async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Value, ZendeskError>;

    /// DELETE, optionally with a JSON body. Empty responses come back as `None`.
    async fn delete(
        &self,
        path: &str,
        body: Option<&Value>,
        max_retries: Option<u32>,
    ) -> Result<Option<Value>, ZendeskError>;
}
