//! Data models for the Zendesk API.
//!
//! This module contains the entity types returned by the API (users,
//! organizations, tickets, comments, Help Center content), the composite
//! [`EnrichedTicket`], the search query builder and the request payloads
//! sent by the resource clients.

mod comment;
mod enriched;
mod help_center;
mod organization;
mod search;
mod ticket;
mod user;

pub use comment::*;
pub use enriched::*;
pub use help_center::*;
pub use organization::*;
pub use search::*;
pub use ticket::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Deserializes `null` as the type's default (Zendesk sends `null` for empty lists).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pulls the object stored under `key` out of a response envelope and decodes it.
pub(crate) fn from_envelope<T>(response: &serde_json::Value, key: &str) -> Result<T, crate::error::ZendeskError>
where
    T: serde::de::DeserializeOwned,
{
    let value = response
        .get(key)
        .ok_or_else(|| crate::error::ZendeskError::unexpected_response(key))?;
    serde_json::from_value(value.clone()).map_err(crate::error::ZendeskError::Serialization)
}

/// Decodes the array stored under `key`; a missing key is an empty list.
pub(crate) fn list_from_envelope<T>(
    response: &serde_json::Value,
    key: &str,
) -> Result<Vec<T>, crate::error::ZendeskError>
where
    T: serde::de::DeserializeOwned,
{
    match response.get(key) {
        Some(value) if !value.is_null() => serde_json::from_value(value.clone())
            .map_err(crate::error::ZendeskError::Serialization),
        _ => Ok(Vec::new()),
    }
}
