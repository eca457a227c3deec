//! Resource clients, one per API area.
//!
//! Every client holds the shared `Arc<dyn Transport>`; they are built once by
//! [`ZendeskClient`](crate::client::ZendeskClient) and cheap to clone.

mod attachments;
mod help_center;
mod organizations;
mod search;
mod tickets;
mod users;

pub use attachments::AttachmentsClient;
pub use help_center::{
    ArticleSearch, ArticlesClient, CategoriesClient, HelpCenterClient, SectionsClient,
};
pub use organizations::OrganizationsClient;
pub use search::SearchClient;
pub use tickets::{CommentsClient, TagsClient, TicketsClient};
pub use users::UsersClient;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ZendeskError;

/// Wraps a payload in its `{"<key>": ...}` request envelope.
pub(crate) fn envelope<T: Serialize>(key: &str, payload: &T) -> Result<Value, ZendeskError> {
    Ok(json!({ key: serde_json::to_value(payload)? }))
}

/// Rejects an empty or whitespace-only required field.
pub(crate) fn require(value: Option<&str>, field: &str) -> Result<(), ZendeskError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ZendeskError::validation(format!("{} is required", field))),
    }
}
