//! # zendesk-sdk
//!
//! Async client for the Zendesk Support and Help Center REST APIs.
//!
//! ## Features
//!
//! - **Pagination**: offset, cursor and search-export protocols behind one
//!   lazy [`Paginator`](pagination::Paginator) stream
//! - **Enrichment**: tickets bundled with their comments and every referenced
//!   user, using batched and concurrent lookups
//! - **Resources**: users, organizations, tickets, comments, tags,
//!   attachments, search and Help Center content
//! - **Retries**: 429 and 5xx responses are retried with backoff by the
//!   HTTP transport
//! - **Security**: the API token is never logged
//!
//! ## Architecture
//!
//! - [`config`] - Account settings loaded from the environment
//! - [`error`] - The [`ZendeskError`](error::ZendeskError) type
//! - [`transport`] - The four-verb [`Transport`](transport::Transport) trait
//! - [`http_client`] - reqwest-backed transport with retry
//! - [`pagination`] - Pagination strategies and the generic paginator
//! - [`enrichment`] - The [`Enricher`](enrichment::Enricher)
//! - [`models`] - API data types and request payloads
//! - [`clients`] - One client per API area
//! - [`client`] - [`ZendeskClient`](client::ZendeskClient), the entry point
//!
//! ## Configuration
//!
//! - `ZENDESK_SUBDOMAIN`: account subdomain (`acme` for acme.zendesk.com)
//! - `ZENDESK_EMAIL`: agent email
//! - `ZENDESK_TOKEN`: API token
//!
//! Optional:
//! - `ZENDESK_TIMEOUT_SECS`, `ZENDESK_MAX_RETRIES`, `ZENDESK_ENDPOINT`
//! - `RUST_LOG`: log level (e.g., `zendesk_sdk=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use zendesk_sdk::{Config, SearchQuery, ZendeskClient};
//!
//! async fn example() -> Result<(), zendesk_sdk::ZendeskError> {
//!     let client = ZendeskClient::new(&Config::from_env()?)?;
//!
//!     let query = SearchQuery::new().with_status("open").with_priority("urgent");
//!     let mut tickets = client.tickets.search_enriched(query, 100, Some(50));
//!     while let Some(enriched) = tickets.try_next().await? {
//!         println!(
//!             "#{:?} {} comments, requester {:?}",
//!             enriched.ticket.id,
//!             enriched.comments.len(),
//!             enriched.requester().map(|u| u.display_name()),
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod clients;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod http_client;
pub mod models;
pub mod pagination;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::ZendeskClient;
pub use config::Config;
pub use enrichment::Enricher;
pub use error::ZendeskError;
pub use models::{EnrichedTicket, SearchQuery, SearchType};
pub use pagination::{
    CursorPaginator, ExportCursorPaginator, OffsetPaginator, Paginator, TimeBasedPaginator,
};
pub use transport::Transport;
