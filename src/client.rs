//! Top-level client.

use std::sync::Arc;

use crate::clients::{
    AttachmentsClient, HelpCenterClient, OrganizationsClient, SearchClient, TicketsClient,
    UsersClient,
};
use crate::config::Config;
use crate::enrichment::Enricher;
use crate::error::ZendeskError;
use crate::http_client::HttpClient;
use crate::models::{Organization, Ticket, User};
use crate::pagination::{CursorPaginator, TimeBasedPaginator};
use crate::transport::{query, QueryParams, Transport};

/// Page size used by cursor-based incremental exports.
pub const INCREMENTAL_PAGE_SIZE: u32 = 1000;

/// Entry point to the API.
///
/// Holds one shared transport and a client per API area, all built once.
///
/// # Example
///
/// ```ignore
/// let client = ZendeskClient::new(&Config::from_env()?)?;
/// let ticket = client.tickets.get_enriched(42).await?;
/// println!("{:?}", ticket.requester().map(|u| u.display_name()));
/// ```
#[derive(Clone)]
pub struct ZendeskClient {
    transport: Arc<dyn Transport>,
    http: Option<HttpClient>,
    pub users: UsersClient,
    pub organizations: OrganizationsClient,
    pub tickets: TicketsClient,
    pub attachments: AttachmentsClient,
    pub search: SearchClient,
    pub help_center: HelpCenterClient,
}

impl ZendeskClient {
    /// Creates a client talking HTTP to the configured account.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, ZendeskError> {
        let http = HttpClient::new(config)?;
        let mut client = Self::with_transport(Arc::new(http.clone()));
        client.http = Some(http);
        Ok(client)
    }

    /// Creates a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            users: UsersClient::new(transport.clone()),
            organizations: OrganizationsClient::new(transport.clone()),
            tickets: TicketsClient::new(transport.clone()),
            attachments: AttachmentsClient::new(transport.clone()),
            search: SearchClient::new(transport.clone()),
            help_center: HelpCenterClient::new(transport.clone()),
            http: None,
            transport,
        }
    }

    /// The shared transport.
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    /// The enrichment orchestrator over this client's transport.
    pub fn enricher(&self) -> Enricher {
        Enricher::new(self.transport.clone())
    }

    /// Checks credentials by fetching the authenticated user. Not retried.
    pub async fn test_connection(&self) -> Result<(), ZendeskError> {
        match &self.http {
            Some(http) => http.test_connection().await,
            None => self
                .transport
                .get("users/me.json", &QueryParams::new(), Some(0))
                .await
                .map(|_| ()),
        }
    }

    /// Cursor-based incremental export of `resource` changed since `start_time`
    /// (Unix seconds). Only `tickets` and `users` have cursor endpoints.
    ///
    /// Items are read from the array named after the resource.
    pub fn incremental<T>(&self, resource: &str, start_time: i64) -> CursorPaginator<T> {
        CursorPaginator::cursor(
            self.transport.clone(),
            format!("incremental/{}/cursor.json", resource),
            resource,
            INCREMENTAL_PAGE_SIZE,
        )
        .with_params(query([("start_time", start_time)]))
    }

    /// Tickets changed since `start_time`.
    pub fn incremental_tickets(&self, start_time: i64) -> CursorPaginator<Ticket> {
        self.incremental("tickets", start_time)
    }

    /// Users changed since `start_time`.
    pub fn incremental_users(&self, start_time: i64) -> CursorPaginator<User> {
        self.incremental("users", start_time)
    }

    /// Time-based incremental export of `resource` over
    /// `incremental/{resource}.json`, for resources without a cursor endpoint.
    pub fn incremental_time_based<T>(
        &self,
        resource: &str,
        start_time: i64,
    ) -> TimeBasedPaginator<T> {
        TimeBasedPaginator::time_based(
            self.transport.clone(),
            format!("incremental/{}.json", resource),
            resource,
            start_time,
        )
    }

    /// Organizations changed since `start_time`.
    pub fn incremental_organizations(&self, start_time: i64) -> TimeBasedPaginator<Organization> {
        self.incremental_time_based("organizations", start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_facades_share_transport() {
        let transport = ScriptedTransport::new()
            .on_get("users/1.json", json!({"user": {"id": 1}}))
            .on_get("tickets/2.json", json!({"ticket": {"id": 2}}))
            .into_arc();
        let client = ZendeskClient::with_transport(transport.clone());

        client.users.get(1).await.unwrap();
        client.tickets.get(2).await.unwrap();

        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_incremental_tickets() {
        let transport = ScriptedTransport::new()
            .on_get(
                "incremental/tickets/cursor.json",
                json!({"tickets": [{"id": 1}], "after_cursor": "c1", "end_of_stream": false}),
            )
            .on_get(
                "incremental/tickets/cursor.json",
                json!({"tickets": [{"id": 2}], "after_cursor": "c2", "end_of_stream": true}),
            )
            .into_arc();
        let client = ZendeskClient::with_transport(transport.clone());

        let tickets = client.incremental_tickets(1_700_000_000).collect().await.unwrap();

        assert_eq!(tickets.len(), 2);
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].params["start_time"], "1700000000");
        assert_eq!(calls[1].params["cursor"], "c1");
        assert_eq!(calls[1].params["start_time"], "1700000000");
    }

    #[tokio::test]
    async fn test_incremental_users() {
        let transport = ScriptedTransport::new()
            .on_get(
                "incremental/users/cursor.json",
                json!({"users": [{"id": 5, "name": "Ann"}], "after_cursor": "u1", "end_of_stream": true}),
            )
            .into_arc();
        let client = ZendeskClient::with_transport(transport.clone());

        let users = client.incremental_users(42).collect().await.unwrap();

        assert_eq!(users[0].display_name(), "Ann");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].params["start_time"], "42");
        assert_eq!(calls[0].params["per_page"], "1000");
    }

    #[tokio::test]
    async fn test_incremental_organizations_follow_end_time() {
        let transport = ScriptedTransport::new()
            .on_get(
                "incremental/organizations.json",
                json!({
                    "organizations": [{"id": 1}, {"id": 2}],
                    "end_time": 1_700_000_500,
                    "end_of_stream": false
                }),
            )
            .on_get(
                "incremental/organizations.json",
                json!({
                    "organizations": [{"id": 3}],
                    "end_time": 1_700_000_900,
                    "end_of_stream": true
                }),
            )
            .into_arc();
        let client = ZendeskClient::with_transport(transport.clone());

        let orgs = client
            .incremental_organizations(1_700_000_000)
            .collect()
            .await
            .unwrap();

        let ids: Vec<u64> = orgs.iter().filter_map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].params["start_time"], "1700000000");
        assert_eq!(calls[1].params["start_time"], "1700000500");
        assert!(transport.calls_to("incremental/organizations/cursor.json").is_empty());
    }

    #[tokio::test]
    async fn test_connection_over_custom_transport() {
        let transport = ScriptedTransport::new()
            .on_get("users/me.json", json!({"user": {"id": 1}}))
            .into_arc();
        let client = ZendeskClient::with_transport(transport);

        tokio_test::assert_ok!(client.test_connection().await);
    }
}
