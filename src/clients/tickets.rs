//! Tickets API, with comments and tags as sub-clients.

use std::sync::Arc;

use futures::stream::BoxStream;
use serde_json::json;

use super::envelope;
use crate::enrichment::{users_by_id, Enricher};
use crate::error::ZendeskError;
use crate::models::{
    from_envelope, list_from_envelope, Comment, CommentPayload, EnrichedTicket, SearchInput,
    Ticket,
};
use crate::pagination::OffsetPaginator;
use crate::transport::{query, QueryParams, Transport};

/// Client for `tickets` endpoints.
///
/// Comments and tags live under [`TicketsClient::comments`] and
/// [`TicketsClient::tags`].
#[derive(Clone)]
pub struct TicketsClient {
    transport: Arc<dyn Transport>,
    enricher: Enricher,
    pub comments: CommentsClient,
    pub tags: TagsClient,
}

impl TicketsClient {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            enricher: Enricher::new(transport.clone()),
            comments: CommentsClient {
                transport: transport.clone(),
            },
            tags: TagsClient {
                transport: transport.clone(),
            },
            transport,
        }
    }

    /// Gets a ticket by ID.
    pub async fn get(&self, ticket_id: u64) -> Result<Ticket, ZendeskError> {
        let path = format!("tickets/{}.json", ticket_id);
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "ticket")
    }

    /// Paginates over every ticket.
    pub fn list(&self, per_page: u32) -> OffsetPaginator<Ticket> {
        OffsetPaginator::offset(self.transport.clone(), "tickets.json", "tickets", per_page)
    }

    /// Paginates over tickets requested by a user.
    pub fn for_user(&self, user_id: u64, per_page: u32) -> OffsetPaginator<Ticket> {
        OffsetPaginator::offset(
            self.transport.clone(),
            format!("users/{}/tickets/requested.json", user_id),
            "tickets",
            per_page,
        )
    }

    /// Paginates over an organization's tickets.
    pub fn for_organization(&self, org_id: u64, per_page: u32) -> OffsetPaginator<Ticket> {
        OffsetPaginator::offset(
            self.transport.clone(),
            format!("organizations/{}/tickets.json", org_id),
            "tickets",
            per_page,
        )
    }

    /// Gets a ticket with its comments and every user they reference.
    pub async fn get_enriched(&self, ticket_id: u64) -> Result<EnrichedTicket, ZendeskError> {
        self.enricher.enrich_one(ticket_id).await
    }

    /// Enriches tickets already in hand; see [`Enricher::enrich_many`].
    pub async fn enrich(&self, tickets: Vec<Ticket>) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        self.enricher.enrich_many(tickets).await
    }

    /// Streams enriched tickets matching a search, one page at a time.
    pub fn search_enriched(
        &self,
        search: impl Into<SearchInput>,
        per_page: u32,
        limit: Option<usize>,
    ) -> BoxStream<'static, Result<EnrichedTicket, ZendeskError>> {
        self.enricher.enrich_search(search, per_page, limit)
    }

    /// First page of a user's requested tickets, enriched.
    ///
    /// Users come from the list call's own sideload; only comments are
    /// fetched on top.
    pub async fn for_user_enriched(
        &self,
        user_id: u64,
        per_page: u32,
    ) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        let path = format!("users/{}/tickets/requested.json", user_id);
        self.list_enriched(&path, per_page).await
    }

    /// First page of an organization's tickets, enriched.
    pub async fn for_organization_enriched(
        &self,
        org_id: u64,
        per_page: u32,
    ) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        let path = format!("organizations/{}/tickets.json", org_id);
        self.list_enriched(&path, per_page).await
    }

    async fn list_enriched(
        &self,
        path: &str,
        per_page: u32,
    ) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        let params = query([
            ("per_page", per_page.to_string()),
            ("include", "users".to_string()),
        ]);
        let response = self.transport.get(path, &params, None).await?;

        let tickets: Vec<Ticket> = list_from_envelope(&response, "tickets")?;
        let users = users_by_id(&response)?;
        self.enricher.enrich_with_users(tickets, &users).await
    }
}

/// Client for ticket comments.
#[derive(Clone)]
pub struct CommentsClient {
    transport: Arc<dyn Transport>,
}

impl CommentsClient {
    /// Paginates over a ticket's comments, oldest first.
    pub fn list(&self, ticket_id: u64, per_page: u32) -> OffsetPaginator<Comment> {
        OffsetPaginator::offset(
            self.transport.clone(),
            format!("tickets/{}/comments.json", ticket_id),
            "comments",
            per_page,
        )
    }

    /// Adds a comment, returning the updated ticket.
    pub async fn add(
        &self,
        ticket_id: u64,
        comment: &CommentPayload,
    ) -> Result<Ticket, ZendeskError> {
        if comment.body.trim().is_empty() {
            return Err(ZendeskError::validation("comment body cannot be empty"));
        }
        tracing::debug!(ticket_id, public = comment.public, "Adding comment");

        let path = format!("tickets/{}.json", ticket_id);
        let comment = envelope("comment", comment)?;
        let body = json!({ "ticket": comment });
        let response = self.transport.put(&path, Some(&body), None).await?;
        from_envelope(&response, "ticket")
    }

    /// Turns a public comment into an internal note. Irreversible.
    pub async fn make_private(&self, ticket_id: u64, comment_id: u64) -> Result<(), ZendeskError> {
        let path = format!(
            "tickets/{}/comments/{}/make_private.json",
            ticket_id, comment_id
        );
        self.transport.put(&path, None, None).await?;
        Ok(())
    }

    /// Permanently removes `text` from a comment.
    pub async fn redact(
        &self,
        ticket_id: u64,
        comment_id: u64,
        text: &str,
    ) -> Result<Comment, ZendeskError> {
        let path = format!("tickets/{}/comments/{}/redact.json", ticket_id, comment_id);
        let body = json!({ "text": text });
        let response = self.transport.put(&path, Some(&body), None).await?;
        from_envelope(&response, "comment")
    }
}

/// Client for ticket tags. Every call returns the ticket's resulting tags.
#[derive(Clone)]
pub struct TagsClient {
    transport: Arc<dyn Transport>,
}

impl TagsClient {
    pub async fn get(&self, ticket_id: u64) -> Result<Vec<String>, ZendeskError> {
        let response = self
            .transport
            .get(&Self::path(ticket_id), &QueryParams::new(), None)
            .await?;
        list_from_envelope(&response, "tags")
    }

    /// Adds tags, keeping existing ones.
    pub async fn add(&self, ticket_id: u64, tags: &[String]) -> Result<Vec<String>, ZendeskError> {
        let body = json!({ "tags": tags });
        let response = self
            .transport
            .put(&Self::path(ticket_id), Some(&body), None)
            .await?;
        list_from_envelope(&response, "tags")
    }

    /// Replaces all tags.
    pub async fn set(&self, ticket_id: u64, tags: &[String]) -> Result<Vec<String>, ZendeskError> {
        let body = json!({ "tags": tags });
        let response = self
            .transport
            .post(&Self::path(ticket_id), Some(&body), None)
            .await?;
        list_from_envelope(&response, "tags")
    }

    /// Removes tags.
    pub async fn remove(
        &self,
        ticket_id: u64,
        tags: &[String],
    ) -> Result<Vec<String>, ZendeskError> {
        let body = json!({ "tags": tags });
        let response = self
            .transport
            .delete(&Self::path(ticket_id), Some(&body), None)
            .await?;
        match response {
            Some(response) => list_from_envelope(&response, "tags"),
            None => Ok(Vec::new()),
        }
    }

    fn path(ticket_id: u64) -> String {
        format!("tickets/{}/tags.json", ticket_id)
    }
}
