//! Builds [`EnrichedTicket`]s: tickets bundled with their comments and users.
//!
//! A single ticket costs two calls: the ticket with its users sideloaded, and
//! its comments with their authors sideloaded.
//!
//! A batch of N tickets costs one `users/show_many.json` call for the
//! distinct users all tickets reference, plus N comment fetches issued
//! concurrently. Each result only carries the users its own ticket
//! references, plus its comment authors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;

use crate::error::ZendeskError;
use crate::models::{
    from_envelope, list_from_envelope, Comment, EnrichedTicket, SearchInput, SearchType, Ticket,
    User,
};
use crate::pagination::OffsetPaginator;
use crate::transport::{query, Transport};

/// Most IDs `users/show_many.json` accepts in one call.
pub const MAX_SHOW_MANY_IDS: usize = 100;

/// Resolves tickets into [`EnrichedTicket`]s with as few calls as possible.
#[derive(Clone)]
pub struct Enricher {
    transport: Arc<dyn Transport>,
}

impl Enricher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches one ticket with its comments and every user they reference.
    ///
    /// Comment authors win over ticket users on ID collision.
    pub async fn enrich_one(&self, ticket_id: u64) -> Result<EnrichedTicket, ZendeskError> {
        tracing::debug!(ticket_id, "Enriching ticket");

        let params = query([("include", "users")]);
        let path = format!("tickets/{}.json", ticket_id);
        let (response, (comments, comment_users)) = futures::try_join!(
            self.transport.get(&path, &params, None),
            self.fetch_comments(ticket_id),
        )?;

        let ticket: Ticket = from_envelope(&response, "ticket")?;
        let mut users = users_by_id(&response)?;
        users.extend(comment_users);

        Ok(EnrichedTicket::new(ticket, comments, users))
    }

    /// Enriches an already fetched ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::MissingId`] without calling the API if the
    /// ticket has no ID.
    pub async fn enrich_ticket(&self, ticket: &Ticket) -> Result<EnrichedTicket, ZendeskError> {
        let id = ticket.id.ok_or(ZendeskError::MissingId { entity: "ticket" })?;
        self.enrich_one(id).await
    }

    /// Enriches a batch of tickets, preserving input order.
    ///
    /// Tickets without an ID are skipped. Any failed call fails the whole
    /// batch.
    pub async fn enrich_many(&self, tickets: Vec<Ticket>) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        let tickets = identified(tickets);
        if tickets.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<u64> = tickets
            .iter()
            .flat_map(|(_, ticket)| ticket.referenced_user_ids())
            .collect();
        let users = self.fetch_users(&user_ids).await?;

        self.assemble(tickets, &users).await
    }

    /// Enriches tickets whose users were already sideloaded by the list call.
    ///
    /// Only the comment fetches are issued.
    pub async fn enrich_with_users(
        &self,
        tickets: Vec<Ticket>,
        users: &HashMap<u64, User>,
    ) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        self.assemble(identified(tickets), users).await
    }

    /// Streams enriched tickets matching `query`, one search page at a time.
    ///
    /// Each page is enriched as a batch before the next one is requested.
    /// `limit` caps the number of tickets yielded; no page beyond the cap is
    /// fetched.
    pub fn enrich_search(
        &self,
        query_input: impl Into<SearchInput>,
        page_size: u32,
        limit: Option<usize>,
    ) -> BoxStream<'static, Result<EnrichedTicket, ZendeskError>> {
        let search_query = query_input.into().resolve(Some(SearchType::Ticket));
        let pages = OffsetPaginator::<Ticket>::offset(
            self.transport.clone(),
            "search.json",
            "results",
            page_size,
        )
        .with_params(query([("query", search_query)]))
        .with_result_type(SearchType::Ticket.as_str())
        .ending_on_result_window()
        .pages();

        let state = Some((pages, limit, self.clone()));
        stream::unfold(state, |state| async move {
            let (mut pages, remaining, enricher) = state?;
            if remaining == Some(0) {
                return None;
            }

            let mut page = match pages.next().await? {
                Ok(page) => page,
                Err(e) => return Some((Err(e), None)),
            };
            if let Some(remaining) = remaining {
                page.truncate(remaining);
            }

            match enricher.enrich_many(page).await {
                Ok(batch) => {
                    let remaining = remaining.map(|r| r.saturating_sub(batch.len()));
                    Some((Ok(batch), Some((pages, remaining, enricher))))
                }
                Err(e) => Some((Err(e), None)),
            }
        })
        .flat_map(|batch| {
            let items: Vec<Result<EnrichedTicket, ZendeskError>> = match batch {
                Ok(batch) => batch.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        })
        .boxed()
    }

    /// Resolves user IDs in one `show_many` call.
    ///
    /// IDs are deduplicated in first-seen order before the cap of
    /// [`MAX_SHOW_MANY_IDS`] is applied; IDs past the cap are not resolved.
    /// No call is made for an empty list.
    pub async fn fetch_users(&self, user_ids: &[u64]) -> Result<HashMap<u64, User>, ZendeskError> {
        let mut seen = HashSet::new();
        let mut unique: Vec<u64> = user_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }
        if unique.len() > MAX_SHOW_MANY_IDS {
            tracing::warn!(
                requested = unique.len(),
                resolved = MAX_SHOW_MANY_IDS,
                "Too many user IDs for one lookup, resolving the first ones only"
            );
            unique.truncate(MAX_SHOW_MANY_IDS);
        }

        let ids = unique
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        tracing::debug!(user_ids = %ids, "Resolving users");

        let response = self
            .transport
            .get("users/show_many.json", &query([("ids", ids)]), None)
            .await?;
        users_by_id(&response)
    }

    /// Fetches a ticket's comments with their authors sideloaded.
    pub async fn fetch_comments(
        &self,
        ticket_id: u64,
    ) -> Result<(Vec<Comment>, HashMap<u64, User>), ZendeskError> {
        let path = format!("tickets/{}/comments.json", ticket_id);
        let response = self
            .transport
            .get(&path, &query([("include", "users")]), None)
            .await?;

        let comments = list_from_envelope(&response, "comments")?;
        let users = users_by_id(&response)?;
        Ok((comments, users))
    }

    async fn assemble(
        &self,
        tickets: Vec<(u64, Ticket)>,
        users: &HashMap<u64, User>,
    ) -> Result<Vec<EnrichedTicket>, ZendeskError> {
        tracing::debug!(ticket_count = tickets.len(), "Fetching comments");

        let fetches = tickets.iter().map(|(id, _)| self.fetch_comments(*id));
        let comments = try_join_all(fetches).await?;

        Ok(tickets
            .into_iter()
            .zip(comments)
            .map(|((_, ticket), (comments, authors))| {
                let mut scoped: HashMap<u64, User> = ticket
                    .referenced_user_ids()
                    .into_iter()
                    .filter_map(|id| users.get(&id).map(|user| (id, user.clone())))
                    .collect();
                scoped.extend(authors);
                EnrichedTicket::new(ticket, comments, scoped)
            })
            .collect())
    }
}

/// Keeps tickets that carry an ID, paired with it.
fn identified(tickets: Vec<Ticket>) -> Vec<(u64, Ticket)> {
    tickets
        .into_iter()
        .filter_map(|ticket| match ticket.id {
            Some(id) => Some((id, ticket)),
            None => {
                tracing::warn!(subject = ?ticket.subject, "Skipping ticket without an id");
                None
            }
        })
        .collect()
}

/// Indexes the sideloaded `users` array of a response by ID.
pub(crate) fn users_by_id(response: &Value) -> Result<HashMap<u64, User>, ZendeskError> {
    let users: Vec<User> = list_from_envelope(response, "users")?;
    Ok(users
        .into_iter()
        .filter_map(|user| user.id.map(|id| (id, user)))
        .collect())
}
