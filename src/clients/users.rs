//! Users API.

use std::collections::HashMap;
use std::sync::Arc;

use crate::enrichment::Enricher;
use crate::error::ZendeskError;
use crate::models::{from_envelope, list_from_envelope, SearchInput, SearchType, User};
use crate::pagination::OffsetPaginator;
use crate::transport::{query, QueryParams, Transport};

/// Client for `users` endpoints.
#[derive(Clone)]
pub struct UsersClient {
    transport: Arc<dyn Transport>,
}

impl UsersClient {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Gets a user by ID.
    pub async fn get(&self, user_id: u64) -> Result<User, ZendeskError> {
        let path = format!("users/{}.json", user_id);
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "user")
    }

    /// Paginates over every user.
    pub fn list(&self, per_page: u32) -> OffsetPaginator<User> {
        OffsetPaginator::offset(self.transport.clone(), "users.json", "users", per_page)
    }

    /// Finds a user by exact email address.
    ///
    /// Returns `None` when no user matches.
    pub async fn by_email(&self, email: &str) -> Result<Option<User>, ZendeskError> {
        if !email.contains('@') {
            return Err(ZendeskError::validation(format!(
                "'{}' is not an email address",
                email
            )));
        }

        let response = self
            .transport
            .get("users/search.json", &query([("query", email)]), None)
            .await?;
        let users: Vec<User> = list_from_envelope(&response, "users")?;
        Ok(users.into_iter().next())
    }

    /// Searches users; returns the first page of matches.
    ///
    /// The query is restricted to `type:user`.
    pub async fn search(
        &self,
        search: impl Into<SearchInput>,
        per_page: u32,
    ) -> Result<Vec<User>, ZendeskError> {
        let search_query = search.into().resolve(Some(SearchType::User));
        let mut paginator = OffsetPaginator::<User>::offset(
            self.transport.clone(),
            "search.json",
            "results",
            per_page,
        )
        .with_params(query([("query", search_query)]))
        .with_result_type(SearchType::User.as_str());
        paginator.get_page(None).await
    }

    /// Resolves many users in one call, keyed by ID.
    ///
    /// IDs are deduplicated and at most 100 are resolved; users that no
    /// longer exist are absent from the map.
    pub async fn get_many(&self, user_ids: &[u64]) -> Result<HashMap<u64, User>, ZendeskError> {
        Enricher::new(self.transport.clone())
            .fetch_users(user_ids)
            .await
    }
}
