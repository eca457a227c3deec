//! Search API: paged search and the search export endpoint.

use std::sync::Arc;

use serde_json::Value;

use crate::models::{Organization, SearchInput, SearchType, Ticket, User};
use crate::pagination::{ExportCursorPaginator, OffsetPaginator};
use crate::transport::{query, Transport};

/// Client for `search.json` and `search/export.json`.
///
/// Paged search stops at the API's result window (about 1000 results); the
/// export variants have no such ceiling but need a type filter.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
}

impl SearchClient {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Searches every record type; results stay raw JSON with their `result_type`.
    pub fn all(&self, search: impl Into<SearchInput>, per_page: u32) -> OffsetPaginator<Value> {
        self.paged(search.into().resolve(None), per_page)
    }

    /// Searches tickets.
    pub fn tickets(&self, search: impl Into<SearchInput>, per_page: u32) -> OffsetPaginator<Ticket> {
        self.typed(search.into(), SearchType::Ticket, per_page)
    }

    /// Searches users.
    pub fn users(&self, search: impl Into<SearchInput>, per_page: u32) -> OffsetPaginator<User> {
        self.typed(search.into(), SearchType::User, per_page)
    }

    /// Searches organizations.
    pub fn organizations(
        &self,
        search: impl Into<SearchInput>,
        per_page: u32,
    ) -> OffsetPaginator<Organization> {
        self.typed(search.into(), SearchType::Organization, per_page)
    }

    /// Exports every matching ticket. An empty query matches everything.
    pub fn export_tickets(
        &self,
        search: impl Into<SearchInput>,
        page_size: u32,
    ) -> ExportCursorPaginator<Ticket> {
        self.export(search.into(), SearchType::Ticket, page_size)
    }

    /// Exports every matching user.
    pub fn export_users(
        &self,
        search: impl Into<SearchInput>,
        page_size: u32,
    ) -> ExportCursorPaginator<User> {
        self.export(search.into(), SearchType::User, page_size)
    }

    /// Exports every matching organization.
    pub fn export_organizations(
        &self,
        search: impl Into<SearchInput>,
        page_size: u32,
    ) -> ExportCursorPaginator<Organization> {
        self.export(search.into(), SearchType::Organization, page_size)
    }

    fn paged<T>(&self, search_query: String, per_page: u32) -> OffsetPaginator<T> {
        OffsetPaginator::offset(self.transport.clone(), "search.json", "results", per_page)
            .with_params(query([("query", search_query)]))
            .ending_on_result_window()
    }

    fn typed<T>(&self, search: SearchInput, kind: SearchType, per_page: u32) -> OffsetPaginator<T> {
        self.paged(search.resolve(Some(kind)), per_page)
            .with_result_type(kind.as_str())
    }

    fn export<T>(&self, search: SearchInput, kind: SearchType, page_size: u32) -> ExportCursorPaginator<T> {
        // the export endpoint filters by type itself and rejects empty queries
        let mut search_query = search.resolve(None);
        if search_query.trim().is_empty() {
            search_query = "*".to_string();
        }
        ExportCursorPaginator::export(self.transport.clone(), search_query, kind.as_str(), page_size)
    }
}
