//! Search export pagination: `page[size]`, `page[after]` and the `meta`/`links` envelope.

use serde_json::Value;

use super::{cursor_has_more, string_field, PaginationInfo, PaginationStrategy};
use crate::error::ZendeskError;
use crate::transport::{query, QueryParams};

/// Path of the search export endpoint.
pub const EXPORT_PATH: &str = "search/export.json";

/// State machine for `search/export.json`.
///
/// Every request carries `query` and `filter[type]`. Position comes from
/// `meta.after_cursor` and end of data from `meta.has_more`; `links.next` is
/// kept for introspection only. Export cursors expire after an hour on the
/// server side.
#[derive(Debug, Clone)]
pub struct ExportCursorStrategy {
    query: String,
    filter_type: String,
    page_size: u32,
    after_cursor: Option<String>,
    next_after_cursor: Option<String>,
    next_link: Option<String>,
    has_more: Option<bool>,
    started: bool,
    exhausted: bool,
}

impl ExportCursorStrategy {
    /// Creates a strategy for `filter_type` results (`ticket`, `user`, `organization`, `group`).
    pub fn new(query: impl Into<String>, filter_type: impl Into<String>, page_size: u32) -> Self {
        Self {
            query: query.into(),
            filter_type: filter_type.into(),
            page_size: page_size.max(1),
            after_cursor: None,
            next_after_cursor: None,
            next_link: None,
            has_more: None,
            started: false,
            exhausted: false,
        }
    }

    /// The `links.next` URL of the last response.
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// The `meta.after_cursor` of the last response.
    pub fn next_after_cursor(&self) -> Option<&str> {
        self.next_after_cursor.as_deref()
    }
}

impl PaginationStrategy for ExportCursorStrategy {
    fn page_params(&self) -> QueryParams {
        let mut params = query([
            ("query", self.query.clone()),
            ("filter[type]", self.filter_type.clone()),
            ("page[size]", self.page_size.to_string()),
        ]);
        if let Some(cursor) = &self.after_cursor {
            params.insert("page[after]".to_string(), cursor.clone());
        }
        params
    }

    fn update_state(&mut self, response: &Value, _item_count: usize) {
        let meta = response.get("meta");
        self.next_link = response
            .get("links")
            .and_then(|links| string_field(links, "next"));
        self.next_after_cursor = meta.and_then(|meta| string_field(meta, "after_cursor"));
        self.has_more = meta
            .and_then(|meta| meta.get("has_more"))
            .and_then(Value::as_bool);
        self.started = true;

        if !cursor_has_more(self.started, self.has_more, self.next_after_cursor.as_deref()) {
            self.exhausted = true;
        }
    }

    fn has_more(&self) -> bool {
        !self.exhausted
            && cursor_has_more(self.started, self.has_more, self.next_after_cursor.as_deref())
    }

    fn advance(&mut self) {
        if let Some(next) = self.next_after_cursor.take() {
            self.after_cursor = Some(next);
        }
    }

    fn jump_to(&mut self, page: u32) -> Result<(), ZendeskError> {
        Err(ZendeskError::validation(format!(
            "export pagination cannot jump to page {}; start a new paginator instead",
            page
        )))
    }

    fn reset(&mut self) {
        *self = Self::new(
            std::mem::take(&mut self.query),
            std::mem::take(&mut self.filter_type),
            self.page_size,
        );
    }

    fn info(&self) -> Option<PaginationInfo> {
        if !self.started {
            return None;
        }
        Some(PaginationInfo {
            page: None,
            per_page: self.page_size,
            count: None,
            has_more: self.has_more,
            next: self.next_link.clone(),
        })
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }

    fn cursor(&self) -> Option<&str> {
        self.after_cursor.as_deref()
    }
}
