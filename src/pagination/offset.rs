//! Offset pagination: `page` (1-based) and `per_page`.

use serde_json::Value;

use super::{string_field, PaginationInfo, PaginationStrategy};
use crate::error::ZendeskError;
use crate::transport::{query, QueryParams};

/// State machine for `page`/`per_page` endpoints.
///
/// End of data is decided, in order, by the response's `has_more` flag, by
/// comparing the page against `ceil(count / per_page)`, by a non-null
/// `next_page`, and finally by whether the last page had any items at all.
/// The last rule can cost one extra empty request at the very end, which is
/// preferred over stopping early when the server omits its totals.
#[derive(Debug, Clone)]
pub struct OffsetStrategy {
    per_page: u32,
    page: u32,
    count: Option<u64>,
    has_more: Option<bool>,
    next_page: Option<String>,
    last_item_count: Option<usize>,
    exhausted: bool,
}

impl OffsetStrategy {
    /// Creates a strategy starting at page 1. A zero page size is treated as 1.
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            page: 1,
            count: None,
            has_more: None,
            next_page: None,
            last_item_count: None,
            exhausted: false,
        }
    }

    /// Current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    fn more_reported(&self) -> bool {
        let Some(item_count) = self.last_item_count else {
            return true;
        };

        if let Some(has_more) = self.has_more {
            return has_more;
        }

        if let Some(count) = self.count {
            let total_pages = count.div_ceil(u64::from(self.per_page));
            return u64::from(self.page) < total_pages;
        }

        if self.next_page.is_some() {
            return true;
        }

        item_count > 0
    }
}

impl PaginationStrategy for OffsetStrategy {
    fn page_params(&self) -> QueryParams {
        query([("page", self.page), ("per_page", self.per_page)])
    }

    fn update_state(&mut self, response: &Value, item_count: usize) {
        self.count = response.get("count").and_then(Value::as_u64);
        self.has_more = response.get("has_more").and_then(Value::as_bool);
        self.next_page = string_field(response, "next_page");
        self.last_item_count = Some(item_count);

        if !self.more_reported() {
            self.exhausted = true;
        }
    }

    fn has_more(&self) -> bool {
        !self.exhausted && self.more_reported()
    }

    fn advance(&mut self) {
        self.page += 1;
    }

    fn jump_to(&mut self, page: u32) -> Result<(), ZendeskError> {
        if page == 0 {
            return Err(ZendeskError::validation("page numbers start at 1"));
        }
        self.reset();
        self.page = page;
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::new(self.per_page);
    }

    fn info(&self) -> Option<PaginationInfo> {
        self.last_item_count?;
        Some(PaginationInfo {
            page: Some(self.page),
            per_page: self.per_page,
            count: self.count,
            has_more: self.has_more,
            next: self.next_page.clone(),
        })
    }

    fn page_size(&self) -> u32 {
        self.per_page
    }

    fn page_number(&self) -> Option<u32> {
        Some(self.page)
    }
}
