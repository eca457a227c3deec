//! Pagination over the three Zendesk list protocols.
//!
//! Supports: offset (`page`/`per_page`), cursor (`cursor`/`next_cursor`) and
//! the search-export cursor envelope (`page[after]`/`meta.after_cursor`).
//!
//! # Overview
//!
//! Each protocol is a [`PaginationStrategy`]: a synchronous state machine that
//! knows which query parameters to send, how to read its position out of a
//! response and when the data ends. [`Paginator`] drives any strategy against
//! a [`Transport`], decodes the items of each page and exposes them as a lazy
//! stream. A page is only requested when the consumer polls past the items
//! already fetched.
//!
//! ```ignore
//! use futures::TryStreamExt;
//!
//! let mut users = client.users.list(100).with_limit(250).iterate();
//! while let Some(user) = users.try_next().await? {
//!     println!("{:?}", user.name);
//! }
//! ```

mod cursor;
mod export;
mod incremental;
mod offset;

use std::marker::PhantomData;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{PageContext, ZendeskError};
use crate::transport::{QueryParams, Transport};

pub use cursor::CursorStrategy;
pub use export::{ExportCursorStrategy, EXPORT_PATH};
pub use incremental::{TimeBasedStrategy, TIME_BASED_PAGE_SIZE};
pub use offset::OffsetStrategy;

/// Default page size for every protocol.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Snapshot of what the last response said about pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Page number the response belongs to (offset pagination only).
    pub page: Option<u32>,
    /// Requested page size.
    pub per_page: u32,
    /// Total item count, when the server reported one.
    pub count: Option<u64>,
    /// Explicit has-more flag, when the server reported one.
    pub has_more: Option<bool>,
    /// Next-page token or link, when the server reported one.
    pub next: Option<String>,
}

/// One pagination wire protocol.
///
/// Implementations hold all protocol state. `update_state` only records what
/// a response reported; moving to the next position happens in `advance`.
/// Once `has_more` has returned false after a response, it stays false until
/// `reset` (or a successful `jump_to`) starts a new traversal.
pub trait PaginationStrategy: Send + 'static {
    /// Protocol-specific query parameters for the current position.
    fn page_params(&self) -> QueryParams;

    /// Records the pagination fields of `response`, which carried `item_count` items.
    fn update_state(&mut self, response: &Value, item_count: usize);

    /// Whether another page should be requested after the last one.
    fn has_more(&self) -> bool;

    /// Moves to the next position.
    fn advance(&mut self);

    /// Retargets the next request at a specific 1-based page.
    ///
    /// # Errors
    ///
    /// Cursor protocols are not addressable by page number and return
    /// `ZendeskError::Validation`.
    fn jump_to(&mut self, page: u32) -> Result<(), ZendeskError>;

    /// Returns to the first page with no recorded state.
    fn reset(&mut self);

    /// What the last response reported; `None` before the first fetch.
    fn info(&self) -> Option<PaginationInfo>;

    /// Requested page size.
    fn page_size(&self) -> u32;

    /// Current 1-based page, for protocols that have one.
    fn page_number(&self) -> Option<u32> {
        None
    }

    /// Cursor the next request will send, if any.
    fn cursor(&self) -> Option<&str> {
        None
    }
}

/// Lazily fetches pages of `T` from one resource path using strategy `S`.
pub struct Paginator<S, T> {
    transport: Arc<dyn Transport>,
    path: String,
    params: QueryParams,
    items_key: String,
    result_type: Option<String>,
    strategy: S,
    limit: Option<usize>,
    ends_on_result_window: bool,
    _item: PhantomData<fn() -> T>,
}

/// Paginator over `page`/`per_page` endpoints.
pub type OffsetPaginator<T> = Paginator<OffsetStrategy, T>;

/// Paginator over `cursor`/`next_cursor` endpoints.
pub type CursorPaginator<T> = Paginator<CursorStrategy, T>;

/// Paginator over the search export endpoint.
pub type ExportCursorPaginator<T> = Paginator<ExportCursorStrategy, T>;

/// Paginator over time-based incremental export endpoints.
pub type TimeBasedPaginator<T> = Paginator<TimeBasedStrategy, T>;

impl<T> Paginator<OffsetStrategy, T> {
    /// Creates an offset paginator reading items from `items_key`.
    pub fn offset(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        items_key: impl Into<String>,
        per_page: u32,
    ) -> Self {
        Self::with_strategy(transport, path, items_key, OffsetStrategy::new(per_page))
    }
}

impl<T> Paginator<CursorStrategy, T> {
    /// Creates a cursor paginator reading items from `items_key`.
    pub fn cursor(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        items_key: impl Into<String>,
        per_page: u32,
    ) -> Self {
        Self::with_strategy(transport, path, items_key, CursorStrategy::new(per_page))
    }
}

impl<T> Paginator<ExportCursorStrategy, T> {
    /// Creates a paginator over `search/export.json` for one object type.
    pub fn export(
        transport: Arc<dyn Transport>,
        query: impl Into<String>,
        filter_type: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self::with_strategy(
            transport,
            EXPORT_PATH,
            "results",
            ExportCursorStrategy::new(query, filter_type, page_size),
        )
    }
}

impl<T> Paginator<TimeBasedStrategy, T> {
    /// Creates a time-based incremental paginator reading items from `items_key`.
    pub fn time_based(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        items_key: impl Into<String>,
        start_time: i64,
    ) -> Self {
        Self::with_strategy(transport, path, items_key, TimeBasedStrategy::new(start_time))
    }
}

impl<S, T> Paginator<S, T> {
    /// Creates a paginator from an already configured strategy.
    pub fn with_strategy(
        transport: Arc<dyn Transport>,
        path: impl Into<String>,
        items_key: impl Into<String>,
        strategy: S,
    ) -> Self {
        Self {
            transport,
            path: path.into(),
            params: QueryParams::new(),
            items_key: items_key.into(),
            result_type: None,
            strategy,
            limit: None,
            ends_on_result_window: false,
            _item: PhantomData,
        }
    }

    /// Adds base query parameters sent with every page.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params.extend(params);
        self
    }

    /// Caps the number of items `iterate()` yields across all pages.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keeps only items whose `result_type` equals `result_type`.
    #[must_use]
    pub fn with_result_type(mut self, result_type: impl Into<String>) -> Self {
        self.result_type = Some(result_type.into());
        self
    }

    /// Treats HTTP 422 as the end of the data.
    ///
    /// The search API refuses to page past its result window (about 1000
    /// results) with a 422.
    #[must_use]
    pub fn ending_on_result_window(mut self) -> Self {
        self.ends_on_result_window = true;
        self
    }

    /// Resource path being paginated.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Item cap set with [`with_limit`](Self::with_limit).
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// The protocol state machine.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<S, T> Paginator<S, T>
where
    S: PaginationStrategy,
    T: DeserializeOwned + Send + 'static,
{
    /// What the last response reported about pagination.
    pub fn pagination_info(&self) -> Option<PaginationInfo> {
        self.strategy.info()
    }

    /// Whether another page should be requested after the last one.
    pub fn has_more(&self) -> bool {
        self.strategy.has_more()
    }

    /// Starts a fresh traversal from the first page.
    pub fn reset(&mut self) {
        self.strategy.reset();
    }

    /// Moves to the next page without fetching it.
    pub fn advance(&mut self) {
        self.strategy.advance();
    }

    /// Fetches one page.
    ///
    /// With `Some(page)` the paginator first jumps to that page; only offset
    /// pagination supports this. The paginator records what the response
    /// reported but does not move past this page.
    ///
    /// # Errors
    ///
    /// Returns `ZendeskError::Pagination` wrapping the transport error, or a
    /// validation error if a cursor paginator is asked to jump.
    pub async fn get_page(&mut self, page: Option<u32>) -> Result<Vec<T>, ZendeskError> {
        if let Some(page) = page {
            self.strategy.jump_to(page)?;
        }
        self.fetch_page().await
    }

    fn context(&self) -> PageContext {
        PageContext {
            path: self.path.clone(),
            page: self.strategy.page_number(),
            cursor: self.strategy.cursor().map(str::to_string),
            page_size: self.strategy.page_size(),
        }
    }

    async fn fetch_page(&mut self) -> Result<Vec<T>, ZendeskError> {
        let mut params = self.params.clone();
        params.extend(self.strategy.page_params());

        tracing::debug!(
            path = %self.path,
            page = ?self.strategy.page_number(),
            cursor = ?self.strategy.cursor(),
            "Fetching page"
        );

        let response = self
            .transport
            .get(&self.path, &params, None)
            .await
            .map_err(|e| ZendeskError::pagination(self.context(), e))?;

        let raw = match response.get(&self.items_key) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) => Vec::new(),
            other => {
                tracing::debug!(
                    path = %self.path,
                    items_key = %self.items_key,
                    present = other.is_some(),
                    "Response has no item array under the expected key, reading an empty page"
                );
                Vec::new()
            }
        };
        self.strategy.update_state(&response, raw.len());

        raw.into_iter()
            .filter(|item| match &self.result_type {
                Some(kind) => item.get("result_type").and_then(Value::as_str) == Some(kind),
                None => true,
            })
            .map(|item| serde_json::from_value(item).map_err(ZendeskError::Serialization))
            .collect()
    }

    /// Lazily yields whole pages, starting from the first one.
    ///
    /// Stops when the strategy reports no more data, on the first error, or
    /// (for search paginators) on the result-window 422.
    pub fn pages(mut self) -> BoxStream<'static, Result<Vec<T>, ZendeskError>> {
        self.strategy.reset();

        stream::unfold(Some((self, false)), |state| async move {
            let (mut paginator, started) = state?;

            if started {
                if !paginator.strategy.has_more() {
                    return None;
                }
                paginator.strategy.advance();
            }

            match paginator.fetch_page().await {
                Ok(items) => Some((Ok(items), Some((paginator, true)))),
                Err(e) if paginator.ends_on_result_window && e.is_result_window_limit() => {
                    tracing::info!(
                        path = %paginator.path,
                        page = ?paginator.strategy.page_number(),
                        "Search result window reached, ending iteration"
                    );
                    None
                }
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed()
    }

    /// Lazily yields every item across all pages.
    ///
    /// Honors [`with_limit`](Self::with_limit): once the cap is reached no
    /// further page is requested.
    pub fn iterate(self) -> BoxStream<'static, Result<T, ZendeskError>> {
        let limit = self.limit;
        let items = self.pages().flat_map(|page| {
            let items: Vec<Result<T, ZendeskError>> = match page {
                Ok(items) => items.into_iter().map(Ok).collect(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        });

        match limit {
            Some(limit) => items.take(limit).boxed(),
            None => items.boxed(),
        }
    }

    /// Drains [`iterate`](Self::iterate) into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error the traversal hit.
    pub async fn collect(self) -> Result<Vec<T>, ZendeskError> {
        self.iterate().try_collect().await
    }
}

/// Shared end-of-data rule for the two cursor protocols.
///
/// An explicit `has_more=false` ends the data; otherwise a next cursor is
/// required, because without one the next request would repeat the first page.
fn cursor_has_more(started: bool, has_more: Option<bool>, next: Option<&str>) -> bool {
    if !started {
        return true;
    }
    has_more != Some(false) && next.is_some()
}

/// Reads a non-empty string field.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests;
