//! Cursor pagination: `per_page` and an opaque `cursor` token.

use serde_json::Value;
use url::Url;

use super::{cursor_has_more, string_field, PaginationInfo, PaginationStrategy};
use crate::error::ZendeskError;
use crate::transport::{query, QueryParams};

/// Query keys a `links.next` URL may carry its cursor in.
const LINK_CURSOR_KEYS: [&str; 2] = ["cursor", "page[after]"];

/// State machine for `cursor`/`next_cursor` endpoints.
///
/// The first request carries no cursor. Each response's `next_cursor`,
/// `after_cursor` or `links.next` becomes the cursor of the following
/// request once the paginator advances.
#[derive(Debug, Clone)]
pub struct CursorStrategy {
    per_page: u32,
    current: Option<String>,
    next: Option<String>,
    has_more: Option<bool>,
    started: bool,
    exhausted: bool,
}

impl CursorStrategy {
    /// Creates a strategy positioned before the first page.
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            current: None,
            next: None,
            has_more: None,
            started: false,
            exhausted: false,
        }
    }

    /// Cursor reported by the last response.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

/// Derives a cursor from a `links.next` URL.
///
/// Falls back to the whole link when it carries no recognizable cursor key.
pub(crate) fn cursor_from_link(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| LINK_CURSOR_KEYS.contains(&key.as_ref()))
                .map(|(_, value)| value.into_owned())
        })
        .filter(|cursor| !cursor.is_empty())
        .unwrap_or_else(|| link.to_string())
}

impl PaginationStrategy for CursorStrategy {
    fn page_params(&self) -> QueryParams {
        let mut params = query([("per_page", self.per_page)]);
        if let Some(cursor) = &self.current {
            params.insert("cursor".to_string(), cursor.clone());
        }
        params
    }

    fn update_state(&mut self, response: &Value, _item_count: usize) {
        self.next = string_field(response, "next_cursor")
            .or_else(|| string_field(response, "after_cursor"))
            .or_else(|| {
                response
                    .get("links")
                    .and_then(|links| string_field(links, "next"))
                    .map(|link| cursor_from_link(&link))
            });
        // incremental exports report `end_of_stream` instead of `has_more`
        self.has_more = response
            .get("has_more")
            .and_then(Value::as_bool)
            .or_else(|| {
                response
                    .get("end_of_stream")
                    .and_then(Value::as_bool)
                    .map(|end| !end)
            });
        self.started = true;

        if !cursor_has_more(self.started, self.has_more, self.next.as_deref()) {
            self.exhausted = true;
        }
    }

    fn has_more(&self) -> bool {
        !self.exhausted && cursor_has_more(self.started, self.has_more, self.next.as_deref())
    }

    fn advance(&mut self) {
        if let Some(next) = self.next.take() {
            self.current = Some(next);
        }
    }

    fn jump_to(&mut self, page: u32) -> Result<(), ZendeskError> {
        Err(ZendeskError::validation(format!(
            "cursor pagination cannot jump to page {}; start a new paginator instead",
            page
        )))
    }

    fn reset(&mut self) {
        *self = Self::new(self.per_page);
    }

    fn info(&self) -> Option<PaginationInfo> {
        if !self.started {
            return None;
        }
        Some(PaginationInfo {
            page: None,
            per_page: self.per_page,
            count: None,
            has_more: self.has_more,
            next: self.next.clone(),
        })
    }

    fn page_size(&self) -> u32 {
        self.per_page
    }

    fn cursor(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_request_has_no_cursor() {
        let strategy = CursorStrategy::new(100);
        let params = strategy.page_params();
        assert!(!params.contains_key("cursor"));
        assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
        assert!(strategy.has_more());
    }

    #[test]
    fn test_next_cursor_adopted_on_advance() {
        let mut strategy = CursorStrategy::new(100);
        strategy.update_state(&json!({"next_cursor": "abc"}), 100);
        assert!(strategy.has_more());
        assert!(!strategy.page_params().contains_key("cursor"));

        strategy.advance();
        assert_eq!(
            strategy.page_params().get("cursor").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn test_end_of_stream_stops_despite_cursor() {
        let mut strategy = CursorStrategy::new(1000);
        strategy.update_state(&json!({"after_cursor": "c1", "end_of_stream": false}), 1000);
        assert!(strategy.has_more());

        strategy.advance();
        strategy.update_state(&json!({"after_cursor": "c2", "end_of_stream": true}), 3);
        assert!(!strategy.has_more());
    }

    #[test]
    fn test_after_cursor_fallback() {
        let mut strategy = CursorStrategy::new(100);
        strategy.update_state(&json!({"after_cursor": "xyz"}), 10);
        assert_eq!(strategy.next_cursor(), Some("xyz"));
    }

    #[test]
    fn test_cursor_from_links_next() {
        let mut strategy = CursorStrategy::new(100);
        strategy.update_state(
            &json!({"links": {"next": "https://acme.zendesk.com/api/v2/incremental/tickets.json?cursor=MTU3&per_page=100"}}),
            10,
        );
        assert_eq!(strategy.next_cursor(), Some("MTU3"));
    }

    #[test]
    fn test_cursor_from_link_without_key_keeps_link() {
        assert_eq!(cursor_from_link("opaque-token"), "opaque-token");
        assert_eq!(
            cursor_from_link("https://example.com/items?page%5Bafter%5D=q1"),
            "q1"
        );
    }

    #[test]
    fn test_no_cursor_ends() {
        let mut strategy = CursorStrategy::new(100);
        strategy.update_state(&json!({"next_cursor": null}), 10);
        assert!(!strategy.has_more());
    }

    #[test]
    fn test_explicit_has_more_false_ends_even_with_cursor() {
        let mut strategy = CursorStrategy::new(100);
        strategy.update_state(&json!({"next_cursor": "abc", "has_more": false}), 10);
        assert!(!strategy.has_more());
    }

    #[test]
    fn test_jump_rejected() {
        let mut strategy = CursorStrategy::new(100);
        assert!(matches!(
            strategy.jump_to(3),
            Err(ZendeskError::Validation(_))
        ));
    }
}
