//! Time-based incremental export: `start_time` in, `end_time` out.

use serde_json::Value;
use url::Url;

use super::{string_field, PaginationInfo, PaginationStrategy};
use crate::error::ZendeskError;
use crate::transport::{query, QueryParams};

/// Fixed page size of the time-based incremental endpoints.
pub const TIME_BASED_PAGE_SIZE: u32 = 1000;

/// State machine for `incremental/{resource}.json` endpoints.
///
/// Each response's `end_time` (or the `start_time` of its `next_page` link)
/// becomes the `start_time` of the following request. The export ends on
/// `end_of_stream: true`, or when the server stops moving the window forward.
#[derive(Debug, Clone)]
pub struct TimeBasedStrategy {
    initial_start: i64,
    start_time: String,
    next_start: Option<String>,
    end_of_stream: Option<bool>,
    count: Option<u64>,
    started: bool,
    exhausted: bool,
}

impl TimeBasedStrategy {
    /// Creates a strategy exporting changes since `start_time` (Unix seconds).
    pub fn new(start_time: i64) -> Self {
        Self {
            initial_start: start_time,
            start_time: start_time.to_string(),
            next_start: None,
            end_of_stream: None,
            count: None,
            started: false,
            exhausted: false,
        }
    }

    /// `start_time` the next request will send.
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    fn more_reported(&self) -> bool {
        if !self.started {
            return true;
        }
        if self.end_of_stream == Some(true) {
            return false;
        }
        match &self.next_start {
            Some(next) => *next != self.start_time,
            None => false,
        }
    }
}

/// Reads `start_time` out of a `next_page` URL.
fn start_time_from_link(link: &str) -> Option<String> {
    Url::parse(link).ok().and_then(|url| {
        url.query_pairs()
            .find(|(key, _)| key == "start_time")
            .map(|(_, value)| value.into_owned())
    })
}

impl PaginationStrategy for TimeBasedStrategy {
    fn page_params(&self) -> QueryParams {
        query([("start_time", self.start_time.clone())])
    }

    fn update_state(&mut self, response: &Value, _item_count: usize) {
        self.next_start = response
            .get("end_time")
            .and_then(Value::as_i64)
            .map(|end| end.to_string())
            .or_else(|| {
                string_field(response, "next_page").and_then(|link| start_time_from_link(&link))
            });
        self.end_of_stream = response.get("end_of_stream").and_then(Value::as_bool);
        self.count = response.get("count").and_then(Value::as_u64);
        self.started = true;

        if !self.more_reported() {
            self.exhausted = true;
        }
    }

    fn has_more(&self) -> bool {
        !self.exhausted && self.more_reported()
    }

    fn advance(&mut self) {
        if let Some(next) = self.next_start.take() {
            self.start_time = next;
        }
    }

    fn jump_to(&mut self, page: u32) -> Result<(), ZendeskError> {
        Err(ZendeskError::validation(format!(
            "incremental export cannot jump to page {}; start from a new start_time instead",
            page
        )))
    }

    fn reset(&mut self) {
        *self = Self::new(self.initial_start);
    }

    fn info(&self) -> Option<PaginationInfo> {
        if !self.started {
            return None;
        }
        Some(PaginationInfo {
            page: None,
            per_page: TIME_BASED_PAGE_SIZE,
            count: self.count,
            has_more: self.end_of_stream.map(|end| !end),
            next: self.next_start.clone(),
        })
    }

    fn page_size(&self) -> u32 {
        TIME_BASED_PAGE_SIZE
    }

    fn cursor(&self) -> Option<&str> {
        Some(&self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_request_sends_start_time() {
        let strategy = TimeBasedStrategy::new(1_700_000_000);
        assert!(strategy.has_more());
        assert_eq!(
            strategy.page_params().get("start_time").map(String::as_str),
            Some("1700000000")
        );
    }

    #[test]
    fn test_end_time_becomes_next_start() {
        let mut strategy = TimeBasedStrategy::new(100);
        strategy.update_state(&json!({"end_time": 200, "end_of_stream": false}), 1000);
        assert!(strategy.has_more());

        strategy.advance();
        assert_eq!(strategy.start_time(), "200");
    }

    #[test]
    fn test_next_page_link_fallback() {
        let mut strategy = TimeBasedStrategy::new(100);
        strategy.update_state(
            &json!({"next_page": "https://acme.zendesk.com/api/v2/incremental/organizations.json?start_time=350"}),
            1000,
        );
        strategy.advance();
        assert_eq!(strategy.start_time(), "350");
    }

    #[test]
    fn test_end_of_stream_ends() {
        let mut strategy = TimeBasedStrategy::new(100);
        strategy.update_state(&json!({"end_time": 200, "end_of_stream": true}), 3);
        assert!(!strategy.has_more());
    }

    #[test]
    fn test_stalled_window_ends() {
        let mut strategy = TimeBasedStrategy::new(100);
        strategy.update_state(&json!({"end_time": 100}), 0);
        assert!(!strategy.has_more());
    }

    #[test]
    fn test_reset_returns_to_initial_start() {
        let mut strategy = TimeBasedStrategy::new(100);
        strategy.update_state(&json!({"end_time": 200, "end_of_stream": false}), 1000);
        strategy.advance();
        strategy.reset();
        assert_eq!(strategy.start_time(), "100");
        assert!(strategy.info().is_none());
    }

    #[test]
    fn test_rejects_page_jump() {
        let mut strategy = TimeBasedStrategy::new(100);
        assert!(strategy.jump_to(2).is_err());
    }
}
