//! Search query builder.
//!
//! Renders structured filters into Zendesk search syntax, e.g.
//! `type:ticket status:open priority:high tags:vip created>2024-01-01 printer`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of record a search targets. Matches the `result_type` of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    Ticket,
    User,
    Organization,
    Group,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Ticket => "ticket",
            SearchType::User => "user",
            SearchType::Organization => "organization",
            SearchType::Group => "group",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured search query.
///
/// Repeated values for one keyword are OR-ed by Zendesk; different keywords
/// are AND-ed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub search_type: Option<SearchType>,
    pub statuses: Vec<String>,
    pub priorities: Vec<String>,
    pub assignee: Option<String>,
    pub requester: Option<String>,
    pub organization_id: Option<u64>,
    pub tags: Vec<String>,
    pub created_after: Option<String>,
    pub created_before: Option<String>,
    pub text: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// A query restricted to one record type.
    pub fn of_type(search_type: SearchType) -> Self {
        Self {
            search_type: Some(search_type),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, search_type: SearchType) -> Self {
        self.search_type = Some(search_type);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.push(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priorities.push(priority.into());
        self
    }

    /// Assignee by name, email, ID or `none`.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    pub fn with_organization(mut self, organization_id: u64) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Date as `YYYY-MM-DD` or an ISO-8601 timestamp.
    pub fn created_after(mut self, date: impl Into<String>) -> Self {
        self.created_after = Some(date.into());
        self
    }

    pub fn created_before(mut self, date: impl Into<String>) -> Self {
        self.created_before = Some(date.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Renders the query in Zendesk search syntax.
    pub fn to_query(&self) -> String {
        let mut terms = Vec::new();
        if let Some(kind) = self.search_type {
            terms.push(format!("type:{kind}"));
        }
        terms.extend(self.statuses.iter().map(|s| format!("status:{s}")));
        terms.extend(self.priorities.iter().map(|p| format!("priority:{p}")));
        if let Some(assignee) = &self.assignee {
            terms.push(format!("assignee:{}", quote(assignee)));
        }
        if let Some(requester) = &self.requester {
            terms.push(format!("requester:{}", quote(requester)));
        }
        if let Some(org) = self.organization_id {
            terms.push(format!("organization:{org}"));
        }
        terms.extend(self.tags.iter().map(|t| format!("tags:{t}")));
        if let Some(date) = &self.created_after {
            terms.push(format!("created>{date}"));
        }
        if let Some(date) = &self.created_before {
            terms.push(format!("created<{date}"));
        }
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            terms.push(text.to_string());
        }
        terms.join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

fn quote(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Either a raw query string or a [`SearchQuery`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchInput {
    Raw(String),
    Query(SearchQuery),
}

impl SearchInput {
    /// Renders the query, restricting it to `kind` when given.
    ///
    /// A structured query has its type replaced. A raw query is prefixed
    /// with `type:<kind>` unless it already names that type.
    pub fn resolve(self, kind: Option<SearchType>) -> String {
        match (self, kind) {
            (SearchInput::Query(query), Some(kind)) => query.with_type(kind).to_query(),
            (SearchInput::Query(query), None) => query.to_query(),
            (SearchInput::Raw(raw), Some(kind)) => {
                let prefix = format!("type:{kind}");
                if raw.to_lowercase().split_whitespace().any(|term| term == prefix) {
                    raw
                } else if raw.trim().is_empty() {
                    prefix
                } else {
                    format!("{prefix} {raw}")
                }
            }
            (SearchInput::Raw(raw), None) => raw,
        }
    }
}

impl From<&str> for SearchInput {
    fn from(raw: &str) -> Self {
        SearchInput::Raw(raw.to_string())
    }
}

impl From<String> for SearchInput {
    fn from(raw: String) -> Self {
        SearchInput::Raw(raw)
    }
}

impl From<&String> for SearchInput {
    fn from(raw: &String) -> Self {
        SearchInput::Raw(raw.clone())
    }
}

impl From<SearchQuery> for SearchInput {
    fn from(query: SearchQuery) -> Self {
        SearchInput::Query(query)
    }
}
