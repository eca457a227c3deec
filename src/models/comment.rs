//! Ticket comment models for the Zendesk API.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A comment on a ticket. Private comments are internal notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(rename = "type", default)]
    pub comment_type: Option<String>,

    #[serde(default)]
    pub author_id: Option<u64>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub html_body: Option<String>,

    #[serde(default)]
    pub plain_body: Option<String>,

    /// False for internal notes.
    #[serde(default)]
    pub public: Option<bool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub via: Option<serde_json::Value>,

    #[serde(default)]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl Comment {
    /// Returns true if this is an internal note.
    pub fn is_internal(&self) -> bool {
        self.public == Some(false)
    }
}

/// A file attached to a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub file_name: Option<String>,

    /// Download URL; usually redirects to a signed storage URL.
    #[serde(default)]
    pub content_url: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,

    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub inline: Option<bool>,

    #[serde(default)]
    pub malware_scan_result: Option<String>,
}

/// Body for adding a comment to a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub body: String,

    pub public: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,

    /// Upload tokens to attach.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uploads: Vec<String>,
}

impl CommentPayload {
    /// A public reply.
    pub fn public(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            public: true,
            author_id: None,
            uploads: Vec::new(),
        }
    }

    /// An internal note.
    pub fn internal(body: impl Into<String>) -> Self {
        Self {
            public: false,
            ..Self::public(body)
        }
    }

    pub fn with_author(mut self, author_id: u64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn with_uploads(mut self, tokens: Vec<String>) -> Self {
        self.uploads = tokens;
        self
    }
}
