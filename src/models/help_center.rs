//! Help Center models: categories, sections and articles.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Top-level grouping of Help Center sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub position: Option<i64>,

    #[serde(default)]
    pub outdated: Option<bool>,

    #[serde(default)]
    pub html_url: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A section inside a category; sections may nest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub category_id: Option<u64>,

    #[serde(default)]
    pub parent_section_id: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub position: Option<i64>,

    #[serde(default)]
    pub sorting: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A knowledge base article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub section_id: Option<u64>,

    #[serde(default)]
    pub author_id: Option<u64>,

    #[serde(default)]
    pub title: Option<String>,

    /// HTML body.
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub draft: Option<bool>,

    #[serde(default)]
    pub promoted: Option<bool>,

    #[serde(default)]
    pub position: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub label_names: Vec<String>,

    #[serde(default)]
    pub permission_group_id: Option<u64>,

    #[serde(default)]
    pub user_segment_id: Option<u64>,

    #[serde(default)]
    pub vote_sum: Option<i64>,

    #[serde(default)]
    pub vote_count: Option<u64>,

    #[serde(default)]
    pub html_url: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body for creating or updating a category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl CategoryPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }
}

/// Body for creating or updating a section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_section_id: Option<u64>,

    /// Moves the section to another category on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
}

impl SectionPayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_parent_section(mut self, parent_section_id: u64) -> Self {
        self.parent_section_id = Some(parent_section_id);
        self
    }

    pub fn with_category(mut self, category_id: u64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Body for creating or updating an article.
///
/// [`ArticlePayload::new`] creates an unpromoted draft visible to every
/// user segment; `user_segment_id` is sent as an explicit `null` then.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticlePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_group_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_segment_id: Option<Option<u64>>,

    /// Moves the article to another section on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<u64>,
}

impl ArticlePayload {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            draft: Some(true),
            promoted: Some(false),
            user_segment_id: Some(None),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_draft(mut self, draft: bool) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn with_promoted(mut self, promoted: bool) -> Self {
        self.promoted = Some(promoted);
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.label_names = Some(labels);
        self
    }

    pub fn with_permission_group(mut self, permission_group_id: u64) -> Self {
        self.permission_group_id = Some(permission_group_id);
        self
    }

    pub fn with_user_segment(mut self, user_segment_id: Option<u64>) -> Self {
        self.user_segment_id = Some(user_segment_id);
        self
    }

    pub fn with_section(mut self, section_id: u64) -> Self {
        self.section_id = Some(section_id);
        self
    }
}
