//! User models for the Zendesk API.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A Zendesk user: end user, agent or admin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    #[serde(default)]
    pub id: Option<u64>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Primary email address.
    #[serde(default)]
    pub email: Option<String>,

    /// `end-user`, `agent` or `admin`.
    #[serde(default)]
    pub role: Option<String>,

    /// Organization the user belongs to.
    #[serde(default)]
    pub organization_id: Option<u64>,

    /// False for deleted users.
    #[serde(default)]
    pub active: Option<bool>,

    /// Whether the user is suspended.
    #[serde(default)]
    pub suspended: Option<bool>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub time_zone: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub external_id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    /// Custom user fields, keyed by field key.
    #[serde(default)]
    pub user_fields: Option<serde_json::Value>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub last_login_at: Option<String>,
}

impl User {
    /// Returns the name or a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Returns true for agents and admins.
    pub fn is_agent(&self) -> bool {
        matches!(self.role.as_deref(), Some("agent") | Some("admin"))
    }
}
