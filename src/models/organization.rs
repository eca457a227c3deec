//! Organization models for the Zendesk API.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A customer organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Unique organization ID.
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub external_id: Option<String>,

    /// Email domains whose users join this organization automatically.
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain_names: Vec<String>,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub group_id: Option<u64>,

    #[serde(default)]
    pub shared_tickets: Option<bool>,

    #[serde(default)]
    pub shared_comments: Option<bool>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub organization_fields: Option<serde_json::Value>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body for creating or updating an organization.
///
/// Unset fields are left out of the request, so an update only touches
/// what was set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_fields: Option<serde_json::Value>,
}

impl OrganizationPayload {
    /// Creates a payload for a new organization.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_domain_names(mut self, domains: Vec<String>) -> Self {
        self.domain_names = Some(domains);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_group_id(mut self, group_id: u64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_organization_fields(mut self, fields: serde_json::Value) -> Self {
        self.organization_fields = Some(fields);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_deserialize() {
        let json = r#"{
            "id": 361898904439,
            "name": "Acme",
            "domain_names": ["acme.com"],
            "tags": ["enterprise"],
            "shared_tickets": false
        }"#;
        let org: Organization = serde_json::from_str(json).unwrap();
        assert_eq!(org.id, Some(361898904439));
        assert_eq!(org.domain_names, vec!["acme.com"]);
    }

    #[test]
    fn test_payload_omits_unset_fields() {
        let payload = OrganizationPayload::new("Acme").with_tags(vec!["vip".into()]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["tags"][0], "vip");
        assert!(json.get("details").is_none());
        assert!(json.get("external_id").is_none());
    }
}
