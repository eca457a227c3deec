//! Ticket models for the Zendesk API.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A support ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique ticket ID.
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub subject: Option<String>,

    /// First comment on the ticket.
    #[serde(default)]
    pub description: Option<String>,

    /// `new`, `open`, `pending`, `hold`, `solved` or `closed`.
    #[serde(default)]
    pub status: Option<String>,

    /// `urgent`, `high`, `normal` or `low`.
    #[serde(default)]
    pub priority: Option<String>,

    /// `problem`, `incident`, `question` or `task`.
    #[serde(rename = "type", default)]
    pub ticket_type: Option<String>,

    #[serde(default)]
    pub requester_id: Option<u64>,

    #[serde(default)]
    pub submitter_id: Option<u64>,

    #[serde(default)]
    pub assignee_id: Option<u64>,

    #[serde(default)]
    pub organization_id: Option<u64>,

    #[serde(default)]
    pub group_id: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub collaborator_ids: Vec<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub follower_ids: Vec<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,

    #[serde(default)]
    pub external_id: Option<String>,

    /// Channel the ticket came in through.
    #[serde(default)]
    pub via: Option<serde_json::Value>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub due_at: Option<String>,
}

/// Value of a custom ticket field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,

    #[serde(default)]
    pub value: serde_json::Value,
}

impl Ticket {
    /// User IDs this ticket references, deduplicated in first-seen order:
    /// requester, assignee, submitter, collaborators, then followers.
    pub fn referenced_user_ids(&self) -> Vec<u64> {
        let mut ids = Vec::new();
        let candidates = [self.requester_id, self.assignee_id, self.submitter_id]
            .into_iter()
            .flatten()
            .chain(self.collaborator_ids.iter().copied())
            .chain(self.follower_ids.iter().copied());
        for id in candidates {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Looks up a custom field value by field ID.
    pub fn custom_field(&self, field_id: u64) -> Option<&serde_json::Value> {
        self.custom_fields
            .iter()
            .find(|field| field.id == field_id)
            .map(|field| &field.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ticket_deserialize() {
        let json = r#"{
            "id": 35436,
            "subject": "Help, my printer is on fire!",
            "status": "open",
            "type": "incident",
            "requester_id": 20978392,
            "assignee_id": null,
            "collaborator_ids": [35334, 234],
            "follower_ids": null,
            "tags": ["enterprise", "printer"],
            "custom_fields": [{"id": 27642, "value": "745"}]
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.id, Some(35436));
        assert_eq!(ticket.ticket_type.as_deref(), Some("incident"));
        assert!(ticket.assignee_id.is_none());
        assert!(ticket.follower_ids.is_empty());
        assert_eq!(ticket.custom_field(27642), Some(&serde_json::json!("745")));
        assert!(ticket.custom_field(1).is_none());
    }

    #[test]
    fn test_referenced_user_ids_order_and_dedup() {
        let ticket = Ticket {
            requester_id: Some(1),
            assignee_id: Some(2),
            submitter_id: Some(1),
            collaborator_ids: vec![3, 2, 4],
            follower_ids: vec![4, 5],
            ..Ticket::default()
        };
        assert_eq!(ticket.referenced_user_ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_referenced_user_ids_empty() {
        assert!(Ticket::default().referenced_user_ids().is_empty());
    }
}
