//! Ticket bundled with its comments and every user they reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Comment, Ticket, User};

/// A ticket together with its comments and the users they reference.
///
/// `users` holds exactly the users the enrichment call resolved; lookups
/// for IDs that were never fetched return `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTicket {
    pub ticket: Ticket,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub users: HashMap<u64, User>,
}

impl EnrichedTicket {
    pub fn new(ticket: Ticket, comments: Vec<Comment>, users: HashMap<u64, User>) -> Self {
        Self {
            ticket,
            comments,
            users,
        }
    }

    /// Looks up a user by ID.
    pub fn get_user(&self, user_id: Option<u64>) -> Option<&User> {
        user_id.and_then(|id| self.users.get(&id))
    }

    pub fn requester(&self) -> Option<&User> {
        self.get_user(self.ticket.requester_id)
    }

    pub fn assignee(&self) -> Option<&User> {
        self.get_user(self.ticket.assignee_id)
    }

    pub fn submitter(&self) -> Option<&User> {
        self.get_user(self.ticket.submitter_id)
    }

    pub fn comment_author(&self, comment: &Comment) -> Option<&User> {
        self.get_user(comment.author_id)
    }

    /// Users copied on the ticket that were resolved.
    pub fn collaborators(&self) -> Vec<&User> {
        self.ticket
            .collaborator_ids
            .iter()
            .filter_map(|id| self.users.get(id))
            .collect()
    }
}
