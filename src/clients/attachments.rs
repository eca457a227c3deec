//! Attachments and uploads.

use std::sync::Arc;

use crate::error::ZendeskError;
use crate::models::{from_envelope, Attachment};
use crate::transport::{QueryParams, Transport};

/// Client for attachment metadata, redaction and upload cleanup.
#[derive(Clone)]
pub struct AttachmentsClient {
    transport: Arc<dyn Transport>,
}

impl AttachmentsClient {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Gets attachment metadata, including its `content_url`.
    pub async fn get(&self, attachment_id: u64) -> Result<Attachment, ZendeskError> {
        let path = format!("attachments/{}.json", attachment_id);
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "attachment")
    }

    /// Permanently replaces a comment attachment with an empty `redacted.txt`.
    pub async fn redact(
        &self,
        ticket_id: u64,
        comment_id: u64,
        attachment_id: u64,
    ) -> Result<Attachment, ZendeskError> {
        let path = format!(
            "tickets/{}/comments/{}/attachments/{}/redact.json",
            ticket_id, comment_id, attachment_id
        );
        let response = self.transport.put(&path, None, None).await?;
        from_envelope(&response, "attachment")
    }

    /// Deletes an upload that was never attached to a comment.
    pub async fn delete_upload(&self, token: &str) -> Result<(), ZendeskError> {
        if token.trim().is_empty() || token.contains('/') {
            return Err(ZendeskError::validation(format!(
                "invalid upload token '{}'",
                token
            )));
        }
        let path = format!("uploads/{}.json", token);
        self.transport.delete(&path, None, None).await?;
        Ok(())
    }
}
