//! Organizations API.

use std::sync::Arc;

use super::{envelope, require};
use crate::error::ZendeskError;
use crate::models::{from_envelope, Organization, OrganizationPayload};
use crate::pagination::OffsetPaginator;
use crate::transport::{QueryParams, Transport};

/// Client for `organizations` endpoints.
#[derive(Clone)]
pub struct OrganizationsClient {
    transport: Arc<dyn Transport>,
}

impl OrganizationsClient {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Gets an organization by ID.
    pub async fn get(&self, org_id: u64) -> Result<Organization, ZendeskError> {
        let path = format!("organizations/{}.json", org_id);
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "organization")
    }

    /// Paginates over every organization.
    pub fn list(&self, per_page: u32) -> OffsetPaginator<Organization> {
        OffsetPaginator::offset(
            self.transport.clone(),
            "organizations.json",
            "organizations",
            per_page,
        )
    }

    /// Creates an organization. `name` is required.
    pub async fn create(&self, payload: &OrganizationPayload) -> Result<Organization, ZendeskError> {
        require(payload.name.as_deref(), "name")?;
        tracing::debug!(name = ?payload.name, "Creating organization");

        let body = envelope("organization", payload)?;
        let response = self
            .transport
            .post("organizations.json", Some(&body), None)
            .await?;
        from_envelope(&response, "organization")
    }

    /// Creates an organization, or updates the one matching its `external_id`
    /// or name.
    pub async fn create_or_update(
        &self,
        payload: &OrganizationPayload,
    ) -> Result<Organization, ZendeskError> {
        require(payload.name.as_deref(), "name")?;

        let body = envelope("organization", payload)?;
        let response = self
            .transport
            .post("organizations/create_or_update.json", Some(&body), None)
            .await?;
        from_envelope(&response, "organization")
    }

    /// Updates the fields set in `payload`.
    pub async fn update(
        &self,
        org_id: u64,
        payload: &OrganizationPayload,
    ) -> Result<Organization, ZendeskError> {
        let path = format!("organizations/{}.json", org_id);
        let body = envelope("organization", payload)?;
        let response = self.transport.put(&path, Some(&body), None).await?;
        from_envelope(&response, "organization")
    }

    /// Deletes an organization.
    pub async fn delete(&self, org_id: u64) -> Result<(), ZendeskError> {
        let path = format!("organizations/{}.json", org_id);
        self.transport.delete(&path, None, None).await?;
        tracing::info!(org_id, "Deleted organization");
        Ok(())
    }
}
