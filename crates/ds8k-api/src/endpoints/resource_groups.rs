// Resource group endpoints.

use tracing::debug;

use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::{CreateResourceGroup, ResourceGroup, UpdateResourceGroup};

impl Ds8kClient {
    /// `GET /resource_groups`
    pub async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>, Error> {
        self.get_kind(self.url(&["resource_groups"])?, "resource_groups")
            .await
    }

    /// `GET /resource_groups/{id}`
    pub async fn get_resource_group(&self, id: &str) -> Result<ResourceGroup, Error> {
        self.get_one(self.url(&["resource_groups", id])?, "resource_groups")
            .await
    }

    /// `POST /resource_groups`. Returns the created group when echoed.
    pub async fn create_resource_group(
        &self,
        params: &CreateResourceGroup,
    ) -> Result<Option<ResourceGroup>, Error> {
        debug!(label = %params.label, id = ?params.id, "creating resource group");
        let created: Vec<serde_json::Value> = self
            .post_kind(self.url(&["resource_groups"])?, params, "resource_groups")
            .await?;
        // Echoed representations are sometimes partial; treat those as absent.
        Ok(created
            .into_iter()
            .next()
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    /// `PUT /resource_groups/{id}`
    pub async fn update_resource_group(
        &self,
        id: &str,
        params: &UpdateResourceGroup,
    ) -> Result<(), Error> {
        debug!(id, ?params, "updating resource group");
        self.put(self.url(&["resource_groups", id])?, params).await
    }

    /// `DELETE /resource_groups/{id}`
    pub async fn delete_resource_group(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting resource group");
        self.delete(self.url(&["resource_groups", id])?).await
    }
}
