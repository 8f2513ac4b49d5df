// Volume endpoints
//
// Volume creation is a batch call: the array answers 2xx and reports
// per-volume failures inline, so creates return `BatchItem`s for the
// caller to inspect.

use tracing::debug;

use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::{BatchItem, CreateAliases, CreateVolumes, Volume};

impl Ds8kClient {
    /// `GET /pools/{id}/volumes`
    pub async fn list_pool_volumes(&self, pool: &str) -> Result<Vec<Volume>, Error> {
        self.get_kind(self.url(&["pools", pool, "volumes"])?, "volumes")
            .await
    }

    /// `GET /volumes/{id}`
    pub async fn get_volume(&self, id: &str) -> Result<Volume, Error> {
        self.get_one(self.url(&["volumes", id])?, "volumes").await
    }

    /// `POST /volumes`
    pub async fn create_volumes(
        &self,
        params: &CreateVolumes,
    ) -> Result<Vec<BatchItem<Volume>>, Error> {
        debug!(
            name = %params.name,
            pool = %params.pool,
            stgtype = %params.stgtype,
            ids = ?params.ids,
            qty = ?params.qty,
            "creating volumes"
        );
        self.post_kind(self.url(&["volumes"])?, params, "volumes")
            .await
    }

    /// `DELETE /volumes/{id}`
    pub async fn delete_volume(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting volume");
        self.delete(self.url(&["volumes", id])?).await
    }

    /// `POST /volumes/{base}/aliases`
    pub async fn create_aliases(
        &self,
        base: &str,
        params: &CreateAliases,
    ) -> Result<Vec<BatchItem<Volume>>, Error> {
        debug!(
            base,
            start = %params.alias_id,
            quantity = params.quantity,
            order = %params.order,
            "creating alias volumes"
        );
        self.post_kind(self.url(&["volumes", base, "aliases"])?, params, "volumes")
            .await
    }
}
