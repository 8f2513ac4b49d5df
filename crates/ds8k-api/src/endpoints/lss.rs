// Logical subsystem endpoints.

use tracing::debug;

use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::{CreateLss, Lss};

impl Ds8kClient {
    /// `GET /lss`, optionally `?type=fb|ckd`.
    pub async fn list_lss(&self, lss_type: Option<&str>) -> Result<Vec<Lss>, Error> {
        let mut url = self.url(&["lss"])?;
        if let Some(t) = lss_type {
            url.query_pairs_mut().append_pair("type", t);
        }
        self.get_kind(url, "lss").await
    }

    /// `GET /lss/{id}`
    pub async fn get_lss(&self, id: &str) -> Result<Lss, Error> {
        self.get_one(self.url(&["lss", id])?, "lss").await
    }

    /// `POST /lss`
    pub async fn create_lss(&self, params: &CreateLss) -> Result<(), Error> {
        debug!(
            id = %params.id,
            ssid = %params.sub_system_identifier,
            cu_type = %params.ckd_base_cu_type,
            "creating LSS"
        );
        self.post_empty(self.url(&["lss"])?, params).await
    }

    /// `DELETE /lss/{id}`
    pub async fn delete_lss(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting LSS");
        self.delete(self.url(&["lss", id])?).await
    }
}
