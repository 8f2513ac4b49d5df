// Host endpoints, including the host-scoped volume and mapping views.

use tracing::debug;

use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::{CreateHost, Host, HostPort, MapVolumes, Mapping, Volume};

impl Ds8kClient {
    /// `GET /hosts`
    pub async fn list_hosts(&self) -> Result<Vec<Host>, Error> {
        self.get_kind(self.url(&["hosts"])?, "hosts").await
    }

    /// `GET /hosts/{name}`
    pub async fn get_host(&self, name: &str) -> Result<Host, Error> {
        self.get_one(self.url(&["hosts", name])?, "hosts").await
    }

    /// `POST /hosts`. Returns the created host when the array echoes it.
    pub async fn create_host(&self, params: &CreateHost) -> Result<Option<Host>, Error> {
        debug!(name = %params.name, hosttype = %params.hosttype, "creating host");
        let created: Vec<serde_json::Value> = self
            .post_kind(self.url(&["hosts"])?, params, "hosts")
            .await?;
        // Echoed representations are sometimes partial; treat those as absent.
        Ok(created
            .into_iter()
            .next()
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    /// `DELETE /hosts/{name}`
    pub async fn delete_host(&self, name: &str) -> Result<(), Error> {
        debug!(name, "deleting host");
        self.delete(self.url(&["hosts", name])?).await
    }

    /// `GET /hosts/{name}/volumes`
    pub async fn list_host_volumes(&self, name: &str) -> Result<Vec<Volume>, Error> {
        self.get_kind(self.url(&["hosts", name, "volumes"])?, "volumes")
            .await
    }

    /// `GET /hosts/{name}/host_ports`
    pub async fn list_ports_for_host(&self, name: &str) -> Result<Vec<HostPort>, Error> {
        self.get_kind(self.url(&["hosts", name, "host_ports"])?, "host_ports")
            .await
    }

    // ── Mappings ─────────────────────────────────────────────────────

    /// `GET /hosts/{name}/mappings`
    pub async fn list_host_mappings(&self, name: &str) -> Result<Vec<Mapping>, Error> {
        self.get_kind(self.url(&["hosts", name, "mappings"])?, "mappings")
            .await
    }

    /// `POST /hosts/{name}/mappings`
    pub async fn map_volumes(&self, host: &str, params: &MapVolumes) -> Result<(), Error> {
        debug!(host, volumes = ?params.volumes, "mapping volumes");
        self.post_empty(self.url(&["hosts", host, "mappings"])?, params)
            .await
    }

    /// `DELETE /hosts/{name}/mappings/{lunid}`
    pub async fn unmap_volume(&self, host: &str, lunid: &str) -> Result<(), Error> {
        debug!(host, lunid, "unmapping volume");
        self.delete(self.url(&["hosts", host, "mappings", lunid])?)
            .await
    }
}
