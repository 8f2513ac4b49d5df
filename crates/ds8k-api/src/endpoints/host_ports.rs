// Host port (FC initiator WWPN) endpoints.

use tracing::debug;

use crate::client::Ds8kClient;
use crate::error::Error;
use crate::models::{CreateHostPort, HostPort, UpdateHostPort};

impl Ds8kClient {
    /// `GET /host_ports`
    pub async fn list_host_ports(&self) -> Result<Vec<HostPort>, Error> {
        self.get_kind(self.url(&["host_ports"])?, "host_ports")
            .await
    }

    /// `GET /host_ports/{wwpn}`
    pub async fn get_host_port(&self, wwpn: &str) -> Result<HostPort, Error> {
        self.get_one(self.url(&["host_ports", wwpn])?, "host_ports")
            .await
    }

    /// `POST /host_ports`
    pub async fn create_host_port(&self, params: &CreateHostPort) -> Result<(), Error> {
        debug!(wwpn = %params.wwpn, host = %params.host, "creating host port");
        self.post_empty(self.url(&["host_ports"])?, params).await
    }

    /// `PUT /host_ports/{wwpn}` (bind to a host)
    pub async fn update_host_port(&self, wwpn: &str, params: &UpdateHostPort) -> Result<(), Error> {
        debug!(wwpn, host = %params.host, "assigning host port");
        self.put(self.url(&["host_ports", wwpn])?, params).await
    }

    /// `DELETE /host_ports/{wwpn}`
    pub async fn delete_host_port(&self, wwpn: &str) -> Result<(), Error> {
        debug!(wwpn, "deleting host port");
        self.delete(self.url(&["host_ports", wwpn])?).await
    }
}
