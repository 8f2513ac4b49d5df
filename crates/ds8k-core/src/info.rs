// ── Info collectors ──
//
// Read-only views over the array. Every collector returns an unchanged
// `Outcome` whose facts are the matching representations.

use std::collections::HashSet;

use ds8k_api::models::{Host, HostPort, Lss, Marray, Pool, ResourceGroup, Volume};
use tracing::debug;

use crate::backend::{
    HostApi, HostPortApi, LssApi, MarrayApi, PoolApi, ResourceGroupApi, VolumeApi,
};
use crate::error::CoreError;
use crate::ids::{VolumeId, Wwpn};
use crate::lookup::verify;
use crate::outcome::Outcome;

/// Every volume in every pool.
pub(crate) async fn volumes_in_all_pools<C: PoolApi + VolumeApi>(
    client: &C,
) -> Result<Vec<Volume>, CoreError> {
    let mut all = Vec::new();
    for pool in client.list_pools().await? {
        all.extend(client.list_pool_volumes(&pool.id).await?);
    }
    Ok(all)
}

/// Volumes of `first` whose id appears in every list of `rest`.
fn intersect_by_id(first: Vec<Volume>, rest: &[Vec<Volume>]) -> Vec<Volume> {
    let keep: Vec<HashSet<&str>> = rest
        .iter()
        .map(|set| set.iter().map(|v| v.id.as_str()).collect())
        .collect();
    first
        .into_iter()
        .filter(|v| keep.iter().all(|ids| ids.contains(v.id.as_str())))
        .collect()
}

// ── Filters ─────────────────────────────────────────────────────────

/// Host ports by explicit WWPN list or by owning host.
#[derive(Debug, Clone, Default)]
pub struct HostPortFilter {
    pub wwpns: Vec<Wwpn>,
    pub host: Option<String>,
}

/// Volumes matching all given filters.
#[derive(Debug, Clone, Default)]
pub struct VolumeFilter {
    pub host: Option<String>,
    pub pool: Option<String>,
    pub ids: Vec<VolumeId>,
}

#[derive(Debug, Clone, Default)]
pub struct LssFilter {
    pub id: Option<String>,
    /// `fb` or `ckd`.
    pub lss_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceGroupFilter {
    pub id: Option<String>,
    pub label: Option<String>,
}

// ── Inventory ───────────────────────────────────────────────────────

/// Read-only queries against one array.
pub struct Inventory<'a, C> {
    client: &'a C,
}

impl<'a, C> Inventory<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }
}

impl<C: HostApi> Inventory<'_, C> {
    pub async fn hosts(&self, name: Option<&str>) -> Result<Outcome<Host>, CoreError> {
        match name {
            Some(name) => {
                let host = verify("host", name, self.client.get_host(name)).await?;
                Ok(Outcome::facts(vec![host]))
            }
            None => Ok(Outcome::facts(self.client.list_hosts().await?)),
        }
    }
}

impl<C: HostApi + HostPortApi> Inventory<'_, C> {
    pub async fn host_ports(
        &self,
        filter: &HostPortFilter,
    ) -> Result<Outcome<HostPort>, CoreError> {
        match (&filter.host, filter.wwpns.is_empty()) {
            (Some(_), false) => Err(CoreError::validation(
                "host and host ports are mutually exclusive",
            )),
            (Some(host), true) => {
                verify("host", host, self.client.get_host(host)).await?;
                Ok(Outcome::facts(self.client.list_ports_for_host(host).await?))
            }
            (None, false) => {
                let mut ports = Vec::with_capacity(filter.wwpns.len());
                for wwpn in &filter.wwpns {
                    ports.push(
                        verify("host port", wwpn.as_str(), self.client.get_host_port(wwpn.as_str()))
                            .await?,
                    );
                }
                Ok(Outcome::facts(ports))
            }
            (None, true) => Ok(Outcome::facts(self.client.list_host_ports().await?)),
        }
    }
}

impl<C: HostApi + PoolApi + VolumeApi> Inventory<'_, C> {
    /// The intersection, by volume id, of every given filter. No filter
    /// lists every volume in every pool.
    pub async fn volumes(&self, filter: &VolumeFilter) -> Result<Outcome<Volume>, CoreError> {
        let mut sets: Vec<Vec<Volume>> = Vec::new();

        if let Some(host) = &filter.host {
            verify("host", host, self.client.get_host(host)).await?;
            sets.push(self.client.list_host_volumes(host).await?);
        }
        if let Some(pool) = &filter.pool {
            verify("pool", pool, self.client.get_pool(pool)).await?;
            sets.push(self.client.list_pool_volumes(pool).await?);
        }
        if !filter.ids.is_empty() {
            let mut by_id = Vec::with_capacity(filter.ids.len());
            for id in &filter.ids {
                let id = id.to_string();
                by_id.push(verify("volume", &id, self.client.get_volume(&id)).await?);
            }
            sets.push(by_id);
        }

        if sets.is_empty() {
            return Ok(Outcome::facts(volumes_in_all_pools(self.client).await?));
        }
        let first = sets.remove(0);
        let volumes = intersect_by_id(first, &sets);
        debug!(count = volumes.len(), filters = sets.len() + 1, "volume filters applied");
        Ok(Outcome::facts(volumes))
    }
}

impl<C: PoolApi> Inventory<'_, C> {
    pub async fn pools(&self, id: Option<&str>) -> Result<Outcome<Pool>, CoreError> {
        match id {
            Some(id) => {
                let pool = verify("pool", id, self.client.get_pool(id)).await?;
                Ok(Outcome::facts(vec![pool]))
            }
            None => Ok(Outcome::facts(self.client.list_pools().await?)),
        }
    }
}

impl<C: LssApi> Inventory<'_, C> {
    pub async fn lss(&self, filter: &LssFilter) -> Result<Outcome<Lss>, CoreError> {
        if let Some(t) = filter.lss_type.as_deref() {
            if !matches!(t, "fb" | "ckd") {
                return Err(CoreError::validation(format!(
                    "LSS type must be fb or ckd, got '{t}'"
                )));
            }
        }
        match &filter.id {
            Some(id) => {
                let lss = verify("LSS", id, self.client.get_lss(id)).await?;
                Ok(Outcome::facts(vec![lss]))
            }
            None => Ok(Outcome::facts(
                self.client.list_lss(filter.lss_type.as_deref()).await?,
            )),
        }
    }
}

impl<C: MarrayApi> Inventory<'_, C> {
    pub async fn marrays(&self, id: Option<&str>) -> Result<Outcome<Marray>, CoreError> {
        match id {
            Some(id) => {
                let marray = verify("marray", id, self.client.get_marray(id)).await?;
                Ok(Outcome::facts(vec![marray]))
            }
            None => Ok(Outcome::facts(self.client.list_marrays().await?)),
        }
    }
}

impl<C: ResourceGroupApi> Inventory<'_, C> {
    pub async fn resource_groups(
        &self,
        filter: &ResourceGroupFilter,
    ) -> Result<Outcome<ResourceGroup>, CoreError> {
        if let Some(id) = &filter.id {
            let group = verify("resource group", id, self.client.get_resource_group(id)).await?;
            return Ok(Outcome::facts(vec![group]));
        }
        let groups = self.client.list_resource_groups().await?;
        Ok(Outcome::facts(match &filter.label {
            Some(label) => groups.into_iter().filter(|g| &g.label == label).collect(),
            None => groups,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vols(ids: &[&str]) -> Vec<Volume> {
        ids.iter()
            .map(|id| serde_json::from_value(serde_json::json!({"id": id, "name": "v"})).unwrap())
            .collect()
    }

    fn ids(volumes: &[Volume]) -> Vec<&str> {
        volumes.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn intersection_keeps_first_order() {
        let out = intersect_by_id(
            vols(&["1003", "1001", "1002"]),
            &[vols(&["1002", "1003"]), vols(&["1003", "1002", "2000"])],
        );
        assert_eq!(ids(&out), vec!["1003", "1002"]);
    }

    #[test]
    fn disjoint_sets_are_empty() {
        let out = intersect_by_id(vols(&["1000"]), &[vols(&["1001"])]);
        assert!(out.is_empty());
    }
}
