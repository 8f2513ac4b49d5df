use ds8k_api::models::MapVolumes;
use tracing::{debug, info};

use super::{Reconciler, require};
use crate::backend::{HostApi, MappingApi, PoolApi, VolumeApi};
use crate::error::CoreError;
use crate::ids::VolumeId;
use crate::info::volumes_in_all_pools;
use crate::lookup::verify;
use crate::outcome::Outcome;
use crate::state::DesiredState;

/// Which volumes a mapping request is about.
#[derive(Debug, Clone)]
pub enum VolumeSelector {
    Ids(Vec<VolumeId>),
    /// Every volume carrying this name.
    Name(String),
}

#[derive(Debug, Clone)]
pub struct MappingSpec {
    pub host: String,
    pub volumes: VolumeSelector,
    pub state: DesiredState,
}

impl<C: HostApi + MappingApi + PoolApi + VolumeApi> Reconciler<'_, C> {
    /// Map volumes to a host, or unmap them.
    ///
    /// Facts are the ids of the volumes whose mapping changed.
    pub async fn ensure_mapping(&self, spec: &MappingSpec) -> Result<Outcome<String>, CoreError> {
        let host = require("host", &spec.host)?;
        verify("host", host, self.client.get_host(host)).await?;

        let ids = self.resolve_volume_ids(&spec.volumes).await?;
        if ids.is_empty() {
            return match (&spec.volumes, spec.state) {
                (VolumeSelector::Name(name), DesiredState::Present) => {
                    Err(CoreError::not_found("volume named", name.clone()))
                }
                _ => Ok(Outcome::unchanged()),
            };
        }

        let mappings = self.client.list_host_mappings(host).await?;
        match spec.state {
            DesiredState::Present => {
                let to_map: Vec<String> = ids
                    .into_iter()
                    .filter(|id| {
                        !mappings
                            .iter()
                            .any(|m| m.volume.as_deref() == Some(id.as_str()))
                    })
                    .collect();
                if to_map.is_empty() {
                    debug!(host, "volumes already mapped");
                    return Ok(Outcome::unchanged());
                }

                info!(host, volumes = ?to_map, "mapping volumes");
                let params = MapVolumes {
                    volumes: to_map.clone(),
                };
                self.mutate(
                    format!(
                        "Failed to map volume ids {} to the host {host} on the DS8000 storage",
                        to_map.join(",")
                    ),
                    self.client.map_volumes(host, &params),
                )
                .await?;
                Ok(Outcome {
                    changed: true,
                    facts: to_map,
                })
            }
            DesiredState::Absent => {
                let mut outcome = Outcome::unchanged();
                for mapping in &mappings {
                    let Some(volume) = mapping.volume.as_deref() else {
                        continue;
                    };
                    if !ids.iter().any(|id| id == volume) {
                        continue;
                    }
                    info!(host, volume, lunid = %mapping.lunid, "unmapping volume");
                    self.mutate(
                        format!(
                            "Failed to unmap volume id {volume} from the host {host} on the DS8000 storage"
                        ),
                        self.client.unmap_volume(host, &mapping.lunid),
                    )
                    .await?;
                    outcome.absorb(Outcome::changed().with_fact(volume.to_owned()));
                }
                Ok(outcome)
            }
        }
    }

    async fn resolve_volume_ids(
        &self,
        selector: &VolumeSelector,
    ) -> Result<Vec<String>, CoreError> {
        match selector {
            VolumeSelector::Ids(ids) => Ok(ids.iter().map(ToString::to_string).collect()),
            VolumeSelector::Name(name) => {
                let name = require("volume name", name)?;
                Ok(volumes_in_all_pools(self.client)
                    .await?
                    .into_iter()
                    .filter(|v| v.name == name)
                    .map(|v| v.id)
                    .collect())
            }
        }
    }
}
