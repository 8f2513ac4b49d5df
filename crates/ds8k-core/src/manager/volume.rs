use ds8k_api::models::{CreateAliases, CreateVolumes, Volume};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Reconciler, require};
use crate::alias::{AliasOrder, AliasPlan, plan_aliases};
use crate::backend::{PoolApi, VolumeApi};
use crate::error::CoreError;
use crate::ids::{LssId, VolumeId};
use crate::info::volumes_in_all_pools;
use crate::lookup::{lookup, verify};
use crate::outcome::{Outcome, interpret_batch};
use crate::state::DesiredState;

// ── Parameters ──────────────────────────────────────────────────────

/// Upper bound for one quantity-based create. An LSS holds 256 volumes.
pub const MAX_VOLUME_QUANTITY: u32 = 256;

/// Fixed block (open systems) or count key data (mainframe).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageType {
    #[default]
    Fb,
    Ckd,
}

/// Unit of the requested capacity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CapacityType {
    #[default]
    Gib,
    Bytes,
    Cyl,
    Mod1,
}

/// Thin provisioning mode, `tp` on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AllocationMethod {
    #[default]
    None,
    Ese,
    Tse,
}

#[derive(Debug, Clone)]
pub struct VolumeSpec {
    pub name: Option<String>,
    /// Explicit ids. When set, creation is idempotent and deletion is by id.
    pub ids: Vec<VolumeId>,
    pub pool: Option<String>,
    pub capacity: Option<String>,
    pub capacity_type: CapacityType,
    pub storage_type: StorageType,
    pub allocation: AllocationMethod,
    pub lss: Option<LssId>,
    /// Number of volumes to create when no ids are given.
    pub quantity: u32,
    pub state: DesiredState,
}

impl Default for VolumeSpec {
    fn default() -> Self {
        Self {
            name: None,
            ids: Vec::new(),
            pool: None,
            capacity: None,
            capacity_type: CapacityType::default(),
            storage_type: StorageType::default(),
            allocation: AllocationMethod::default(),
            lss: None,
            quantity: 1,
            state: DesiredState::Present,
        }
    }
}

/// CKD alias volumes for a set of base volumes.
#[derive(Debug, Clone)]
pub struct AliasSpec {
    pub bases: Vec<VolumeId>,
    /// Aliases per base volume.
    pub quantity: u32,
    pub order: AliasOrder,
    pub start: Option<VolumeId>,
}

// ── Reconciliation ──────────────────────────────────────────────────

impl<C: VolumeApi + PoolApi> Reconciler<'_, C> {
    /// Create volumes in a pool, or delete them by id or by name.
    ///
    /// Without explicit ids every call creates `quantity` new volumes.
    pub async fn ensure_volumes(&self, spec: &VolumeSpec) -> Result<Outcome<Volume>, CoreError> {
        match spec.state {
            DesiredState::Present if spec.ids.is_empty() => self.create_by_quantity(spec).await,
            DesiredState::Present => self.create_missing_ids(spec).await,
            DesiredState::Absent => self.volumes_absent(spec).await,
        }
    }

    fn volume_params(spec: &VolumeSpec, name: &str) -> Result<CreateVolumes, CoreError> {
        let pool = require("pool", spec.pool.as_deref().unwrap_or_default())?;
        let capacity = require("capacity", spec.capacity.as_deref().unwrap_or_default())?;
        Ok(CreateVolumes {
            name: name.to_owned(),
            cap: capacity.to_owned(),
            captype: spec.capacity_type.to_string(),
            stgtype: spec.storage_type.to_string(),
            pool: pool.to_owned(),
            tp: spec.allocation.to_string(),
            ..CreateVolumes::default()
        })
    }

    async fn create_by_quantity(&self, spec: &VolumeSpec) -> Result<Outcome<Volume>, CoreError> {
        let name = require("name", spec.name.as_deref().unwrap_or_default())?;
        if spec.quantity == 0 || spec.quantity > MAX_VOLUME_QUANTITY {
            return Err(CoreError::validation(format!(
                "quantity must be between 1 and {MAX_VOLUME_QUANTITY}"
            )));
        }
        let mut params = Self::volume_params(spec, name)?;
        params.lss = spec.lss.as_ref().map(ToString::to_string);
        params.qty = (spec.quantity > 1).then_some(spec.quantity);

        info!(name, quantity = spec.quantity, pool = %params.pool, "creating volumes");
        let locators: Vec<String> = (0..spec.quantity).map(|_| name.to_owned()).collect();
        self.create_batch(&params, &locators).await
    }

    async fn create_missing_ids(&self, spec: &VolumeSpec) -> Result<Outcome<Volume>, CoreError> {
        let name = require("name", spec.name.as_deref().unwrap_or_default())?;

        let mut missing = Vec::new();
        for id in &spec.ids {
            let id = id.to_string();
            if lookup(self.client.get_volume(&id)).await?.is_none() {
                missing.push(id);
            }
        }
        if missing.is_empty() {
            debug!(name, "all requested volume ids exist");
            return Ok(Outcome::unchanged());
        }

        let mut params = Self::volume_params(spec, name)?;
        params.ids.clone_from(&missing);

        info!(name, ids = ?missing, "creating missing volume ids");
        self.create_batch(&params, &missing).await
    }

    async fn create_batch(
        &self,
        params: &CreateVolumes,
        locators: &[String],
    ) -> Result<Outcome<Volume>, CoreError> {
        let items = self
            .mutate(
                format!(
                    "Failed to create volumes {} on the DS8000 storage",
                    params.name
                ),
                self.client.create_volumes(params),
            )
            .await?;

        let Some(items) = items else {
            return Ok(Outcome::changed());
        };
        let created = interpret_batch(locators, items)?;
        Ok(Outcome {
            changed: true,
            facts: created,
        })
    }

    async fn volumes_absent(&self, spec: &VolumeSpec) -> Result<Outcome<Volume>, CoreError> {
        let targets: Vec<Volume> = if spec.ids.is_empty() {
            let name = spec
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| CoreError::validation("one of name or volume ids is required"))?;
            volumes_in_all_pools(self.client)
                .await?
                .into_iter()
                .filter(|v| v.name == name)
                .collect()
        } else {
            let mut found = Vec::new();
            for id in &spec.ids {
                if let Some(volume) = lookup(self.client.get_volume(&id.to_string())).await? {
                    found.push(volume);
                }
            }
            found
        };

        let mut outcome = Outcome::unchanged();
        for volume in targets {
            info!(id = %volume.id, name = %volume.name, "deleting volume");
            self.mutate(
                format!(
                    "Failed to delete the volume {} ({}) from the DS8000 storage",
                    volume.name, volume.id
                ),
                self.client.delete_volume(&volume.id),
            )
            .await?;
            outcome.absorb(Outcome::changed().with_fact(volume));
        }
        Ok(outcome)
    }
}

impl<C: VolumeApi> Reconciler<'_, C> {
    /// Request CKD alias volumes for each base volume.
    ///
    /// A base whose derived alias ids all exist already is skipped.
    pub async fn ensure_aliases(&self, spec: &AliasSpec) -> Result<Outcome<AliasPlan>, CoreError> {
        let plans = plan_aliases(&spec.bases, spec.quantity, spec.order, spec.start)?;

        for base in &spec.bases {
            let id = base.to_string();
            let volume = verify("volume", &id, self.client.get_volume(&id)).await?;
            if let Some(stgtype) = volume.stgtype.as_deref() {
                if !stgtype.eq_ignore_ascii_case("ckd") {
                    return Err(CoreError::Conflict {
                        message: format!(
                            "The volume {id} is a {stgtype} volume; aliases need a ckd base"
                        ),
                    });
                }
            }
        }

        let mut outcome = Outcome::unchanged();
        for plan in plans {
            if self.all_exist(&plan.aliases).await? {
                debug!(base = %plan.base, "aliases already present");
                continue;
            }

            let params = CreateAliases {
                alias_id: plan.start.to_string(),
                quantity: spec.quantity,
                order: spec.order.to_string(),
            };
            info!(base = %plan.base, start = %plan.start, "creating alias volumes");
            let items = self
                .mutate(
                    format!(
                        "Failed to create alias volumes for base volume {}",
                        plan.base
                    ),
                    self.client.create_aliases(&plan.base.to_string(), &params),
                )
                .await?;
            if let Some(items) = items {
                let locators: Vec<String> = plan.aliases.iter().map(ToString::to_string).collect();
                interpret_batch(&locators, items)?;
            }
            outcome.absorb(Outcome::changed().with_fact(plan));
        }
        Ok(outcome)
    }

    async fn all_exist(&self, ids: &[VolumeId]) -> Result<bool, CoreError> {
        for id in ids {
            if lookup(self.client.get_volume(&id.to_string())).await?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(StorageType::Ckd.to_string(), "ckd");
        assert_eq!(CapacityType::Mod1.to_string(), "mod1");
        assert_eq!(AllocationMethod::default().to_string(), "none");
        assert_eq!("ESE".parse::<AllocationMethod>().unwrap(), AllocationMethod::Ese);
    }
}
