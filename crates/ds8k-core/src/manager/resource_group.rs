use ds8k_api::models::{CreateResourceGroup, ResourceGroup, UpdateResourceGroup};
use serde::Serialize;
use tracing::{debug, info};

use super::{Reconciler, require};
use crate::backend::ResourceGroupApi;
use crate::error::CoreError;
use crate::lookup::lookup;
use crate::outcome::Outcome;
use crate::state::DesiredState;

/// Requested resource group. Unset optional attributes are left alone.
#[derive(Debug, Clone, Default)]
pub struct ResourceGroupSpec {
    pub id: Option<String>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub cs_global: Option<String>,
    pub pass_global: Option<String>,
    pub gm_masters: Option<Vec<String>>,
    pub gm_sessions: Option<Vec<String>>,
    pub state: DesiredState,
}

/// Reported for a created or changed group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceGroupRef {
    pub id: String,
}

impl ResourceGroupSpec {
    /// Attributes that create does not accept and need a follow-up update.
    fn extras(&self) -> UpdateResourceGroup {
        UpdateResourceGroup {
            cs_global: self.cs_global.clone(),
            pass_global: self.pass_global.clone(),
            gm_masters: self.gm_masters.clone(),
            gm_sessions: self.gm_sessions.clone(),
            ..UpdateResourceGroup::default()
        }
    }

    /// Requested attributes whose value differs from `existing`.
    fn diff(&self, existing: &ResourceGroup) -> UpdateResourceGroup {
        fn differs(wanted: Option<&String>, actual: Option<&str>) -> Option<String> {
            wanted.filter(|w| Some(w.as_str()) != actual).cloned()
        }
        fn list_differs(wanted: Option<&Vec<String>>, actual: &[String]) -> Option<Vec<String>> {
            wanted
                .filter(|w| {
                    let mut w = (*w).clone();
                    let mut a = actual.to_vec();
                    w.sort();
                    a.sort();
                    w != a
                })
                .cloned()
        }

        UpdateResourceGroup {
            label: differs(self.label.as_ref(), Some(existing.label.as_str())),
            name: differs(self.name.as_ref(), existing.name.as_deref()),
            cs_global: differs(self.cs_global.as_ref(), existing.cs_global.as_deref()),
            pass_global: differs(self.pass_global.as_ref(), existing.pass_global.as_deref()),
            gm_masters: list_differs(self.gm_masters.as_ref(), &existing.gm_masters),
            gm_sessions: list_differs(self.gm_sessions.as_ref(), &existing.gm_sessions),
        }
    }
}

impl<C: ResourceGroupApi> Reconciler<'_, C> {
    /// Create, update or delete a resource group located by id or label.
    pub async fn ensure_resource_group(
        &self,
        spec: &ResourceGroupSpec,
    ) -> Result<Outcome<ResourceGroupRef>, CoreError> {
        let existing = self.find_resource_group(spec).await?;

        match (spec.state, existing) {
            (DesiredState::Present, None) => self.create_resource_group(spec).await,
            (DesiredState::Present, Some(group)) => {
                let changes = spec.diff(&group);
                if changes.is_empty() {
                    debug!(id = %group.id, "resource group up to date");
                    return Ok(Outcome::unchanged());
                }
                self.update_resource_group(&group.id, &changes).await
            }
            (DesiredState::Absent, Some(group)) => {
                info!(id = %group.id, "deleting resource group");
                self.mutate(
                    format!(
                        "Failed to delete the resource group {} from the DS8000 storage",
                        group.id
                    ),
                    self.client.delete_resource_group(&group.id),
                )
                .await?;
                Ok(Outcome::changed())
            }
            (DesiredState::Absent, None) => Ok(Outcome::unchanged()),
        }
    }

    async fn find_resource_group(
        &self,
        spec: &ResourceGroupSpec,
    ) -> Result<Option<ResourceGroup>, CoreError> {
        if let Some(id) = spec.id.as_deref() {
            let id = require("id", id)?;
            return lookup(self.client.get_resource_group(id)).await;
        }
        let label = require("id or label", spec.label.as_deref().unwrap_or_default())?;
        Ok(self
            .client
            .list_resource_groups()
            .await?
            .into_iter()
            .find(|g| g.label == label))
    }

    async fn create_resource_group(
        &self,
        spec: &ResourceGroupSpec,
    ) -> Result<Outcome<ResourceGroupRef>, CoreError> {
        let label = spec
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                CoreError::validation("label is required when creating a resource group")
            })?;

        let params = CreateResourceGroup {
            label: label.to_owned(),
            name: spec.name.clone(),
            id: spec.id.clone(),
        };
        info!(label, id = ?spec.id, "creating resource group");
        let created = self
            .mutate(
                format!("Failed to create the resource group {label} on the DS8000 storage"),
                self.client.create_resource_group(&params),
            )
            .await?;

        let Some(echoed) = created else {
            return Ok(Outcome::changed());
        };
        let id = match echoed.map(|g| g.id).or_else(|| spec.id.clone()) {
            Some(id) => id,
            None => self
                .client
                .list_resource_groups()
                .await?
                .into_iter()
                .find(|g| g.label == label)
                .map(|g| g.id)
                .ok_or_else(|| CoreError::not_found("resource group", label))?,
        };

        let extras = spec.extras();
        if !extras.is_empty() {
            self.update_resource_group(&id, &extras).await?;
        }
        Ok(Outcome::changed().with_fact(ResourceGroupRef { id }))
    }

    async fn update_resource_group(
        &self,
        id: &str,
        changes: &UpdateResourceGroup,
    ) -> Result<Outcome<ResourceGroupRef>, CoreError> {
        info!(id, ?changes, "updating resource group");
        self.mutate(
            format!("Failed to change the resource group {id} on the DS8000 storage"),
            self.client.update_resource_group(id, changes),
        )
        .await?;
        Ok(Outcome::changed().with_fact(ResourceGroupRef { id: id.to_owned() }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn group() -> ResourceGroup {
        serde_json::from_value(json!({
            "id": "RG1",
            "label": "prod",
            "name": "Production",
            "cs_global": "PUBLIC",
            "gm_masters": ["01", "02"],
        }))
        .unwrap()
    }

    #[test]
    fn only_requested_attributes_are_compared() {
        let spec = ResourceGroupSpec {
            label: Some("prod".into()),
            ..ResourceGroupSpec::default()
        };
        assert!(spec.diff(&group()).is_empty());
    }

    #[test]
    fn differing_attributes_are_updated() {
        let spec = ResourceGroupSpec {
            label: Some("prod".into()),
            cs_global: Some("RG1".into()),
            gm_masters: Some(vec!["02".into(), "01".into()]),
            ..ResourceGroupSpec::default()
        };
        assert_eq!(
            spec.diff(&group()),
            UpdateResourceGroup {
                cs_global: Some("RG1".into()),
                ..UpdateResourceGroup::default()
            }
        );
    }

    #[test]
    fn extras_skip_create_fields() {
        let spec = ResourceGroupSpec {
            label: Some("prod".into()),
            name: Some("Production".into()),
            ..ResourceGroupSpec::default()
        };
        assert!(spec.extras().is_empty());
    }
}
