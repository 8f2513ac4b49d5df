use ds8k_api::models::{CreateLss, Lss};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Reconciler, require};
use crate::backend::LssApi;
use crate::error::CoreError;
use crate::ids::LssId;
use crate::lookup::lookup;
use crate::outcome::Outcome;
use crate::state::DesiredState;

/// Only CKD logical subsystems are created explicitly; FB ones appear
/// implicitly with their first volume.
const LSS_TYPE: &str = "ckd";

/// Base control unit type of a CKD logical subsystem.
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
    strum::VariantNames,
)]
pub enum CuType {
    #[serde(rename = "3990-3")]
    #[strum(serialize = "3990-3")]
    Cu3990_3,
    #[serde(rename = "3990-tpf")]
    #[strum(serialize = "3990-tpf")]
    Cu3990Tpf,
    #[default]
    #[serde(rename = "3990-6")]
    #[strum(serialize = "3990-6")]
    Cu3990_6,
    #[serde(rename = "bs2000")]
    #[strum(serialize = "bs2000")]
    Bs2000,
}

#[derive(Debug, Clone)]
pub struct LssSpec {
    pub id: LssId,
    /// Subsystem identifier; required when present.
    pub ssid: Option<String>,
    pub cu_type: CuType,
    pub state: DesiredState,
}

impl LssSpec {
    pub fn new(id: LssId) -> Self {
        Self {
            id,
            ssid: None,
            cu_type: CuType::default(),
            state: DesiredState::Present,
        }
    }

    pub fn ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = Some(ssid.into());
        self
    }

    pub fn state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }
}

impl<C: LssApi> Reconciler<'_, C> {
    /// Create a CKD logical subsystem, or delete one.
    ///
    /// An existing LSS is never altered: a type, ssid or CU type that
    /// differs from the request is a conflict.
    pub async fn ensure_lss(&self, spec: &LssSpec) -> Result<Outcome<Lss>, CoreError> {
        let id = spec.id.to_string();
        let existing = lookup(self.client.get_lss(&id)).await?;

        match spec.state {
            DesiredState::Present => {
                let ssid = require("ssid", spec.ssid.as_deref().unwrap_or_default())?;
                match existing {
                    Some(lss) => {
                        check_existing(&lss, ssid, spec.cu_type)?;
                        debug!(id, "LSS already present");
                        Ok(Outcome::unchanged())
                    }
                    None => self.create_lss(&id, ssid, spec.cu_type).await,
                }
            }
            DesiredState::Absent => {
                if existing.is_none() {
                    return Ok(Outcome::unchanged());
                }
                info!(id, "deleting LSS");
                self.mutate(
                    format!("Failed to delete the lss {id} from DS8000 storage"),
                    self.client.delete_lss(&id),
                )
                .await?;
                Ok(Outcome::changed())
            }
        }
    }

    async fn create_lss(
        &self,
        id: &str,
        ssid: &str,
        cu_type: CuType,
    ) -> Result<Outcome<Lss>, CoreError> {
        let params = CreateLss {
            id: id.to_owned(),
            lss_type: LSS_TYPE.to_owned(),
            sub_system_identifier: ssid.to_owned(),
            ckd_base_cu_type: cu_type.to_string(),
        };
        info!(id, ssid, %cu_type, "creating LSS");
        let created = self
            .mutate(
                "Failed to create lss on DS8000 storage",
                self.client.create_lss(&params),
            )
            .await?;

        let mut outcome = Outcome::changed();
        if created.is_some() {
            if let Some(lss) = lookup(self.client.get_lss(id)).await? {
                outcome = outcome.with_fact(lss);
            }
        }
        Ok(outcome)
    }
}

fn check_existing(lss: &Lss, ssid: &str, cu_type: CuType) -> Result<(), CoreError> {
    if !lss.lss_type.eq_ignore_ascii_case(LSS_TYPE) {
        return Err(CoreError::Conflict {
            message: format!(
                "The lss {} exists but is not the type {LSS_TYPE} ({})",
                lss.id, lss.lss_type
            ),
        });
    }

    let actual_ssid = lss.sub_system_identifier.as_deref().unwrap_or_default();
    let actual_cu = lss.ckd_base_cu_type.as_deref().unwrap_or_default();
    if !actual_ssid.eq_ignore_ascii_case(ssid) || actual_cu != cu_type.to_string() {
        return Err(CoreError::Conflict {
            message: format!(
                "The lss {} exists but is not the requested ssid {ssid} ({actual_ssid}) or cu_type {cu_type} ({actual_cu})",
                lss.id
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lss(value: serde_json::Value) -> Lss {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn cu_type_names() {
        assert_eq!(CuType::default().to_string(), "3990-6");
        assert_eq!("3990-tpf".parse::<CuType>().unwrap(), CuType::Cu3990Tpf);
        assert!("3390".parse::<CuType>().is_err());
    }

    #[test]
    fn matching_lss_passes() {
        let existing = lss(json!({
            "id": "20", "type": "ckd",
            "sub_system_identifier": "2000", "ckd_base_cu_type": "3990-6"
        }));
        assert!(check_existing(&existing, "2000", CuType::Cu3990_6).is_ok());
    }

    #[test]
    fn fb_lss_conflicts() {
        let existing = lss(json!({"id": "10", "type": "fb"}));
        let err = check_existing(&existing, "1000", CuType::default()).unwrap_err();
        assert!(err.to_string().contains("not the type ckd (fb)"), "{err}");
    }

    #[test]
    fn differing_ssid_conflicts() {
        let existing = lss(json!({
            "id": "20", "type": "ckd",
            "sub_system_identifier": "2001", "ckd_base_cu_type": "3990-6"
        }));
        let err = check_existing(&existing, "2000", CuType::Cu3990_6).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert!(err.to_string().contains("ssid 2000 (2001)"), "{err}");
    }
}
