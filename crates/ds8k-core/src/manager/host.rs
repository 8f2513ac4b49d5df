use ds8k_api::models::{CreateHost, Host};
use tracing::info;

use super::{Reconciler, require};
use crate::backend::HostApi;
use crate::error::CoreError;
use crate::lookup::lookup;
use crate::outcome::Outcome;
use crate::state::DesiredState;

pub const DEFAULT_HOST_TYPE: &str = "Linuxrhel";

#[derive(Debug, Clone)]
pub struct HostSpec {
    pub name: String,
    pub host_type: String,
    pub state: DesiredState,
}

impl HostSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host_type: DEFAULT_HOST_TYPE.into(),
            state: DesiredState::Present,
        }
    }

    pub fn state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }
}

impl<C: HostApi> Reconciler<'_, C> {
    /// Create or delete a host by name.
    pub async fn ensure_host(&self, spec: &HostSpec) -> Result<Outcome<Host>, CoreError> {
        let name = require("name", &spec.name)?;
        let existing = lookup(self.client.get_host(name)).await?;

        match (spec.state, existing) {
            (DesiredState::Present, None) => {
                info!(name, host_type = %spec.host_type, "host missing, creating");
                let params = CreateHost {
                    name: name.to_owned(),
                    hosttype: spec.host_type.clone(),
                };
                let created = self
                    .mutate(
                        format!("Failed to create the host {name} on the DS8000 storage"),
                        self.client.create_host(&params),
                    )
                    .await?
                    .flatten();

                let mut outcome = Outcome::changed();
                if let Some(host) = created {
                    outcome = outcome.with_fact(host);
                } else if !self.is_check_mode() {
                    if let Some(host) = lookup(self.client.get_host(name)).await? {
                        outcome = outcome.with_fact(host);
                    }
                }
                Ok(outcome)
            }
            (DesiredState::Absent, Some(_)) => {
                info!(name, "host present, deleting");
                self.mutate(
                    format!("Failed to delete the host {name} from the DS8000 storage"),
                    self.client.delete_host(name),
                )
                .await?;
                Ok(Outcome::changed())
            }
            (DesiredState::Present, Some(_)) | (DesiredState::Absent, None) => {
                Ok(Outcome::unchanged())
            }
        }
    }
}
