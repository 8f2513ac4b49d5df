use ds8k_api::models::{CreateHostPort, HostPort, UpdateHostPort};
use tracing::{debug, info, warn};

use super::{Reconciler, require};
use crate::backend::{HostApi, HostPortApi};
use crate::error::{CoreError, api_message};
use crate::ids::Wwpn;
use crate::lookup::{lookup, verify};
use crate::outcome::Outcome;
use crate::state::DesiredState;

#[derive(Debug, Clone)]
pub struct HostPortSpec {
    /// Target host; required when `state` is present.
    pub host: String,
    pub wwpns: Vec<Wwpn>,
    /// Reassign ports currently bound to a different host.
    pub force: bool,
    pub state: DesiredState,
}

impl HostPortSpec {
    pub fn new(host: impl Into<String>, wwpns: impl IntoIterator<Item = Wwpn>) -> Self {
        Self {
            host: host.into(),
            wwpns: wwpns.into_iter().collect(),
            force: false,
            state: DesiredState::Present,
        }
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }
}

/// What to do with one WWPN.
#[derive(Debug, PartialEq, Eq)]
enum PortAction {
    Create,
    Assign,
    Keep,
}

fn plan_port(
    wwpn: &Wwpn,
    host: &str,
    existing: Option<&HostPort>,
    force: bool,
) -> Result<PortAction, CoreError> {
    let Some(port) = existing else {
        return Ok(PortAction::Create);
    };
    match port.host.as_deref() {
        Some(bound) if bound == host => Ok(PortAction::Keep),
        None if port.is_unconfigured() => Ok(PortAction::Assign),
        _ if force => Ok(PortAction::Assign),
        other => Err(CoreError::Conflict {
            message: format!(
                "The WWPN {wwpn} is assigned to another host ({}) on the DS8000 storage. \
                 Use force to assign it to {host}.",
                other.unwrap_or("none")
            ),
        }),
    }
}

impl<C: HostApi + HostPortApi> Reconciler<'_, C> {
    /// Bind WWPNs to a host, or delete them.
    ///
    /// Facts are the WWPNs that were (or would be) changed.
    pub async fn ensure_host_ports(
        &self,
        spec: &HostPortSpec,
    ) -> Result<Outcome<Wwpn>, CoreError> {
        if spec.wwpns.is_empty() {
            return Err(CoreError::validation("at least one host port is required"));
        }
        match spec.state {
            DesiredState::Present => self.host_ports_present(spec).await,
            DesiredState::Absent => self.host_ports_absent(spec).await,
        }
    }

    async fn host_ports_present(&self, spec: &HostPortSpec) -> Result<Outcome<Wwpn>, CoreError> {
        let host = require("host", &spec.host)?;
        verify("host", host, self.client.get_host(host)).await?;

        let mut outcome = Outcome::unchanged();
        for wwpn in &spec.wwpns {
            let existing = lookup(self.client.get_host_port(wwpn.as_str())).await?;
            match plan_port(wwpn, host, existing.as_ref(), spec.force)? {
                PortAction::Keep => debug!(%wwpn, host, "host port already bound"),
                PortAction::Create => {
                    info!(%wwpn, host, "host port missing, creating");
                    let params = CreateHostPort {
                        wwpn: wwpn.to_string(),
                        host: host.to_owned(),
                    };
                    self.mutate(
                        format!("Failed to create the host port {wwpn} on the DS8000 storage"),
                        self.client.create_host_port(&params),
                    )
                    .await?;
                    outcome.absorb(Outcome::changed().with_fact(wwpn.clone()));
                }
                PortAction::Assign => {
                    let from = existing.and_then(|p| p.host);
                    info!(%wwpn, host, ?from, "assigning host port");
                    self.assign_port(wwpn, host).await?;
                    outcome.absorb(Outcome::changed().with_fact(wwpn.clone()));
                }
            }
        }
        Ok(outcome)
    }

    async fn assign_port(&self, wwpn: &Wwpn, host: &str) -> Result<(), CoreError> {
        if self.is_check_mode() {
            warn!(%wwpn, host, "check mode: skipping host port assignment");
            return Ok(());
        }
        let params = UpdateHostPort {
            host: host.to_owned(),
        };
        // The array answers 400 when it does not know the WWPN.
        self.client
            .update_host_port(wwpn.as_str(), &params)
            .await
            .map_err(|e| {
                if e.is_bad_request() {
                    CoreError::OperationFailed {
                        context: format!("This WWPN {wwpn} not found"),
                        message: api_message(&e),
                    }
                } else {
                    CoreError::operation(
                        format!("Failed to assign the WWPN {wwpn} to the host {host}"),
                        &e,
                    )
                }
            })
    }

    async fn host_ports_absent(&self, spec: &HostPortSpec) -> Result<Outcome<Wwpn>, CoreError> {
        let mut outcome = Outcome::unchanged();
        for wwpn in &spec.wwpns {
            if lookup(self.client.get_host_port(wwpn.as_str())).await?.is_none() {
                continue;
            }
            info!(%wwpn, "host port present, deleting");
            self.mutate(
                format!("Failed to delete the host port {wwpn} from the DS8000 storage"),
                self.client.delete_host_port(wwpn.as_str()),
            )
            .await?;
            outcome.absorb(Outcome::changed().with_fact(wwpn.clone()));
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn port(host: Option<&str>) -> HostPort {
        let state = if host.is_some() { "logged in" } else { "unconfigured" };
        port_in_state(host, state)
    }

    fn port_in_state(host: Option<&str>, state: &str) -> HostPort {
        serde_json::from_value(serde_json::json!({
            "wwpn": "1000",
            "state": state,
            "host": host.unwrap_or(""),
        }))
        .unwrap()
    }

    #[test]
    fn plan_covers_every_binding() {
        let wwpn = Wwpn::new("1000").unwrap();
        assert_eq!(plan_port(&wwpn, "h1", None, false).unwrap(), PortAction::Create);
        assert_eq!(
            plan_port(&wwpn, "h1", Some(&port(Some("h1"))), false).unwrap(),
            PortAction::Keep
        );
        assert_eq!(
            plan_port(&wwpn, "h1", Some(&port(None)), false).unwrap(),
            PortAction::Assign
        );
        assert_eq!(
            plan_port(&wwpn, "h1", Some(&port(Some("h2"))), true).unwrap(),
            PortAction::Assign
        );
    }

    #[test]
    fn bound_elsewhere_without_force_names_the_host() {
        let wwpn = Wwpn::new("1000").unwrap();
        let err = plan_port(&wwpn, "h1", Some(&port(Some("h2"))), false).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert!(err.to_string().contains("(h2)"), "{err}");
    }

    #[test]
    fn host_binding_is_exact() {
        let wwpn = Wwpn::new("1000").unwrap();
        // "h1" is a substring of "h10" but a different host.
        assert!(plan_port(&wwpn, "h1", Some(&port(Some("h10"))), false).is_err());
    }

    #[test]
    fn unbound_but_configured_port_needs_force() {
        let wwpn = Wwpn::new("1000").unwrap();
        let logged_in = port_in_state(None, "logged in");
        assert!(logged_in.host.is_none());

        let err = plan_port(&wwpn, "h1", Some(&logged_in), false).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert!(err.to_string().contains("Use force"), "{err}");

        assert_eq!(
            plan_port(&wwpn, "h1", Some(&logged_in), true).unwrap(),
            PortAction::Assign
        );
    }
}
