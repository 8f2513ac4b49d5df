//! Host port command handler.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::{DesiredState, HostPortSpec, Reconciler, Wwpn};

use crate::cli::{GlobalOpts, HostPortArgs};
use crate::error::CliError;

use super::util;

#[derive(Tabled)]
struct ChangedPortRow {
    #[tabled(rename = "WWPN")]
    wwpn: String,
}

pub async fn handle(
    client: &Ds8kClient,
    args: HostPortArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let state: DesiredState = args.state.into();
    if state == DesiredState::Present && args.host.is_none() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "--host is required when state is present".into(),
        });
    }

    let wwpns = util::parse_all::<Wwpn>("wwpn", &args.wwpns)?;
    let spec = HostPortSpec::new(args.host.unwrap_or_default(), wwpns)
        .force(args.force)
        .state(state);

    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_host_ports(&spec)
        .await;
    util::finish(
        global,
        result,
        |w| ChangedPortRow {
            wwpn: w.to_string(),
        },
        ToString::to_string,
    )
}
