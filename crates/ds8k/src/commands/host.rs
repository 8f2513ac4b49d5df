//! Host command handler.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::models::Host;
use ds8k_core::{HostSpec, Reconciler};

use crate::cli::{GlobalOpts, HostArgs};
use crate::error::CliError;
use crate::output::cell;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct HostRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    host_type: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Addr Mode")]
    addrmode: String,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            name: h.name.clone(),
            host_type: cell(h.hosttype.as_deref()),
            state: cell(h.state.as_deref()),
            addrmode: cell(h.addrmode.as_deref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Ds8kClient,
    args: HostArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spec = HostSpec {
        name: args.name,
        host_type: args.host_type,
        state: args.state.into(),
    };
    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_host(&spec)
        .await;
    util::finish(global, result, |x| HostRow::from(x), |h| h.name.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Command};

    #[test]
    fn host_type_defaults_to_core_default() {
        let cli = Cli::try_parse_from(["ds8k", "host", "h1"]).unwrap();
        let Command::Host(args) = cli.command else {
            panic!("expected host command");
        };
        assert_eq!(args.host_type, ds8k_core::DEFAULT_HOST_TYPE);
        assert_eq!(args.host_type, "Linuxrhel");
    }
}
