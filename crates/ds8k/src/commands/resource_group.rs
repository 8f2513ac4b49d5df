//! Resource group command handler.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::{Reconciler, ResourceGroupRef, ResourceGroupSpec};

use crate::cli::{GlobalOpts, ResourceGroupArgs};
use crate::error::CliError;

use super::util;

#[derive(Tabled)]
struct ResourceGroupRefRow {
    #[tabled(rename = "ID")]
    id: String,
}

pub async fn handle(
    client: &Ds8kClient,
    args: ResourceGroupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spec = ResourceGroupSpec {
        id: args.id,
        label: args.label,
        name: args.name,
        cs_global: args.cs_global,
        pass_global: args.pass_global,
        gm_masters: args.gm_masters,
        gm_sessions: args.gm_sessions,
        state: args.state.into(),
    };

    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_resource_group(&spec)
        .await;
    util::finish(
        global,
        result,
        |r: &ResourceGroupRef| ResourceGroupRefRow { id: r.id.clone() },
        |r| r.id.clone(),
    )
}
