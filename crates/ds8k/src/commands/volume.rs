//! Volume and alias command handlers.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::models::Volume;
use ds8k_core::{AliasOrder, AliasPlan, AliasSpec, LssId, Reconciler, VolumeId, VolumeSpec};

use crate::cli::{AliasArgs, GlobalOpts, VolumeArgs};
use crate::error::CliError;
use crate::output::cell;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct VolumeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    stgtype: String,
    #[tabled(rename = "Capacity")]
    cap: String,
    #[tabled(rename = "Alloc")]
    allocmethod: String,
    #[tabled(rename = "Pool")]
    pool: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Volume> for VolumeRow {
    fn from(v: &Volume) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            stgtype: cell(v.stgtype.as_deref()),
            cap: cell(v.cap.as_deref()),
            allocmethod: cell(v.allocmethod.as_deref()),
            pool: cell(v.pool.as_deref()),
            state: cell(v.state.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct AliasRow {
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Aliases")]
    aliases: String,
}

impl From<&AliasPlan> for AliasRow {
    fn from(p: &AliasPlan) -> Self {
        Self {
            base: p.base.to_string(),
            aliases: p
                .aliases
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    client: &Ds8kClient,
    args: VolumeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spec = VolumeSpec {
        name: args.name,
        ids: util::parse_all::<VolumeId>("id", &args.ids)?,
        pool: args.pool,
        capacity: args.capacity,
        capacity_type: util::parse("capacity-type", &args.capacity_type)?,
        storage_type: util::parse("storage-type", &args.storage_type)?,
        allocation: util::parse("allocation", &args.allocation)?,
        lss: args
            .lss
            .as_deref()
            .map(|l| util::parse::<LssId>("lss", l))
            .transpose()?,
        quantity: args.quantity,
        state: args.state.into(),
    };

    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_volumes(&spec)
        .await;
    util::finish(global, result, |x| VolumeRow::from(x), |v| v.id.clone())
}

pub async fn handle_alias(
    client: &Ds8kClient,
    args: AliasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spec = AliasSpec {
        bases: util::parse_all::<VolumeId>("base", &args.bases)?,
        quantity: args.quantity,
        order: util::parse::<AliasOrder>("order", &args.order)?,
        start: args
            .start
            .as_deref()
            .map(|s| util::parse::<VolumeId>("start", s))
            .transpose()?,
    };

    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_aliases(&spec)
        .await;
    util::finish(global, result, |x| AliasRow::from(x), |p| p.base.to_string())
}
