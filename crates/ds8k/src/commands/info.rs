//! Info (read-only query) handlers.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::models::{HostPort, Marray, Pool, ResourceGroup};
use ds8k_core::{
    HostPortFilter, Inventory, LssFilter, ResourceGroupFilter, VolumeFilter, VolumeId, Wwpn,
};

use crate::cli::{GlobalOpts, InfoArgs, InfoCommand};
use crate::error::CliError;
use crate::output::cell;

use super::host::HostRow;
use super::lss::LssRow;
use super::util;
use super::volume::VolumeRow;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct HostPortRow {
    #[tabled(rename = "WWPN")]
    wwpn: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Login")]
    login_type: String,
    #[tabled(rename = "WWNN")]
    wwnn: String,
}

impl From<&HostPort> for HostPortRow {
    fn from(p: &HostPort) -> Self {
        Self {
            wwpn: p.wwpn.clone(),
            host: cell(p.host.as_deref().filter(|h| !h.is_empty())),
            state: cell(p.state.as_deref()),
            login_type: cell(p.login_type.as_deref()),
            wwnn: cell(p.wwnn.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct PoolRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Type")]
    stgtype: String,
    #[tabled(rename = "Capacity")]
    cap: String,
    #[tabled(rename = "Available")]
    capavail: String,
}

impl From<&Pool> for PoolRow {
    fn from(p: &Pool) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            node: cell(p.node.as_deref()),
            stgtype: cell(p.stgtype.as_deref()),
            cap: cell(p.cap.as_deref()),
            capavail: cell(p.capavail.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct MarrayRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "RAID")]
    raidtype: String,
    #[tabled(rename = "Disk Class")]
    disk_class: String,
    #[tabled(rename = "Pool")]
    pool: String,
}

impl From<&Marray> for MarrayRow {
    fn from(m: &Marray) -> Self {
        Self {
            id: m.id.clone(),
            state: cell(m.state.as_deref()),
            raidtype: cell(m.raidtype.as_deref()),
            disk_class: cell(m.disk_class.as_deref()),
            pool: cell(m.pool.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct ResourceGroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CS Global")]
    cs_global: String,
    #[tabled(rename = "GM Masters")]
    gm_masters: String,
}

impl From<&ResourceGroup> for ResourceGroupRow {
    fn from(g: &ResourceGroup) -> Self {
        Self {
            id: g.id.clone(),
            label: g.label.clone(),
            name: cell(g.name.as_deref()),
            cs_global: cell(g.cs_global.as_deref()),
            gm_masters: g.gm_masters.join(","),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Ds8kClient,
    args: InfoArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let inventory = Inventory::new(client);

    match args.command {
        InfoCommand::Hosts { name } => {
            let result = inventory.hosts(name.as_deref()).await;
            util::show(global, result, |x| HostRow::from(x), |h| h.name.clone())
        }

        InfoCommand::HostPorts { wwpns, host } => {
            let filter = HostPortFilter {
                wwpns: util::parse_all::<Wwpn>("wwpn", &wwpns)?,
                host,
            };
            let result = inventory.host_ports(&filter).await;
            util::show(global, result, |x| HostPortRow::from(x), |p| p.wwpn.clone())
        }

        InfoCommand::Volumes { host, pool, ids } => {
            let filter = VolumeFilter {
                host,
                pool,
                ids: util::parse_all::<VolumeId>("id", &ids)?,
            };
            let result = inventory.volumes(&filter).await;
            util::show(global, result, |x| VolumeRow::from(x), |v| v.id.clone())
        }

        InfoCommand::Pools { id } => {
            let result = inventory.pools(id.as_deref()).await;
            util::show(global, result, |x| PoolRow::from(x), |p| p.id.clone())
        }

        InfoCommand::Lss { id, lss_type } => {
            let filter = LssFilter { id, lss_type };
            let result = inventory.lss(&filter).await;
            util::show(global, result, |x| LssRow::from(x), |l| l.id.clone())
        }

        InfoCommand::Marrays { id } => {
            let result = inventory.marrays(id.as_deref()).await;
            util::show(global, result, |x| MarrayRow::from(x), |m| m.id.clone())
        }

        InfoCommand::ResourceGroups { id, label } => {
            let filter = ResourceGroupFilter { id, label };
            let result = inventory.resource_groups(&filter).await;
            util::show(global, result, |x| ResourceGroupRow::from(x), |g| g.id.clone())
        }
    }
}
