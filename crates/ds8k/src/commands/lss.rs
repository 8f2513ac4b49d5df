//! Logical subsystem command handler.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::models::Lss;
use ds8k_core::{CuType, LssId, LssSpec, Reconciler};

use crate::cli::{GlobalOpts, LssArgs};
use crate::error::CliError;
use crate::output::cell;

use super::util;

#[derive(Tabled)]
pub(super) struct LssRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    lss_type: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "CU Type")]
    cu_type: String,
    #[tabled(rename = "Volumes")]
    configvols: String,
}

impl From<&Lss> for LssRow {
    fn from(l: &Lss) -> Self {
        Self {
            id: l.id.clone(),
            lss_type: l.lss_type.clone(),
            group: cell(l.group.as_deref()),
            ssid: cell(l.sub_system_identifier.as_deref()),
            cu_type: cell(l.ckd_base_cu_type.as_deref()),
            configvols: cell(l.configvols.as_deref()),
        }
    }
}

pub async fn handle(
    client: &Ds8kClient,
    args: LssArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spec = LssSpec {
        id: util::parse::<LssId>("id", &args.id)?,
        ssid: args.ssid,
        cu_type: util::parse::<CuType>("cu-type", &args.cu_type)?,
        state: args.state.into(),
    };

    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_lss(&spec)
        .await;
    util::finish(global, result, |x| LssRow::from(x), |l| l.id.clone())
}
