//! Host mapping command handler.

use tabled::Tabled;

use ds8k_api::Ds8kClient;
use ds8k_core::{MappingSpec, Reconciler, VolumeId, VolumeSelector};

use crate::cli::{GlobalOpts, MappingArgs};
use crate::error::CliError;

use super::util;

#[derive(Tabled)]
struct MappedVolumeRow {
    #[tabled(rename = "Volume")]
    volume: String,
}

pub async fn handle(
    client: &Ds8kClient,
    args: MappingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let volumes = match args.volume_name {
        Some(name) => VolumeSelector::Name(name),
        None => VolumeSelector::Ids(util::parse_all::<VolumeId>("id", &args.ids)?),
    };
    let spec = MappingSpec {
        host: args.host,
        volumes,
        state: args.state.into(),
    };

    let result = Reconciler::new(client)
        .check_mode(global.check)
        .ensure_mapping(&spec)
        .await;
    util::finish(
        global,
        result,
        |id: &String| MappedVolumeRow { volume: id.clone() },
        Clone::clone,
    )
}
