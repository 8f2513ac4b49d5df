//! Command handlers, one module per resource kind.

pub mod config_cmd;
mod host;
mod host_port;
mod info;
mod lss;
mod mapping;
mod resource_group;
mod util;
mod volume;

use ds8k_api::Ds8kClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a connected command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &Ds8kClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Host(args) => host::handle(client, args, global).await,
        Command::HostPort(args) => host_port::handle(client, args, global).await,
        Command::Volume(args) => volume::handle(client, args, global).await,
        Command::Alias(args) => volume::handle_alias(client, args, global).await,
        Command::Mapping(args) => mapping::handle(client, args, global).await,
        Command::Lss(args) => lss::handle(client, args, global).await,
        Command::ResourceGroup(args) => resource_group::handle(client, args, global).await,
        Command::Info(args) => info::handle(client, args, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before connect"),
    }
}
