// Endpoint groups, each an `impl Ds8kClient` block.

mod hosts;
mod host_ports;
mod lss;
mod marrays;
mod pools;
mod resource_groups;
mod tokens;
mod volumes;
