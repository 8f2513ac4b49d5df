//! Clap derive structures for the `ds8k` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled by `build.rs` for man page generation, so it
//! depends on nothing but clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ds8k -- desired-state management for IBM DS8000 storage
#[derive(Debug, Parser)]
#[command(
    name = "ds8k",
    version,
    about = "Manage IBM DS8000 storage configuration from the command line",
    long_about = "Reconcile hosts, host ports, volumes, mappings, logical subsystems\n\
        and resource groups on an IBM DS8000 toward a requested state, and\n\
        query what the array holds. Talks to the HMC REST API (default port 8452).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Array profile to use
    #[arg(long, short = 'p', env = "DS8K_PROFILE", global = true)]
    pub profile: Option<String>,

    /// HMC hostname or IP address (overrides profile)
    #[arg(long, short = 'H', env = "DS8K_HOSTNAME", global = true)]
    pub hostname: Option<String>,

    /// REST API port (overrides profile)
    #[arg(long, env = "DS8K_PORT", global = true)]
    pub port: Option<u16>,

    /// User name (overrides profile)
    #[arg(long, short = 'u', env = "DS8K_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "DS8K_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Report what would change without changing anything
    #[arg(long, alias = "dry-run", global = true)]
    pub check: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "DS8K_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "DS8K_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON report
    Json,
    /// Compact single-line JSON report
    JsonCompact,
    /// YAML report
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Requested state of the managed object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    #[default]
    Present,
    Absent,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ensure a host exists or is removed
    Host(HostArgs),

    /// Bind host ports (WWPNs) to a host, or remove them
    #[command(alias = "port")]
    HostPort(HostPortArgs),

    /// Create or delete volumes
    #[command(alias = "vol")]
    Volume(VolumeArgs),

    /// Create CKD alias volumes for base volumes
    Alias(AliasArgs),

    /// Map volumes to a host, or unmap them
    #[command(alias = "map")]
    Mapping(MappingArgs),

    /// Create or delete a CKD logical subsystem
    Lss(LssArgs),

    /// Create, update or delete a resource group
    #[command(alias = "rg")]
    ResourceGroup(ResourceGroupArgs),

    /// Query objects on the array
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HostArgs {
    /// Host name
    pub name: String,

    /// Host type, e.g. Linuxrhel, VMware, AIX
    #[arg(long, default_value = "Linuxrhel")]
    pub host_type: String,

    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOST PORTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HostPortArgs {
    /// WWPNs, with or without colons
    #[arg(required = true)]
    pub wwpns: Vec<String>,

    /// Host to bind the ports to (required when present)
    #[arg(long)]
    pub host: Option<String>,

    /// Reassign ports currently bound to another host
    #[arg(long)]
    pub force: bool,

    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VOLUMES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Volume name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Explicit volume ids (four hex digits); repeat or comma-separate
    #[arg(long = "id", value_delimiter = ',')]
    pub ids: Vec<String>,

    /// Pool id, e.g. P0
    #[arg(long)]
    pub pool: Option<String>,

    /// Capacity, in units of --capacity-type
    #[arg(long)]
    pub capacity: Option<String>,

    #[arg(long, default_value = "gib", value_parser = ["gib", "bytes", "cyl", "mod1"])]
    pub capacity_type: String,

    #[arg(long, default_value = "fb", value_parser = ["fb", "ckd"])]
    pub storage_type: String,

    /// Thin provisioning
    #[arg(long, default_value = "none", value_parser = ["none", "ese", "tse"])]
    pub allocation: String,

    /// Logical subsystem for new volumes
    #[arg(long)]
    pub lss: Option<String>,

    /// Number of volumes to create when no ids are given
    #[arg(long, default_value = "1")]
    pub quantity: u32,

    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,
}

#[derive(Debug, Args)]
pub struct AliasArgs {
    /// CKD base volume ids
    #[arg(required = true, value_delimiter = ',')]
    pub bases: Vec<String>,

    /// Aliases per base volume
    #[arg(long, default_value = "1")]
    pub quantity: u32,

    #[arg(long, default_value = "decrement", value_parser = ["increment", "decrement"])]
    pub order: String,

    /// First alias id (default: <lss>FF when decrementing)
    #[arg(long)]
    pub start: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MAPPINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MappingArgs {
    /// Host name
    #[arg(long, required = true)]
    pub host: String,

    /// Volume ids to (un)map; repeat or comma-separate
    #[arg(long = "id", value_delimiter = ',', required_unless_present = "volume_name")]
    pub ids: Vec<String>,

    /// (Un)map every volume with this name
    #[arg(long, conflicts_with = "ids")]
    pub volume_name: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LSS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LssArgs {
    /// LSS id (two hex digits)
    pub id: String,

    /// Subsystem identifier (required when present)
    #[arg(long)]
    pub ssid: Option<String>,

    /// Base control unit type
    #[arg(
        long,
        default_value = "3990-6",
        value_parser = ["3990-3", "3990-tpf", "3990-6", "bs2000"]
    )]
    pub cu_type: String,

    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCE GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceGroupArgs {
    /// Resource group id, e.g. RG1
    #[arg(long, required_unless_present = "label")]
    pub id: Option<String>,

    /// Resource group label (required on create)
    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Copy services global resource scope
    #[arg(long)]
    pub cs_global: Option<String>,

    /// Pass-through global resource scope
    #[arg(long)]
    pub pass_global: Option<String>,

    /// Global Mirror masters; comma-separate
    #[arg(long, value_delimiter = ',')]
    pub gm_masters: Option<Vec<String>>,

    /// Global Mirror sessions; comma-separate
    #[arg(long, value_delimiter = ',')]
    pub gm_sessions: Option<Vec<String>>,

    #[arg(long, value_enum, default_value_t)]
    pub state: StateArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INFO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InfoArgs {
    #[command(subcommand)]
    pub command: InfoCommand,
}

#[derive(Debug, Subcommand)]
pub enum InfoCommand {
    /// List hosts, or show one
    Hosts {
        /// Host name
        name: Option<String>,
    },

    /// List host ports, by WWPN or by host
    #[command(alias = "ports")]
    HostPorts {
        /// WWPNs
        wwpns: Vec<String>,

        /// Only ports bound to this host
        #[arg(long, conflicts_with = "wwpns")]
        host: Option<String>,
    },

    /// List volumes matching every given filter
    #[command(alias = "vols")]
    Volumes {
        /// Volumes mapped to this host
        #[arg(long)]
        host: Option<String>,

        /// Volumes in this pool
        #[arg(long)]
        pool: Option<String>,

        /// Volume ids; repeat or comma-separate
        #[arg(long = "id", value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// List pools, or show one
    Pools {
        /// Pool id
        id: Option<String>,
    },

    /// List logical subsystems
    Lss {
        /// LSS id
        id: Option<String>,

        /// Only LSSs of this type
        #[arg(long = "type", value_parser = ["fb", "ckd"])]
        lss_type: Option<String>,
    },

    /// List managed arrays, or show one
    Marrays {
        /// Array id, e.g. A0
        id: Option<String>,
    },

    /// List resource groups
    #[command(alias = "rgs")]
    ResourceGroups {
        #[arg(long)]
        id: Option<String>,

        #[arg(long, conflicts_with = "id")]
        label: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: hostname, port, scheme, username, password_env,
        /// ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
