mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ds8k_api::Ds8kClient;
use ds8k_core::Array;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ds8k", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config()?;
            config::apply_output_default(&mut cli.global, &cfg);
            let client = connect(&cli.global, &cfg).await?;

            tracing::debug!(command = ?cmd, check = cli.global.check, "dispatching command");
            commands::dispatch(cmd, &client, &cli.global).await
        }
    }
}

async fn connect(global: &GlobalOpts, cfg: &config::Config) -> Result<Ds8kClient, CliError> {
    let array = config::resolve_array_config(global, cfg)?;
    Array::connect(&array).await.map_err(|e| match CliError::from(e) {
        CliError::AuthFailed { message, .. } => CliError::AuthFailed {
            profile: config::active_profile_name(global, cfg),
            message,
        },
        other => other,
    })
}
