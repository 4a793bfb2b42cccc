use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use anfctl_core::ProvisionConfig;
use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute_command(&cli).await {
        e.print_diagnostic();
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins; otherwise -v count sets the level
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "anfctl=warn,anfctl_core=warn",
            1 => "anfctl=info,anfctl_core=info",
            2 => "anfctl=debug,anfctl_core=debug",
            _ => "anfctl=trace,anfctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return Ok(());
    }

    let config = load_config(cli)?;
    info!(
        "Loaded configuration for subscription {} in {}",
        config.subscription_id, config.location
    );

    match &cli.command {
        Commands::Provision(args) => commands::provision::run(&config, args, cli.output).await,
        Commands::Teardown(args) => commands::teardown::run(&config, args).await,
        Commands::Status => commands::status::run(&config, cli.output).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

fn load_config(cli: &Cli) -> Result<ProvisionConfig> {
    let config = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        ProvisionConfig::load_from_path(&path)?
    } else {
        debug!("Loading config from default location");
        ProvisionConfig::load()?
    };
    Ok(config)
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
