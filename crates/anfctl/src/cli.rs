//! CLI structure and command definitions

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::output::OutputFormat;

/// Azure NetApp Files dual-protocol provisioning CLI
#[derive(Parser, Debug)]
#[command(name = "anfctl")]
#[command(
    version,
    about = "Provision and tear down Azure NetApp Files dual-protocol volumes"
)]
#[command(long_about = "
Provision and tear down Azure NetApp Files dual-protocol volumes

The provision command walks the resource hierarchy top-down:
    NetApp account (with Active Directory connection)
      -> capacity pool
        -> volume exposed over both CIFS and NFSv3

Each step reuses the resource when it already exists. Teardown walks the
hierarchy bottom-up and confirms each deletion before moving on.

EXAMPLES:
    # Provision account, pool, and dual-protocol volume
    anfctl provision

    # Same, with an explicit config file and JSON output
    anfctl provision --config-file ./anfctl.toml -o json

    # Check what exists
    anfctl status

    # Delete everything, skipping the confirmation prompt
    anfctl teardown --yes

Credentials come from AZURE_TENANT_ID/AZURE_CLIENT_ID/AZURE_CLIENT_SECRET,
falling back to the Azure CLI (az login).
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ANFCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the account, capacity pool, and dual-protocol volume
    Provision(ProvisionArgs),

    /// Delete the volume, capacity pool, and account, in that order
    Teardown(TeardownArgs),

    /// Show which resources exist and their provisioning states
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Polling knobs shared by the waiting commands
#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    /// Maximum time to wait per resource, in seconds
    #[arg(long, default_value = "1800")]
    pub wait_timeout: u64,

    /// Polling interval in seconds
    #[arg(long, default_value = "10")]
    pub wait_interval: u64,
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Args, Debug)]
pub struct TeardownArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}
