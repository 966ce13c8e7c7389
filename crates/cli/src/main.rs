//! Contract Manager Command Line Interface
//!
//! Operates a registry held in a local snapshot file. The `--caller` flag is
//! the authenticated identity of each call and is trusted as given.

mod commands;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use contract_manager_registry::{Address, CallOutcome, RegistryCall};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::CliConfig;

#[derive(Parser)]
#[command(name = "contract-manager")]
#[command(about = "Whitelist-gated contract registry", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Registry state file
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format: pretty or json
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new registry state owned by OWNER
    Deploy {
        #[arg(long)]
        owner: Address,
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },
    /// Add ADDRESS to the whitelist (owner only)
    Whitelist {
        #[arg(long)]
        caller: Address,
        address: Address,
    },
    /// Set the description for KEY
    Add {
        #[arg(long)]
        caller: Address,
        key: Address,
        description: String,
    },
    /// Replace the description of an existing KEY
    Update {
        #[arg(long)]
        caller: Address,
        key: Address,
        description: String,
    },
    /// Clear the description for KEY
    Remove {
        #[arg(long)]
        caller: Address,
        key: Address,
    },
    /// Print the owner
    Owner,
    /// Print the description for KEY (empty if absent)
    Get { key: Address },
    /// List all present entries
    List,
    /// List whitelisted addresses
    Whitelisted,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.state, cli.log_level, cli.log_format)?;
    init_logging(&config)?;

    let state = config.state_path.as_path();
    match cli.command {
        Commands::Deploy { owner, force } => {
            commands::deploy(state, owner, force)?;
            println!("Deployed, owner {}", owner);
        }
        Commands::Whitelist { caller, address } => {
            commands::submit(state, caller, RegistryCall::AddAddressToWhiteList { address })?;
            println!("Whitelisted {}", address);
        }
        Commands::Add {
            caller,
            key,
            description,
        } => {
            commands::submit(state, caller, RegistryCall::AddContract { key, description })?;
            println!("Added {}", key);
        }
        Commands::Update {
            caller,
            key,
            description,
        } => {
            commands::submit(
                state,
                caller,
                RegistryCall::UpdateContractDesc { key, description },
            )?;
            println!("Updated {}", key);
        }
        Commands::Remove { caller, key } => {
            commands::submit(state, caller, RegistryCall::RemoveContract { key })?;
            println!("Removed {}", key);
        }
        Commands::Owner => print_outcome(commands::query(state, RegistryCall::Owner)?),
        Commands::Get { key } => {
            print_outcome(commands::query(state, RegistryCall::Contracts { key })?)
        }
        Commands::List => {
            for (key, description) in commands::list(state)? {
                println!("{}\t{}", key, description);
            }
        }
        Commands::Whitelisted => {
            for address in commands::whitelisted(state)? {
                println!("{}", address);
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: CallOutcome) {
    match outcome {
        CallOutcome::Ok => {}
        CallOutcome::Owner(owner) => println!("{}", owner),
        CallOutcome::Description(description) => println!("{}", description),
    }
}

fn init_logging(config: &CliConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so command output stays pipeable.
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
