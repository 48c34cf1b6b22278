//! Stowage CLI binary.
//!
//! This binary provides command-line access to Stowage:
//! - Admit a file into a namespace
//! - Sweep or list a namespace
//! - Run the retention sweepers as a long-lived process

use clap::Parser;
use stowage::{ObservabilityConfig, Stowage, StowageConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, admit_file, list_assets, serve, sweep_now};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    init_observability(
        ObservabilityConfig::new()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let config = StowageConfig::load_from(cli.config.as_deref())?;
    let stowage = Stowage::from_config(&config)?;

    // Execute the requested command
    match cli.command {
        Commands::Admit {
            namespace,
            owner,
            mime,
            file,
        } => {
            admit_file(&stowage, &namespace, &owner, &mime, &file).await?;
        }

        Commands::Sweep { namespace } => {
            sweep_now(&stowage, namespace.as_deref()).await?;
        }

        Commands::List { namespace } => {
            list_assets(&stowage, &namespace).await?;
        }

        Commands::Serve => {
            serve(&stowage).await?;
        }
    }

    Ok(())
}
