//! Synergy CLI - Command-line interface
//!
//! Loads the configured layers, runs the spatial join, and reports or exports
//! the results.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() -> Result<()> {
    // Initialize tracing on stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Execute the command
    if let Err(err) = runtime.block_on(commands::execute(cli)) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => cli_err.display(),
            None => errors::from_anyhow(err).display(),
        }
        std::process::exit(1);
    }

    Ok(())
}
