//! Wingman CLI entry point.

use clap::Parser;
use wingman_cli::app;
use wingman_cli::cli::Cli;
use wingman_cli::error::CliError;
use wingman_cli::resolve_config;
use wingman_storage::JsonStorage;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    wingman_logic::init_tracing(&config).map_err(|e| CliError::Tracing(e.to_string()))?;

    let storage = JsonStorage::from_config(&config);
    tracing::debug!(data_dir = %storage.dir().display(), "using data directory");
    let output = app::run(&cli.action, &storage)?;
    println!("{output}");
    Ok(())
}
