//! Wingman CLI library exports.

pub mod app;
pub mod cli;
pub mod error;
pub mod report;

use wingman_core::WingmanConfig;

/// Resolve the configuration for `cli`: file and environment first, then
/// command-line overrides.
pub fn resolve_config(cli: &cli::Cli) -> Result<WingmanConfig, error::CliError> {
    let mut config = WingmanConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    config.validate().map_err(wingman_core::WingmanError::from)?;
    Ok(config)
}
