//! Error types for the CLI.

use wingman_core::{RoleParseError, StorageError, WingmanError};
use wingman_logic::CommandError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] WingmanError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Role(#[from] RoleParseError),
    #[error("Failed to initialize logging: {0}")]
    Tracing(String),
}
