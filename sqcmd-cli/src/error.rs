//! CLI error types and result alias.

use miette::Diagnostic;
use sqcmd_migrate::MigrationError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(sqcmd::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(sqcmd::config))]
    Config(String),

    /// No sqcmd.toml in the project
    #[error("Configuration file is required to use sqcmd. Use \"sqcmd init\" to initialize.")]
    #[diagnostic(code(sqcmd::not_initialized))]
    NotInitialized,

    /// sqcmd.toml already exists
    #[error("The sqcmd.toml configuration file already exists. Did you mean to overwrite with the --force flag?")]
    #[diagnostic(code(sqcmd::already_initialized))]
    AlreadyInitialized,

    /// A model with the same name is already defined
    #[error("The model {0} already exists. Use --force or -f to overwrite.")]
    #[diagnostic(code(sqcmd::model_exists))]
    ModelExists(String),

    /// Template lookup error
    #[error("Template error: {0}")]
    #[diagnostic(code(sqcmd::template))]
    Template(String),

    /// Engine error
    #[error(transparent)]
    #[diagnostic(code(sqcmd::migration))]
    Migration(#[from] MigrationError),

    /// Command error
    #[error("Command error: {0}")]
    #[diagnostic(code(sqcmd::command))]
    Command(String),
}

impl CliError {
    /// Check if this error is a usage problem reported as a warning.
    pub fn is_warning(&self) -> bool {
        match self {
            Self::NotInitialized | Self::AlreadyInitialized | Self::ModelExists(_) => true,
            Self::Migration(err) => err.is_recoverable(),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Command(format!("Failed to serialize JSON: {}", err))
    }
}
