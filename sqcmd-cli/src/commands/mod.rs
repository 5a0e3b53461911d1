//! CLI command implementations.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliResult;

pub mod init;
pub mod migration;
pub mod model;
pub mod models;
pub mod seed;
pub mod version;

/// Load `sqcmd.toml` from the current directory for an environment
fn load_project(environment: &str) -> CliResult<(PathBuf, Config)> {
    let root = std::env::current_dir()?;
    let config = Config::load_project(&root, environment)?;
    tracing::debug!(root = %root.display(), environment, "configuration loaded");
    Ok((root, config))
}
