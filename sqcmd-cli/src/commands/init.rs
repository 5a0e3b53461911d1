//! `sqcmd init` command - Write sqcmd.toml and create the project directories.

use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE_NAME, Config, DEFAULT_ENV};
use crate::error::{CliError, CliResult};
use crate::output::{self, success};
use crate::templates::CONFIG_TEMPLATE;

/// Run the init command
pub async fn run(args: InitArgs) -> CliResult<()> {
    let root = args.path;
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !args.force {
        return Err(CliError::AlreadyInitialized);
    }

    output::header("Initialize sqcmd");

    tokio::fs::create_dir_all(&root).await?;
    tokio::fs::write(&config_path, CONFIG_TEMPLATE).await?;

    let config = Config::parse(CONFIG_TEMPLATE, DEFAULT_ENV)?;
    let dirs = [
        config.migrations_dir(&root),
        config.models_dir(&root),
        config.seeds_dir(&root),
    ];
    for dir in &dirs {
        tokio::fs::create_dir_all(dir).await?;
    }

    success("sqcmd successfully initialized.");
    output::newline();

    output::section("Created");
    output::list_item(&config_path.display().to_string());
    for dir in &dirs {
        output::list_item(&format!("{}/", dir.display()));
    }

    Ok(())
}
