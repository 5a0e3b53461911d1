//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_ENV;

/// sqcmd - Migration generator for Sequelize-style models
#[derive(Parser, Debug)]
#[command(name = "sqcmd")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "sqcmd - Migration generator for Sequelize-style models", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration environment to use
    #[arg(long, global = true, env = "SQCMD_ENV", default_value = DEFAULT_ENV)]
    pub env: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize sqcmd.toml and the models, migrations and seeds directories
    #[command(alias = "initialize")]
    Init(InitArgs),

    /// Generate a model definition file
    #[command(aliases = ["addModel", "createModel", "newModel", "generateModel"])]
    Model(ModelArgs),

    /// Generate a migration from model changes since the last migration
    #[command(aliases = ["addMigration", "createMigration", "newMigration", "generateMigration"])]
    Migration(MigrationArgs),

    /// Generate a seed stub
    #[command(aliases = ["addSeed", "createSeed", "newSeed", "generateSeed"])]
    Seed(SeedArgs),

    /// Show the normalized snapshot of every model
    Models(ModelsArgs),

    /// Display version information
    Version,
}

// =============================================================================
// Init Command
// =============================================================================

/// Arguments for the `init` command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing sqcmd.toml
    #[arg(short, long)]
    pub force: bool,
}

// =============================================================================
// Model Command
// =============================================================================

/// Arguments for the `model` command
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Name of the model
    pub name: String,

    /// Properties as `name[:type][:key=value...]`, e.g. `age:integer:allowNull=false`
    pub properties: Vec<String>,

    /// Sub-path under the models directory
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Template name (file name without extension)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

// =============================================================================
// Migration Command
// =============================================================================

/// Arguments for the `migration` command
#[derive(Args, Debug)]
pub struct MigrationArgs {
    /// Name of the migration
    pub name: String,

    /// Only diff these models (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub model: Vec<String>,

    /// Write an empty migration without diffing
    #[arg(short, long)]
    pub stub: bool,

    /// Template name (file name without extension)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

// =============================================================================
// Seed Command
// =============================================================================

/// Arguments for the `seed` command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Name of the seed
    pub name: String,

    /// Sub-path under the seeds directory
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Template name (file name without extension)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

// =============================================================================
// Models Command
// =============================================================================

/// Arguments for the `models` command
#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Print snapshots as JSON
    #[arg(long)]
    pub json: bool,
}
