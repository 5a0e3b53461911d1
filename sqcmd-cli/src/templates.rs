//! Builtin file templates and lookup of custom ones.
//!
//! A `--template <name>` is resolved against the configured templates
//! directory first. The default names fall back to the templates compiled
//! into the binary.

use std::path::Path;

use tracing::debug;

use crate::error::{CliError, CliResult};

/// Template written by `sqcmd init`
pub const CONFIG_TEMPLATE: &str = include_str!("../templates/sqcmd.toml");

const MIGRATION_TEMPLATE: &str = include_str!("../templates/migration.js");
const MODEL_TEMPLATE: &str = include_str!("../templates/model.toml");
const SEED_TEMPLATE: &str = include_str!("../templates/seed.js");

/// Kinds of generated files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Migration script
    Migration,
    /// Model definition
    Model,
    /// Seed script
    Seed,
}

impl TemplateKind {
    /// Name used when no `--template` is given
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Migration => "migration",
            Self::Model => "model",
            Self::Seed => "seed",
        }
    }

    /// Extension of template and generated files
    pub fn extension(self) -> &'static str {
        match self {
            Self::Model => "toml",
            Self::Migration | Self::Seed => "js",
        }
    }

    fn builtin(self) -> &'static str {
        match self {
            Self::Migration => MIGRATION_TEMPLATE,
            Self::Model => MODEL_TEMPLATE,
            Self::Seed => SEED_TEMPLATE,
        }
    }
}

/// Resolve a template by kind and optional name.
pub fn load(kind: TemplateKind, name: Option<&str>, templates_dir: Option<&Path>) -> CliResult<String> {
    let name = name.unwrap_or(kind.default_name());
    let name = name
        .strip_suffix(&format!(".{}", kind.extension()))
        .unwrap_or(name);

    if let Some(dir) = templates_dir {
        let path = dir.join(format!("{}.{}", name, kind.extension()));
        if path.is_file() {
            debug!(template = %path.display(), "using custom template");
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    if name == kind.default_name() {
        return Ok(kind.builtin().to_string());
    }

    Err(CliError::Template(match templates_dir {
        Some(dir) => format!(
            "template '{}' not found in {}",
            name,
            dir.display()
        ),
        None => format!(
            "template '{}' requires a templates directory in sqcmd.toml",
            name
        ),
    }))
}
