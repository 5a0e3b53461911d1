//! CLI configuration handling.
//!
//! `sqcmd.toml` holds a `[migration]` table and optional per-environment
//! overrides under `[environments.<name>]`, whose keys replace the matching
//! `[migration]` keys when that environment is selected.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use sqcmd_migrate::config::{
    DEFAULT_EXCLUDE_ATTRIBUTES, DEFAULT_TYPE_VARIABLE, DEFAULT_VALID_ATTRIBUTES, DEFAULT_VALID_OPTIONS,
};
use sqcmd_migrate::loader::DEFAULT_FILES_FILTER;
use sqcmd_migrate::{Casing, GeneratorConfig};

use crate::error::{CliError, CliResult};

/// Default config file name (lives in project root)
pub const CONFIG_FILE_NAME: &str = "sqcmd.toml";

/// Default environment
pub const DEFAULT_ENV: &str = "development";

/// Default migrations directory (relative to project root)
pub const MIGRATIONS_DIR: &str = "migrations";

/// Default models directory (relative to project root)
pub const MODELS_DIR: &str = "models";

/// Default seeds directory (relative to project root)
pub const SEEDS_DIR: &str = "seeds";

/// sqcmd configuration for one environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Selected environment
    pub environment: String,

    /// Migration settings with the environment overrides applied
    pub migration: MigrationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENV.to_string(),
            migration: MigrationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path, environment: &str) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, environment)
    }

    /// Load `sqcmd.toml` from a project root, failing if it was never initialized
    pub fn load_project(root: &Path, environment: &str) -> CliResult<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Err(CliError::NotInitialized);
        }
        Self::load(&path, environment)
    }

    /// Parse configuration text for an environment
    pub fn parse(content: &str, environment: &str) -> CliResult<Self> {
        let mut raw: toml::Table = toml::from_str(content)?;

        let mut migration = match raw.remove("migration") {
            Some(toml::Value::Table(table)) => table,
            Some(_) => return Err(CliError::Config("[migration] must be a table".to_string())),
            None => toml::Table::new(),
        };

        let overrides = raw
            .get("environments")
            .and_then(|envs| envs.get(environment))
            .and_then(toml::Value::as_table);
        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                migration.insert(key.clone(), value.clone());
            }
        }

        let migration: MigrationConfig = toml::Value::Table(migration).try_into()?;
        Ok(Self {
            environment: environment.to_string(),
            migration,
        })
    }

    /// Engine configuration for this environment
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            valid_attributes: self.migration.valid_attributes.clone(),
            exclude_attributes: self.migration.exclude_attributes.clone(),
            valid_options: self.migration.valid_options.clone(),
            type_variable: self.migration.type_variable.clone(),
        }
    }

    /// Migrations directory under a project root
    pub fn migrations_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migration.migrations)
    }

    /// Models directory under a project root
    pub fn models_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migration.models)
    }

    /// Seeds directory under a project root
    pub fn seeds_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migration.seeds)
    }

    /// Custom templates directory under a project root, if configured
    pub fn templates_dir(&self, root: &Path) -> Option<PathBuf> {
        self.migration.templates.as_ref().map(|dir| root.join(dir))
    }
}

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Directory for migration files
    pub migrations: String,

    /// Directory for model definition files
    pub models: String,

    /// Directory for seed files
    pub seeds: String,

    /// Directory with custom templates
    pub templates: Option<String>,

    /// Regex selecting model definition files
    pub files_filter: String,

    /// Casing applied to generated file names
    #[serde(deserialize_with = "deserialize_casing")]
    pub file_names: Option<Casing>,

    /// Casing applied to model names
    #[serde(deserialize_with = "deserialize_casing")]
    pub model_names: Option<Casing>,

    /// Variable name for data types in generated code
    pub type_variable: String,

    /// Attribute keys that are compared and emitted
    pub valid_attributes: Vec<String>,

    /// Attribute keys that are always stripped
    pub exclude_attributes: Vec<String>,

    /// Table option keys that are kept
    pub valid_options: Vec<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            migrations: MIGRATIONS_DIR.to_string(),
            models: MODELS_DIR.to_string(),
            seeds: SEEDS_DIR.to_string(),
            templates: None,
            files_filter: DEFAULT_FILES_FILTER.to_string(),
            file_names: None,
            model_names: Some(Casing::First),
            type_variable: DEFAULT_TYPE_VARIABLE.to_string(),
            valid_attributes: to_strings(DEFAULT_VALID_ATTRIBUTES),
            exclude_attributes: to_strings(DEFAULT_EXCLUDE_ATTRIBUTES),
            valid_options: to_strings(DEFAULT_VALID_OPTIONS),
        }
    }
}

/// Accept a casing name, or `"none"` to disable casing
fn deserialize_casing<'de, D>(deserializer: D) -> Result<Option<Casing>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("none") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn to_strings(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}
