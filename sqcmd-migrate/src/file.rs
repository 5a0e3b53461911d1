//! Migration file management and template substitution.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::casing::{Casing, str_to_case};
use crate::error::{MigrateResult, MigrationError};
use crate::render::RenderedMigration;

/// Extension of generated migration, model stub and seed files.
pub const MIGRATION_EXTENSION: &str = "js";

/// Inserted in place of an empty `up`/`down` body.
pub const EMPTY_MIGRATION_BODY: &str = "// add migration commands.";

/// Inserted in place of empty model properties.
pub const EMPTY_PROPERTIES: &str = "# add properties";

/// Inserted in place of empty model options.
pub const EMPTY_OPTIONS: &str = "# add getters, setters, hooks, etc.";

/// A migration file written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationFile {
    /// Path to the migration file.
    pub path: PathBuf,
    /// Migration ID (the timestamp prefix).
    pub id: String,
    /// Migration name (human readable).
    pub name: String,
    /// File contents.
    pub content: String,
    /// Checksum of the file contents.
    pub checksum: String,
}

impl MigrationFile {
    /// The file stem, `<id>_<name>`, which identifies the migration.
    pub fn identifier(&self) -> String {
        format!("{}_{}", self.id, self.name)
    }
}

/// Compute the sha256 checksum of migration content.
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fill the `{{up}}` and `{{down}}` placeholders of a migration template.
///
/// Only the first occurrence of each placeholder is replaced.
pub fn fill_migration_template(template: &str, rendered: &RenderedMigration) -> String {
    let filled = template.replacen("{{up}}", or_fallback(&rendered.up, EMPTY_MIGRATION_BODY), 1);
    filled.replacen("{{down}}", or_fallback(&rendered.down, EMPTY_MIGRATION_BODY), 1)
}

/// Fill a model template: every `{{name}}`, and the first `{{properties}}`
/// and `{{options}}`.
pub fn fill_model_template(template: &str, name: &str, properties: Option<&str>, options: Option<&str>) -> String {
    let filled = template.replacen(
        "{{properties}}",
        or_fallback(properties.unwrap_or_default(), EMPTY_PROPERTIES),
        1,
    );
    let filled = filled.replace("{{name}}", name);
    filled.replacen("{{options}}", or_fallback(options.unwrap_or_default(), EMPTY_OPTIONS), 1)
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

/// Strip a trailing `.js` from a user supplied name.
pub fn strip_extension(name: &str) -> &str {
    name.strip_suffix(".js").unwrap_or(name)
}

/// Write a new file, refusing to overwrite unless `force` is set.
pub async fn write_new_file(path: &Path, contents: &str, force: bool) -> MigrateResult<()> {
    if !force && tokio::fs::try_exists(path).await? {
        return Err(MigrationError::AlreadyExists(path.display().to_string()));
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    debug!(path = %path.display(), "file written");
    Ok(())
}

/// Migration file reader/writer.
#[derive(Debug, Clone)]
pub struct MigrationFileManager {
    /// Directory where migrations are stored.
    migrations_dir: PathBuf,
    /// Casing applied to migration names.
    file_names: Option<Casing>,
    /// Overwrite existing files.
    force: bool,
}

impl MigrationFileManager {
    /// Create a new file manager.
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
            file_names: None,
            force: false,
        }
    }

    /// Set the casing applied to migration names.
    pub fn file_names(mut self, casing: Option<Casing>) -> Self {
        self.file_names = casing;
        self
    }

    /// Allow overwriting existing files.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Ensure the migrations directory exists.
    pub async fn ensure_dir(&self) -> MigrateResult<()> {
        tokio::fs::create_dir_all(&self.migrations_dir)
            .await
            .map_err(MigrationError::Io)?;
        Ok(())
    }

    /// Generate a new migration ID.
    pub fn generate_id(&self) -> String {
        Utc::now().format("%Y%m%d%H%M%S").to_string()
    }

    /// Path of the migration file for an id and name.
    pub fn migration_path(&self, id: &str, name: &str) -> PathBuf {
        let name = str_to_case(strip_extension(name), self.file_names);
        self.migrations_dir
            .join(format!("{}_{}.{}", id, name, MIGRATION_EXTENSION))
    }

    /// Fill the template with the rendered bodies and write a new,
    /// timestamped migration file.
    pub async fn write_migration(
        &self,
        name: &str,
        template: &str,
        rendered: &RenderedMigration,
    ) -> MigrateResult<MigrationFile> {
        self.ensure_dir().await?;

        let id = self.generate_id();
        let path = self.migration_path(&id, name);
        let content = fill_migration_template(template, rendered);

        write_new_file(&path, &content, self.force).await?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| stem.split_once('_'))
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| name.to_string());

        Ok(MigrationFile {
            checksum: compute_checksum(&content),
            path,
            id,
            name,
            content,
        })
    }

    /// List the migration files on disk, oldest first.
    pub async fn list_migrations(&self) -> MigrateResult<Vec<MigrationFile>> {
        let mut migrations = Vec::new();

        if !tokio::fs::try_exists(&self.migrations_dir).await? {
            return Ok(migrations);
        }

        let mut entries = tokio::fs::read_dir(&self.migrations_dir)
            .await
            .map_err(MigrationError::Io)?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(MigrationError::Io)? {
            let path = entry.path();
            if is_migration_file(&path) {
                paths.push(path);
            }
        }

        // Timestamp prefixes sort chronologically.
        paths.sort();

        for path in paths {
            if let Ok(migration) = self.read_migration(&path).await {
                migrations.push(migration);
            }
        }

        Ok(migrations)
    }

    /// Read a migration file.
    async fn read_migration(&self, path: &Path) -> MigrateResult<MigrationFile> {
        let stem = path
            .file_stem()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MigrationError::migration_file("Invalid path"))?;

        let (id, name) = parse_migration_name(stem)?;
        let content = tokio::fs::read_to_string(path).await?;

        Ok(MigrationFile {
            path: path.to_path_buf(),
            id,
            name,
            checksum: compute_checksum(&content),
            content,
        })
    }
}

/// Check if a path looks like a migration script.
fn is_migration_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(MIGRATION_EXTENSION)
}

/// Parse a migration file stem into (id, name).
fn parse_migration_name(stem: &str) -> MigrateResult<(String, String)> {
    // Expected format: YYYYMMDDHHMMSS_name
    let Some((id, name)) = stem.split_once('_') else {
        return Err(MigrationError::migration_file(format!(
            "Invalid migration name format: {}",
            stem
        )));
    };

    if id.len() != 14 || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(MigrationError::migration_file(format!(
            "Invalid migration ID (expected timestamp): {}",
            id
        )));
    }

    Ok((id.to_string(), name.to_string()))
}
