//! Persistence of the newest snapshot record.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MigrateResult, MigrationError};
use crate::snapshot::{PreviousSnapshot, SnapshotRecord};

/// Directory, relative to the migrations directory, holding store files.
pub const STORE_DIR: &str = ".sqcmd";

/// File name of the snapshot record.
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Storage for the snapshot record of the last generated migration.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Get the raw contents of the newest record, if any.
    async fn load_latest(&self) -> MigrateResult<Option<String>>;

    /// Replace the newest record.
    async fn save(&self, record: &SnapshotRecord) -> MigrateResult<()>;

    /// Load and parse the newest record.
    ///
    /// Malformed contents are not an error; they yield
    /// [`PreviousSnapshot::Corrupt`].
    async fn previous(&self) -> MigrateResult<PreviousSnapshot> {
        let raw = self.load_latest().await?;
        Ok(PreviousSnapshot::parse(raw.as_deref()))
    }
}

/// A [`SnapshotStore`] backed by a JSON file next to the migrations.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store for the given migrations directory.
    pub fn new(migrations_dir: impl AsRef<Path>) -> Self {
        Self {
            path: migrations_dir.as_ref().join(STORE_DIR).join(SNAPSHOT_FILE),
        }
    }

    /// Create a store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load_latest(&self) -> MigrateResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MigrationError::Io(err)),
        }
    }

    async fn save(&self, record: &SnapshotRecord) -> MigrateResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            MigrationError::store(format!("cannot write {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), migration = %record.migration, "snapshot saved");
        Ok(())
    }
}
