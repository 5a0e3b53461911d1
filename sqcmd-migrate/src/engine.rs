//! Migration generation: the pipeline from live models to a written
//! migration file and an updated snapshot.

use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::diff::Differencer;
use crate::error::{MigrateResult, MigrationError};
use crate::file::{MigrationFile, MigrationFileManager};
use crate::loader::LiveModels;
use crate::normalize::snapshot_model;
use crate::operation::OperationSet;
use crate::render::{RenderedMigration, ScriptRenderer};
use crate::snapshot::{ModelSnapshot, PreviousSnapshot, SnapshotRecord, supersede};
use crate::store::SnapshotStore;

/// Result of planning a migration.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationPlan {
    /// Operations for every changed model.
    pub operations: OperationSet,
    /// Names of the models that changed, in load order.
    pub touched: Vec<String>,
    /// Number of models compared.
    pub processed: usize,
    /// Fresh snapshots of the touched models.
    pub snapshots: Vec<ModelSnapshot>,
}

impl MigrationPlan {
    /// Check if no model changed.
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Get the report printed after generating a migration.
    pub fn report(&self) -> String {
        let touched = if self.touched.is_empty() {
            "No changes detected, migration will NOT be generated.".to_string()
        } else {
            format!("Models touched: {}", self.touched.join(", "))
        };
        format!(
            "{}\nProcessed: {} Touched: {}",
            touched,
            self.processed,
            self.touched.len()
        )
    }
}

/// Diff the selected models against the previous snapshot.
///
/// `selection` restricts the run to the named models; every loaded model is
/// compared when it is `None`. Naming a model that was not loaded is an error.
pub fn plan(
    config: &GeneratorConfig,
    models: &LiveModels,
    previous: &PreviousSnapshot,
    selection: Option<&[String]>,
) -> MigrateResult<MigrationPlan> {
    if let Some(selection) = selection {
        if let Some(missing) = selection.iter().find(|name| !models.contains_key(name.as_str())) {
            return Err(MigrationError::ModelNotFound(missing.clone()));
        }
    }

    let differ = Differencer::new(config);
    let mut operations = OperationSet::new();
    let mut touched = Vec::new();
    let mut snapshots = Vec::new();
    let mut processed = 0;

    for (name, model) in models {
        if selection.is_some_and(|selected| !selected.contains(name)) {
            continue;
        }
        processed += 1;

        let current = snapshot_model(config, model);
        let before = operations.up.len() + operations.down.len();
        differ.diff_into(&mut operations, &current, previous.model(name));

        if operations.up.len() + operations.down.len() > before {
            touched.push(name.clone());
            snapshots.push(current);
        }
    }

    Ok(MigrationPlan {
        operations,
        touched,
        processed,
        snapshots,
    })
}

/// Outcome of [`MigrationGenerator::generate`].
#[derive(Debug)]
pub enum Generated {
    /// Nothing changed; no file was written.
    NoChanges(MigrationPlan),
    /// A migration file was written and the snapshot saved.
    Written {
        /// The plan that was rendered.
        plan: MigrationPlan,
        /// The written file.
        file: MigrationFile,
    },
}

/// Writes migrations and keeps the snapshot store current.
pub struct MigrationGenerator<S: SnapshotStore> {
    config: GeneratorConfig,
    store: S,
    files: MigrationFileManager,
}

impl<S: SnapshotStore> MigrationGenerator<S> {
    /// Create a generator.
    pub fn new(config: GeneratorConfig, store: S, files: MigrationFileManager) -> Self {
        Self { config, store, files }
    }

    /// Load the previous snapshot, warning when migrations exist without one.
    pub async fn previous(&self) -> MigrateResult<PreviousSnapshot> {
        let previous = self.store.previous().await?;
        if previous == PreviousSnapshot::Missing {
            let existing = self.files.list_migrations().await?;
            if !existing.is_empty() {
                warn!(
                    migrations = existing.len(),
                    "migrations exist but no snapshot was found, every model is treated as new"
                );
            }
        }
        Ok(previous)
    }

    /// Diff, render and write a migration for the given models.
    pub async fn generate(
        &self,
        name: &str,
        template: &str,
        models: &LiveModels,
        selection: Option<&[String]>,
    ) -> MigrateResult<Generated> {
        let previous = self.previous().await?;
        let plan = plan(&self.config, models, &previous, selection)?;

        if plan.is_empty() {
            info!(processed = plan.processed, "no changes detected");
            return Ok(Generated::NoChanges(plan));
        }

        let rendered = ScriptRenderer::new(&self.config).render_set(&plan.operations)?;
        let file = self.files.write_migration(name, template, &rendered).await?;

        let models = supersede(previous.models(), plan.snapshots.iter().cloned());
        let record = SnapshotRecord::new(file.identifier(), file.checksum.clone(), models);
        self.store.save(&record).await?;

        info!(
            migration = %file.identifier(),
            summary = %plan.operations.summary(),
            "migration generated"
        );
        Ok(Generated::Written { plan, file })
    }

    /// Write an empty migration without diffing or touching the snapshot.
    pub async fn stub(&self, name: &str, template: &str) -> MigrateResult<MigrationFile> {
        self.files
            .write_migration(name, template, &RenderedMigration::default())
            .await
    }
}
