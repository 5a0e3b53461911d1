//! # sqcmd-migrate
//!
//! Migration engine for sqcmd.
//!
//! This crate provides functionality for:
//! - Normalizing live ORM model definitions into comparable snapshots
//! - Diffing a model against its previous snapshot
//! - Rendering the resulting operations as `up`/`down` migration bodies
//! - Writing timestamped migration files from templates
//! - Persisting the snapshot of the last generated migration
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ Model files  │────▶│ ModelLoader  │────▶│ Normalizers    │
//! └──────────────┘     └──────────────┘     └────────────────┘
//!                                                   │
//!                      ┌──────────────┐             ▼
//!                      │ SnapshotStore│────▶┌────────────────┐
//!                      └──────────────┘     │ Differencer    │
//!                             ▲             └────────────────┘
//!                             │                     │
//!                      ┌──────────────┐     ┌────────────────┐
//!                      │ Migration    │◀────│ ScriptRenderer │
//!                      │ file + record│     └────────────────┘
//!                      └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sqcmd_migrate::{
//!     DataType, Differencer, GeneratorConfig, LiveAttribute, LiveModel, ScriptRenderer,
//!     snapshot_model,
//! };
//!
//! let config = GeneratorConfig::default();
//! let user = LiveModel::new("User")
//!     .attribute("email", LiveAttribute::new(DataType::new("STRING")));
//!
//! let current = snapshot_model(&config, &user);
//! let set = Differencer::new(&config).diff(&current, None);
//! let rendered = ScriptRenderer::new(&config).render_set(&set).unwrap();
//!
//! assert_eq!(rendered.down, "migration.dropTable('User');");
//! ```
//!
//! ## Migration Files
//!
//! Migrations are single scripts named by their creation time; the snapshot
//! of the newest one lives next to them:
//!
//! ```text
//! migrations/
//! ├── 20240101120000_create_users.js
//! ├── 20240102090000_add_age.js
//! └── .sqcmd/
//!     └── snapshot.json
//! ```

pub mod casing;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod file;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod operation;
pub mod properties;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod value;

// Re-exports
pub use casing::{Casing, str_to_case};
pub use config::GeneratorConfig;
pub use diff::Differencer;
pub use engine::{Generated, MigrationGenerator, MigrationPlan, plan};
pub use error::{MigrateResult, MigrationError, RenderError};
pub use file::{
    MigrationFile, MigrationFileManager, compute_checksum, fill_migration_template,
    fill_model_template, write_new_file,
};
pub use loader::{LiveModels, ModelLoader};
pub use model::{DataType, LiveAttribute, LiveModel};
pub use normalize::{AttributeNormalizer, OptionNormalizer, snapshot_model};
pub use operation::{Operation, OperationKind, OperationSet, Operations};
pub use properties::{PropertySpec, format_properties};
pub use render::{RenderedMigration, ScriptRenderer};
pub use snapshot::{
    AttributeRecord, ModelSnapshot, PreviousSnapshot, SnapshotRecord, SnapshotSet, TypeToken,
    supersede,
};
pub use store::{FileSnapshotStore, SnapshotStore};
pub use value::{FunctionSource, Value, ValueMap};
