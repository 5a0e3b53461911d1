//! # sqcmd
//!
//! Snapshot-diffing migration generator for Sequelize-style model definitions.
//!
//! sqcmd provides:
//! - Normalization of live model definitions into comparable snapshots
//! - A differ producing paired `up`/`down` operations per model
//! - A renderer emitting those operations as migration script bodies
//! - A file-backed store for the snapshot of the last generated migration
//!
//! The `sqcmd` binary lives in the `sqcmd-cli` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqcmd::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sqcmd::MigrationError> {
//!     let models = ModelLoader::new("models")
//!         .model_names(Some(Casing::First))
//!         .load()
//!         .await?;
//!
//!     let generator = MigrationGenerator::new(
//!         GeneratorConfig::default(),
//!         FileSnapshotStore::new("migrations"),
//!         MigrationFileManager::new("migrations"),
//!     );
//!
//!     let template = "up: {{up}}\ndown: {{down}}";
//!     match generator.generate("create_users", template, &models, None).await? {
//!         Generated::Written { file, plan } => {
//!             println!("{}\n{}", file.path.display(), plan.report());
//!         }
//!         Generated::NoChanges(plan) => println!("{}", plan.report()),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Migration engine: normalizers, differ, renderer and stores.
pub mod migrate {
    pub use sqcmd_migrate::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::migrate::{
        Casing, Differencer, FileSnapshotStore, Generated, GeneratorConfig, LiveModel,
        MigrationFileManager, MigrationGenerator, ModelLoader, ScriptRenderer, SnapshotStore,
        snapshot_model,
    };
}

// Re-export key types at the crate root
pub use migrate::{GeneratorConfig, MigrateResult, MigrationError, RenderError};
