//! Integration tests for the model -> snapshot -> migration pipeline.
//!
//! Models are written as TOML files, loaded, diffed against the stored
//! snapshot and rendered into migration files, the way the CLI drives it.

use std::path::Path;

use pretty_assertions::assert_eq;
use sqcmd::migrate::{
    DataType, Differencer, FileSnapshotStore, Generated, GeneratorConfig, LiveAttribute, LiveModel,
    MigrationFile, MigrationFileManager, MigrationGenerator, ModelLoader, OperationKind,
    ScriptRenderer, Value, snapshot_model,
};
use tempfile::TempDir;

const TEMPLATE: &str = "up:\n\t\t{{up}}\ndown:\n\t\t{{down}}\n";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write_model(&self, file: &str, content: &str) {
        let models = self.dir.path().join("models");
        std::fs::create_dir_all(&models).unwrap();
        std::fs::write(models.join(file), content).unwrap();
    }

    fn migrations(&self) -> std::path::PathBuf {
        self.dir.path().join("migrations")
    }

    /// Load the models and generate a migration, returning the written file.
    async fn generate(&self, name: &str) -> Option<MigrationFile> {
        let models = ModelLoader::new(self.dir.path().join("models"))
            .load()
            .await
            .unwrap();
        let generator = MigrationGenerator::new(
            GeneratorConfig::default(),
            FileSnapshotStore::new(self.migrations()),
            MigrationFileManager::new(self.migrations()).force(true),
        );
        match generator.generate(name, TEMPLATE, &models, None).await.unwrap() {
            Generated::Written { file, .. } => Some(file),
            Generated::NoChanges(_) => None,
        }
    }
}

/// The rendered `up` and `down` sections of a generated file.
fn sections(file: &MigrationFile) -> (String, String) {
    let body = file.content.strip_prefix("up:\n\t\t").unwrap();
    let (up, down) = body.split_once("\ndown:\n\t\t").unwrap();
    (up.to_string(), down.trim_end().to_string())
}

fn snapshot_exists(dir: &Path) -> bool {
    dir.join(".sqcmd").join("snapshot.json").exists()
}

#[tokio::test]
async fn test_new_model_creates_table() {
    let project = Project::new();
    project.write_model("user.toml", "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\n");

    let file = project.generate("create_user").await.unwrap();
    let (up, down) = sections(&file);

    assert!(up.starts_with("migration.createTable('User'"));
    assert!(up.contains("email: { type: types.STRING }"));
    assert_eq!(down, "migration.dropTable('User');");
    assert!(snapshot_exists(&project.migrations()));

    // Generating again without edits writes nothing.
    assert!(project.generate("noop").await.is_none());
}

#[tokio::test]
async fn test_added_column() {
    let project = Project::new();
    project.write_model("user.toml", "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\n");
    project.generate("create_user").await.unwrap();

    project.write_model(
        "user.toml",
        "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\nage = { type = \"INTEGER\" }\n",
    );
    let file = project.generate("add_age").await.unwrap();
    let (up, down) = sections(&file);

    assert_eq!(up, "migration.addColumn('User', 'age', { type: types.INTEGER });");
    assert_eq!(down, "migration.removeColumn('User', 'age');");
    assert!(!file.content.contains("changeColumn"));
}

#[tokio::test]
async fn test_changed_constraint() {
    let project = Project::new();
    project.write_model(
        "user.toml",
        "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\", allowNull = true }\n",
    );
    project.generate("create_user").await.unwrap();

    project.write_model(
        "user.toml",
        "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\", allowNull = false }\n",
    );
    let file = project.generate("require_email").await.unwrap();
    let (up, down) = sections(&file);

    assert_eq!(up, "migration.changeColumn('User', 'email', { allowNull: false });");
    assert_eq!(down, "migration.changeColumn('User', 'email', { allowNull: true });");
}

#[tokio::test]
async fn test_removed_column_restores_full_definition() {
    let project = Project::new();
    project.write_model(
        "user.toml",
        "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\nlegacy = { type = \"STRING(20)\", allowNull = false, defaultValue = \"n/a\" }\n",
    );
    project.generate("create_user").await.unwrap();

    project.write_model("user.toml", "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\n");
    let file = project.generate("drop_legacy").await.unwrap();
    let (up, down) = sections(&file);

    assert_eq!(up, "migration.removeColumn('User', 'legacy');");
    assert_eq!(
        down,
        "migration.addColumn('User', 'legacy', { type: types.STRING(20), allowNull: false, defaultValue: 'n/a' });"
    );
}

#[tokio::test]
async fn test_untouched_models_survive_in_snapshot() {
    let project = Project::new();
    project.write_model("user.toml", "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\n");
    project.write_model("post.json", r#"{"name": "Post", "attributes": {"title": {"type": "TEXT"}}}"#);
    project.generate("init").await.unwrap();

    project.write_model(
        "user.toml",
        "name = \"User\"\n\n[attributes]\nemail = { type = \"STRING\" }\nage = { type = \"INTEGER\" }\n",
    );
    let file = project.generate("add_age").await.unwrap();
    assert!(!file.content.contains("Post"));

    // Post is still known, so it is not recreated.
    assert!(project.generate("again").await.is_none());
}

fn user(columns: &[(&str, LiveAttribute)]) -> LiveModel {
    columns
        .iter()
        .fold(LiveModel::new("User"), |model, (name, attribute)| {
            model.attribute(*name, attribute.clone())
        })
}

#[test]
fn test_new_model_diff_is_idempotent() {
    let config = GeneratorConfig::default();
    let model = user(&[
        ("email", LiveAttribute::new(DataType::new("STRING")).with("unique", true)),
        ("age", LiveAttribute::new(DataType::new("INTEGER"))),
    ]);
    let differ = Differencer::new(&config);

    let first = differ.diff(&snapshot_model(&config, &model), None);
    let second = differ.diff(&snapshot_model(&config, &model), None);
    assert_eq!(first, second);

    let snapshot = snapshot_model(&config, &model);
    assert!(differ.diff(&snapshot, Some(&snapshot)).is_empty());
}

#[test]
fn test_diff_inverse_symmetry() {
    let config = GeneratorConfig::default();
    let before = snapshot_model(
        &config,
        &user(&[
            ("email", LiveAttribute::new(DataType::new("STRING")).with("allowNull", true)),
            ("legacy", LiveAttribute::new(DataType::new("TEXT"))),
        ]),
    );
    let after = snapshot_model(
        &config,
        &user(&[
            ("email", LiveAttribute::new(DataType::new("STRING")).with("allowNull", false)),
            ("age", LiveAttribute::new(DataType::new("INTEGER"))),
        ]),
    );
    let differ = Differencer::new(&config);

    let forward = differ.diff(&after, Some(&before));
    let backward = differ.diff(&before, Some(&after));
    assert_eq!(forward.up, backward.down);
    assert_eq!(forward.down, backward.up);
}

#[test]
fn test_allow_list_closure() {
    let config = GeneratorConfig::default();
    let model = user(&[(
        "role",
        LiveAttribute::new(DataType::new("ENUM"))
            .with("values", Value::strings(["admin", "member"]))
            .with("_checkEnum", true)
            .with("references", "Role")
            .with("field", "role_name"),
    )]);

    let snapshot = snapshot_model(&config, &model);
    let record = &snapshot.attributes["role"];
    for key in record.constraints.keys() {
        assert!(config.valid_attributes.contains(key), "unexpected key {}", key);
    }

    let set = Differencer::new(&config).diff(&snapshot, None);
    let rendered = ScriptRenderer::new(&config).render_set(&set).unwrap();
    assert!(rendered.up.contains("values: ['admin', 'member']"));
    assert!(!rendered.up.contains("_checkEnum"));
    assert!(!rendered.up.contains("references"));
    assert!(!rendered.up.contains("role_name"));
}

#[test]
fn test_ignored_field_change_is_skipped() {
    let config = GeneratorConfig::default();
    let before = snapshot_model(
        &config,
        &user(&[("email", LiveAttribute::new(DataType::new("STRING")).with("field", "email"))]),
    );
    let after = snapshot_model(
        &config,
        &user(&[("email", LiveAttribute::new(DataType::new("STRING")).with("field", "mail"))]),
    );

    let set = Differencer::new(&config).diff(&after, Some(&before));
    assert!(set.is_empty());
    assert!(set.up.of_kind(OperationKind::ChangeColumn).is_empty());
}
