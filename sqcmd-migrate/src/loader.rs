//! Loading live model definitions from the models directory.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::casing::{Casing, str_to_case};
use crate::error::{MigrateResult, MigrationError};
use crate::model::LiveModel;

/// Default filter for model definition files.
pub const DEFAULT_FILES_FILTER: &str = r"\.(toml|json)$";

/// Extensions matched when no custom filter is set.
const DEFAULT_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Loaded models keyed by model name, in file path order.
pub type LiveModels = IndexMap<String, LiveModel>;

/// Reads every model definition file under a directory.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    models_dir: PathBuf,
    filter: Option<Regex>,
    model_names: Option<Casing>,
}

impl ModelLoader {
    /// Create a loader with the default file filter.
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            filter: None,
            model_names: None,
        }
    }

    /// Set the file name filter.
    pub fn files_filter(mut self, pattern: &str) -> MigrateResult<Self> {
        let filter = Regex::new(pattern)
            .map_err(|e| MigrationError::other(format!("invalid files filter '{}': {}", pattern, e)))?;
        self.filter = Some(filter);
        Ok(self)
    }

    /// Set the casing applied to model names.
    pub fn model_names(mut self, casing: Option<Casing>) -> Self {
        self.model_names = casing;
        self
    }

    /// Load every matching model file, recursing into subdirectories.
    ///
    /// A missing directory yields no models.
    pub async fn load(&self) -> MigrateResult<LiveModels> {
        let mut models = LiveModels::new();

        if !tokio::fs::try_exists(&self.models_dir).await? {
            warn!(dir = %self.models_dir.display(), "models directory not found");
            return Ok(models);
        }

        for path in self.model_files().await? {
            let model = self.load_file(&path).await?;
            if models.contains_key(&model.name) {
                warn!(model = %model.name, path = %path.display(), "duplicate model name, later file wins");
            }
            models.insert(model.name.clone(), model);
        }

        debug!(count = models.len(), "models loaded");
        Ok(models)
    }

    /// Load a single model file.
    pub async fn load_file(&self, path: &Path) -> MigrateResult<LiveModel> {
        let raw = tokio::fs::read_to_string(path).await?;
        let display = path.display().to_string();

        let mut model: LiveModel = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                serde_json::from_str(&raw).map_err(|e| MigrationError::invalid_model(&display, e.to_string()))?
            }
            _ => {
                let table: toml::Table =
                    toml::from_str(&raw).map_err(|e| MigrationError::invalid_model(&display, e.message()))?;
                dates_as_strings(toml::Value::Table(table))
                    .try_into()
                    .map_err(|e: toml::de::Error| MigrationError::invalid_model(&display, e.message()))?
            }
        };

        if model.name.trim().is_empty() {
            model.name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
        }
        model.name = str_to_case(&model.name, self.model_names);

        if model.name.is_empty() {
            return Err(MigrationError::invalid_model(display, "model has no name"));
        }

        Ok(model)
    }

    /// Every file under the models directory matching the filter, sorted.
    async fn model_files(&self) -> MigrateResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.models_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                if self.is_model_file(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn is_model_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        match &self.filter {
            Some(filter) => filter.is_match(name),
            None => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| DEFAULT_EXTENSIONS.contains(&ext)),
        }
    }
}

/// Replace TOML dates and datetimes with their RFC 3339 text.
fn dates_as_strings(value: toml::Value) -> toml::Value {
    match value {
        toml::Value::Datetime(datetime) => toml::Value::String(datetime.to_string()),
        toml::Value::Array(items) => toml::Value::Array(items.into_iter().map(dates_as_strings).collect()),
        toml::Value::Table(table) => toml::Value::Table(
            table
                .into_iter()
                .map(|(key, value)| (key, dates_as_strings(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    const USER: &str = r#"
name = "User"

[attributes.email]
type = "STRING(100)"
allowNull = false

[attributes.age]
type = { key = "INTEGER", unsigned = true }

[options]
tableName = "users"
"#;

    async fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(path, contents).await.unwrap();
    }

    #[tokio::test]
    async fn test_toml_dates_load_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "event.toml",
            "name = \"Event\"\n\n[attributes.day]\ntype = \"DATEONLY\"\ndefaultValue = 1979-05-27\n\n[attributes.at]\ntype = \"DATE\"\ndefaultValue = 1979-05-27T07:32:00Z\n",
        )
        .await;

        let models = ModelLoader::new(dir.path()).load().await.unwrap();
        let event = &models["Event"];
        assert_eq!(event.attributes["day"].properties["defaultValue"], Value::from("1979-05-27"));
        assert_eq!(
            event.attributes["at"].properties["defaultValue"],
            Value::from("1979-05-27T07:32:00Z")
        );
    }

    #[tokio::test]
    async fn test_load_toml_model() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "user.toml", USER).await;

        let models = ModelLoader::new(dir.path()).load().await.unwrap();
        let user = &models["User"];

        let columns: Vec<&String> = user.attributes.keys().collect();
        assert_eq!(columns, vec!["email", "age"]);
        assert_eq!(user.attributes["email"].data_type.length, Some(100));
        assert!(user.attributes["age"].data_type.unsigned);
        assert_eq!(user.attributes["email"].properties["allowNull"], Value::Bool(false));
        assert_eq!(user.options["tableName"], Value::from("users"));
    }

    #[tokio::test]
    async fn test_recursive_filter_and_name_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "account/post.json", r#"{"attributes": {"title": {"type": "STRING"}}}"#).await;
        write(dir.path(), "README.md", "# not a model").await;

        let models = ModelLoader::new(dir.path())
            .model_names(Some(Casing::First))
            .load()
            .await
            .unwrap();

        assert_eq!(models.len(), 1);
        assert!(models.contains_key("Post"));
    }

    #[tokio::test]
    async fn test_invalid_model_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken.toml", "name = ").await;

        let err = ModelLoader::new(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, MigrationError::InvalidModel { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[tokio::test]
    async fn test_missing_dir_and_custom_filter() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModelLoader::new(dir.path().join("missing")).load().await.unwrap().is_empty());

        write(dir.path(), "user.toml", USER).await;
        let models = ModelLoader::new(dir.path())
            .files_filter(r"\.json$")
            .unwrap()
            .load()
            .await
            .unwrap();
        assert!(models.is_empty());

        assert!(ModelLoader::new(dir.path()).files_filter("(").is_err());
    }
}
