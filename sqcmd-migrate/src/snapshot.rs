//! Normalized snapshot records and their persisted form.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::value::{Value, ValueMap};

/// Canonical data type token, e.g. `STRING(100)` or `INTEGER.UNSIGNED`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeToken(String);

impl TypeToken {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized column.
///
/// Only ever built by [`crate::normalize::AttributeNormalizer`] or read back
/// from a snapshot, so every constraint key is already allow-listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Canonical type.
    #[serde(rename = "type")]
    pub data_type: TypeToken,
    /// Allow-listed constraints in declaration order.
    #[serde(flatten)]
    pub constraints: ValueMap,
}

impl AttributeRecord {
    /// Create a record with no constraints.
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: TypeToken::new(data_type),
            constraints: ValueMap::new(),
        }
    }

    /// Add a constraint.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.insert(key.into(), value.into());
        self
    }

    /// Every field, `type` first, as plain values.
    pub fn fields(&self) -> ValueMap {
        let mut fields = ValueMap::with_capacity(self.constraints.len() + 1);
        fields.insert(
            "type".to_string(),
            Value::String(self.data_type.as_str().to_string()),
        );
        for (key, value) in &self.constraints {
            fields.insert(key.clone(), value.clone());
        }
        fields
    }
}

/// The complete normalized shape of one model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Model name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeRecord>,
    /// Allow-listed table options.
    #[serde(default)]
    pub options: ValueMap,
}

impl ModelSnapshot {
    /// Create an empty snapshot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a column.
    pub fn attribute(mut self, name: impl Into<String>, record: AttributeRecord) -> Self {
        self.attributes.insert(name.into(), record);
        self
    }

    /// Add an option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Snapshots of every model, keyed by model name.
pub type SnapshotSet = IndexMap<String, ModelSnapshot>;

/// The persisted metadata record written after each generated migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    /// Identifier of the migration this snapshot belongs to.
    pub migration: String,
    /// Checksum of the generated migration text.
    pub checksum: String,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
    /// Model snapshots.
    pub models: SnapshotSet,
}

impl SnapshotRecord {
    /// Create a record stamped with the current time.
    pub fn new(migration: impl Into<String>, checksum: impl Into<String>, models: SnapshotSet) -> Self {
        Self {
            migration: migration.into(),
            checksum: checksum.into(),
            created_at: Utc::now(),
            models,
        }
    }
}

/// The outcome of reading the previous snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviousSnapshot {
    /// Nothing has been generated yet.
    Missing,
    /// The stored record could not be parsed; treated as empty.
    Corrupt(String),
    /// A valid record.
    Loaded(SnapshotRecord),
}

impl PreviousSnapshot {
    /// Parse raw store contents, degrading to [`PreviousSnapshot::Corrupt`]
    /// instead of failing.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            info!("no previous snapshot, every model is new");
            return Self::Missing;
        };

        match serde_json::from_str::<SnapshotRecord>(raw) {
            Ok(record) => {
                info!(
                    migration = %record.migration,
                    models = record.models.len(),
                    "loaded previous snapshot"
                );
                Self::Loaded(record)
            }
            Err(err) => {
                warn!(error = %err, "previous snapshot is malformed, treating every model as new");
                Self::Corrupt(err.to_string())
            }
        }
    }

    /// Snapshot of a single model, if one was recorded.
    pub fn model(&self, name: &str) -> Option<&ModelSnapshot> {
        match self {
            Self::Loaded(record) => record.models.get(name),
            _ => None,
        }
    }

    /// All recorded snapshots (empty unless loaded).
    pub fn models(&self) -> SnapshotSet {
        match self {
            Self::Loaded(record) => record.models.clone(),
            _ => SnapshotSet::new(),
        }
    }

    /// Check whether the store held a malformed record.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }
}

/// Replace the snapshots of touched models, keeping every other model as is.
pub fn supersede(previous: SnapshotSet, touched: impl IntoIterator<Item = ModelSnapshot>) -> SnapshotSet {
    let mut next = previous;
    for snapshot in touched {
        next.insert(snapshot.name.clone(), snapshot);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> ModelSnapshot {
        ModelSnapshot::new("User")
            .attribute("email", AttributeRecord::new("STRING").with("allowNull", false))
            .attribute("age", AttributeRecord::new("INTEGER"))
            .option("tableName", "users")
    }

    #[test]
    fn test_attribute_record_json_shape() {
        let record = AttributeRecord::new("STRING").with("allowNull", false);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":"STRING","allowNull":false}"#);

        let back: AttributeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_fields_puts_type_first() {
        let record = AttributeRecord::new("STRING").with("unique", true);
        let keys: Vec<String> = record.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["type".to_string(), "unique".to_string()]);
    }

    #[test]
    fn test_previous_snapshot_parse() {
        let mut models = SnapshotSet::new();
        models.insert("User".to_string(), user());
        let record = SnapshotRecord::new("20240101000000_init", "abc", models);
        let raw = serde_json::to_string(&record).unwrap();

        let previous = PreviousSnapshot::parse(Some(&raw));
        assert_eq!(previous.model("User"), Some(&user()));
        let order: Vec<&String> = previous.model("User").unwrap().attributes.keys().collect();
        assert_eq!(order, vec!["email", "age"]);
    }

    #[test]
    fn test_previous_snapshot_missing_and_corrupt() {
        assert_eq!(PreviousSnapshot::parse(None), PreviousSnapshot::Missing);

        let corrupt = PreviousSnapshot::parse(Some("{not json"));
        assert!(corrupt.is_corrupt());
        assert!(corrupt.model("User").is_none());
        assert!(corrupt.models().is_empty());
    }

    #[test]
    fn test_supersede_replaces_not_merges() {
        let mut previous = SnapshotSet::new();
        previous.insert("User".to_string(), user());
        previous.insert("Post".to_string(), ModelSnapshot::new("Post"));

        let replacement = ModelSnapshot::new("User").attribute("email", AttributeRecord::new("TEXT"));
        let next = supersede(previous, [replacement.clone()]);

        assert_eq!(next.len(), 2);
        assert_eq!(next["User"], replacement);
        assert!(!next["User"].attributes.contains_key("age"));
        assert!(next.contains_key("Post"));
    }
}
