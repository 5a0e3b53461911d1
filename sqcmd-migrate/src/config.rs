//! Generator configuration shared by the normalizers, differ and renderer.

use serde::{Deserialize, Serialize};

/// Attribute keys compared and emitted by default.
pub const DEFAULT_VALID_ATTRIBUTES: &[&str] = &[
    "type",
    "allowNull",
    "defaultValue",
    "primaryKey",
    "unique",
    "comment",
    "get",
    "set",
    "validate",
    "values",
    "autoIncrement",
];

/// Attribute keys stripped by default.
pub const DEFAULT_EXCLUDE_ATTRIBUTES: &[&str] = &["_checkEnum"];

/// Table option keys kept by default.
pub const DEFAULT_VALID_OPTIONS: &[&str] = &[
    "name",
    "indexes",
    "classMethods",
    "instanceMethods",
    "validate",
    "getterMethods",
    "setterMethods",
    "hooks",
    "tableName",
    "omitNull",
    "freezeTableName",
    "paranoid",
    "underscored",
    "timestamps",
    "createdAt",
    "updatedAt",
    "deletedAt",
];

/// Default variable name for data types in generated migrations.
pub const DEFAULT_TYPE_VARIABLE: &str = "types";

/// Configuration for migration generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Attribute keys that are compared and emitted.
    pub valid_attributes: Vec<String>,
    /// Attribute keys that are always stripped, even when nested.
    pub exclude_attributes: Vec<String>,
    /// Table option keys that are kept.
    pub valid_options: Vec<String>,
    /// Variable name used to reference data types in generated code.
    pub type_variable: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            valid_attributes: to_strings(DEFAULT_VALID_ATTRIBUTES),
            exclude_attributes: to_strings(DEFAULT_EXCLUDE_ATTRIBUTES),
            valid_options: to_strings(DEFAULT_VALID_OPTIONS),
            type_variable: DEFAULT_TYPE_VARIABLE.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Create a config with the default allow-lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type variable.
    pub fn type_variable(mut self, name: impl Into<String>) -> Self {
        self.type_variable = name.into();
        self
    }

    /// Replace the valid attribute list.
    pub fn valid_attributes<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_attributes = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the valid option list.
    pub fn valid_options<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_options = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether an attribute key is compared and emitted.
    pub fn is_valid_attribute(&self, key: &str) -> bool {
        self.valid_attributes.iter().any(|k| k == key)
            && !self.exclude_attributes.iter().any(|k| k == key)
    }

    /// Check whether an option key is kept.
    pub fn is_valid_option(&self, key: &str) -> bool {
        self.valid_options.iter().any(|k| k == key)
    }
}

fn to_strings(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_lists() {
        let config = GeneratorConfig::default();
        assert!(config.is_valid_attribute("allowNull"));
        assert!(!config.is_valid_attribute("_checkEnum"));
        assert!(!config.is_valid_attribute("fieldName"));
        assert!(config.is_valid_option("tableName"));
        assert!(!config.is_valid_option("sequelize"));
        assert_eq!(config.type_variable, "types");
    }

    #[test]
    fn test_exclude_wins_over_valid() {
        let config = GeneratorConfig::new().valid_attributes(["type", "_checkEnum"]);
        assert!(!config.is_valid_attribute("_checkEnum"));
    }
}
