//! Reduction of live model definitions to comparable snapshot records.
//!
//! Both normalizers are pure: the live model is only read, and every record
//! they produce contains allow-listed keys only.

use crate::config::GeneratorConfig;
use crate::model::{DataType, LiveAttribute, LiveModel};
use crate::snapshot::{AttributeRecord, ModelSnapshot, TypeToken};
use crate::value::ValueMap;

/// Placeholder replaced by the rendered length in mapped type templates.
const LEN: &str = "[LEN]";

/// Lengths that are the engine defaults and never rendered.
const DEFAULT_LENGTHS: [u32; 2] = [255, 11];

/// Numeric types that carry `UNSIGNED`/`ZEROFILL` flags.
const FLAGGED_NUMERICS: [&str; 3] = ["INTEGER", "FLOAT", "BIGINT"];

/// Map a lookup key to its canonical type template.
fn type_template(key: &str) -> Option<&'static str> {
    let template = match key {
        "TINYINT" => "BOOLEAN",
        "DATETIME" | "TIMESTAMP" => "DATE",
        "VARCHAR BINARY" => "STRING.BINARY",
        "TINYBLOB" => "BLOB",
        "VARCHAR" => "STRING[LEN]",
        "INTEGER UNSIGNED ZEROFILL" => "INTEGER[LEN].UNSIGNED.ZEROFILL",
        "INTEGER UNSIGNED" => "INTEGER[LEN].UNSIGNED",
        "INTEGER ZEROFILL" => "INTEGER[LEN].ZEROFILL",
        "INTEGER" => "INTEGER[LEN]",
        "FLOAT UNSIGNED ZEROFILL" => "FLOAT[LEN].UNSIGNED.ZEROFILL",
        "FLOAT UNSIGNED" => "FLOAT[LEN].UNSIGNED",
        "FLOAT ZEROFILL" => "FLOAT[LEN].ZEROFILL",
        "FLOAT" => "FLOAT[LEN]",
        "BIGINT UNSIGNED ZEROFILL" => "BIGINT[LEN].UNSIGNED.ZEROFILL",
        "BIGINT UNSIGNED" => "BIGINT[LEN].UNSIGNED",
        "BIGINT ZEROFILL" => "BIGINT[LEN].ZEROFILL",
        "BIGINT" => "BIGINT[LEN]",
        "DECIMAL" => "DECIMAL[LEN]",
        "ENUM" => "ENUM",
        _ => return None,
    };
    Some(template)
}

/// Normalizes live columns into [`AttributeRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct AttributeNormalizer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> AttributeNormalizer<'a> {
    /// Create a normalizer for the given configuration.
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Normalize one live column.
    pub fn normalize(&self, attribute: &LiveAttribute) -> AttributeRecord {
        let constraints = attribute
            .properties
            .iter()
            .filter(|(key, _)| key.as_str() != "type" && self.config.is_valid_attribute(key))
            .filter_map(|(key, value)| {
                value
                    .without_keys(&self.config.exclude_attributes)
                    .pruned()
                    .map(|value| (key.clone(), value))
            })
            .collect();

        AttributeRecord {
            data_type: self.type_token(attribute),
            constraints,
        }
    }

    /// Compute the canonical type token for a column.
    pub fn type_token(&self, attribute: &LiveAttribute) -> TypeToken {
        let data_type = &attribute.data_type;
        let key = lookup_key(attribute);
        let length = rendered_length(data_type);

        let token = match type_template(&key) {
            Some(template) => template.replace(LEN, length.as_deref().unwrap_or_default()),
            None => match data_type.length {
                Some(len) if key == data_type.base_name() => format!("{}({})", key, len),
                _ => key,
            },
        };

        TypeToken::new(token)
    }
}

/// Derive the type table lookup key for a column.
fn lookup_key(attribute: &LiveAttribute) -> String {
    let data_type = &attribute.data_type;
    let base = data_type.base_name();

    if attribute.has_enum_marker() || base == "ENUM" {
        return "ENUM".to_string();
    }

    if data_type.binary {
        return "VARCHAR BINARY".to_string();
    }

    if FLAGGED_NUMERICS.contains(&base) {
        let mut key = base.to_string();
        if data_type.unsigned {
            key.push_str(" UNSIGNED");
        }
        if data_type.zerofill {
            key.push_str(" ZEROFILL");
        }
        return key;
    }

    if matches!(base, "STRING" | "VARCHAR") {
        return "VARCHAR".to_string();
    }

    base.to_string()
}

/// The `(n)` or `(p,s)` suffix for a type, unless it is a default length.
fn rendered_length(data_type: &DataType) -> Option<String> {
    match (data_type.precision, data_type.scale, data_type.length) {
        (Some(precision), Some(scale), _) => Some(format!("({},{})", precision, scale)),
        (_, _, Some(len)) if !DEFAULT_LENGTHS.contains(&len) => Some(format!("({})", len)),
        _ => None,
    }
}

/// Keeps only allow-listed table options.
#[derive(Debug, Clone, Copy)]
pub struct OptionNormalizer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> OptionNormalizer<'a> {
    /// Create a normalizer for the given configuration.
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Copy the allow-listed keys of a live options object.
    pub fn normalize(&self, options: &ValueMap) -> ValueMap {
        options
            .iter()
            .filter(|(key, _)| self.config.is_valid_option(key))
            .filter_map(|(key, value)| value.pruned().map(|value| (key.clone(), value)))
            .collect()
    }
}

/// Build the complete snapshot of a live model.
pub fn snapshot_model(config: &GeneratorConfig, model: &LiveModel) -> ModelSnapshot {
    let attributes = AttributeNormalizer::new(config);
    let options = OptionNormalizer::new(config);

    ModelSnapshot {
        name: model.name.clone(),
        attributes: model
            .attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attributes.normalize(attribute)))
            .collect(),
        options: options.normalize(&model.options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ENUM_MARKER;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn token(data_type: DataType) -> String {
        let config = GeneratorConfig::default();
        AttributeNormalizer::new(&config)
            .type_token(&LiveAttribute::new(data_type))
            .to_string()
    }

    #[test]
    fn test_string_lengths() {
        assert_eq!(token(DataType::new("STRING")), "STRING");
        assert_eq!(token(DataType::new("VARCHAR").with_length(255)), "STRING");
        assert_eq!(token(DataType::new("STRING").with_length(100)), "STRING(100)");
        assert_eq!(token(DataType::new("STRING").binary()), "STRING.BINARY");
    }

    #[test]
    fn test_numeric_flags() {
        assert_eq!(token(DataType::new("INTEGER")), "INTEGER");
        assert_eq!(token(DataType::new("INTEGER").with_length(11)), "INTEGER");
        assert_eq!(
            token(DataType::new("INTEGER").with_length(10).unsigned().zerofill()),
            "INTEGER(10).UNSIGNED.ZEROFILL"
        );
        assert_eq!(token(DataType::new("BIGINT").unsigned()), "BIGINT.UNSIGNED");
        assert_eq!(token(DataType::new("FLOAT").zerofill()), "FLOAT.ZEROFILL");
        assert_eq!(
            token(DataType::new("DECIMAL").with_precision(10, 2)),
            "DECIMAL(10,2)"
        );
    }

    #[test]
    fn test_mapped_aliases() {
        assert_eq!(token(DataType::new("TINYINT").with_length(1)), "BOOLEAN");
        assert_eq!(token(DataType::new("DATETIME")), "DATE");
        assert_eq!(token(DataType::new("TIMESTAMP")), "DATE");
        assert_eq!(token(DataType::new("TINYBLOB")), "BLOB");
    }

    #[test]
    fn test_unknown_types_fall_through() {
        assert_eq!(token(DataType::new("TEXT")), "TEXT");
        assert_eq!(token(DataType::new("CHAR").with_length(2)), "CHAR(2)");
        assert_eq!(token(DataType::new("JSONB")), "JSONB");
    }

    #[test]
    fn test_enum_detection() {
        let config = GeneratorConfig::default();
        let normalizer = AttributeNormalizer::new(&config);

        let mut validate = ValueMap::new();
        validate.insert(ENUM_MARKER.to_string(), Value::Bool(true));
        let attribute = LiveAttribute::new(DataType::new("STRING").with_length(20))
            .with("values", Value::strings(["admin", "user"]))
            .with("validate", validate);

        let record = normalizer.normalize(&attribute);
        assert_eq!(record.data_type.as_str(), "ENUM");
        assert_eq!(record.constraints["values"], Value::strings(["admin", "user"]));
        // The marker is stripped and the emptied validator dropped with it.
        assert!(!record.constraints.contains_key("validate"));
    }

    #[test]
    fn test_constraints_are_allow_listed() {
        let config = GeneratorConfig::default();
        let attribute = LiveAttribute::new(DataType::new("STRING"))
            .with("allowNull", false)
            .with("fieldName", "email")
            .with("Model", "User")
            .with("unique", true);

        let record = AttributeNormalizer::new(&config).normalize(&attribute);
        let keys: Vec<&String> = record.constraints.keys().collect();
        assert_eq!(keys, vec!["allowNull", "unique"]);
    }

    #[test]
    fn test_normalize_does_not_mutate_input() {
        let config = GeneratorConfig::default();
        let attribute = LiveAttribute::new(DataType::new("VARCHAR").with_length(40)).with("junk", 1);
        let before = attribute.clone();
        let _ = AttributeNormalizer::new(&config).normalize(&attribute);
        assert_eq!(attribute, before);
    }

    #[test]
    fn test_option_normalizer() {
        let config = GeneratorConfig::default();
        let model = LiveModel::new("User")
            .option("tableName", "users")
            .option("sequelize", "connection")
            .option("paranoid", true);

        let options = OptionNormalizer::new(&config).normalize(&model.options);
        let keys: Vec<&String> = options.keys().collect();
        assert_eq!(keys, vec!["tableName", "paranoid"]);
    }

    #[test]
    fn test_snapshot_model() {
        let config = GeneratorConfig::default();
        let model = LiveModel::new("User")
            .attribute("email", LiveAttribute::new(DataType::new("STRING")))
            .attribute("age", LiveAttribute::new(DataType::new("INTEGER")))
            .option("tableName", "users");

        let snapshot = snapshot_model(&config, &model);
        assert_eq!(snapshot.name, "User");
        let columns: Vec<&String> = snapshot.attributes.keys().collect();
        assert_eq!(columns, vec!["email", "age"]);
        assert_eq!(snapshot.options["tableName"], Value::from("users"));
    }
}
