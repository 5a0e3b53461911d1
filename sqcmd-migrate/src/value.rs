//! Dynamic values carried by column constraints and table options.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered object of values, keyed by property name.
pub type ValueMap = IndexMap<String, Value>;

/// Source text of a function-valued option (getters, setters, hooks, ...).
///
/// Written as `{ function = "..." }` in model files and `{"function": "..."}`
/// in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSource {
    /// The verbatim function source.
    pub function: String,
}

/// A constraint or option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// Function source text.
    Function(FunctionSource),
    /// An array of values.
    Array(Vec<Value>),
    /// A nested object.
    Object(ValueMap),
}

impl Value {
    /// Create a function value from its source text.
    pub fn function(source: impl Into<String>) -> Self {
        Self::Function(FunctionSource {
            function: source.into(),
        })
    }

    /// Create an array of strings.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Array(items.into_iter().map(|s| Self::String(s.into())).collect())
    }

    /// Get the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the nested object, if this is one.
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Check if this is an object with no entries.
    pub fn is_empty_object(&self) -> bool {
        matches!(self, Self::Object(map) if map.is_empty())
    }

    /// Check if this value fits on a single rendered line.
    pub fn is_inline(&self) -> bool {
        match self {
            Self::Object(_) | Self::Function(_) => false,
            Self::Array(items) => items.iter().all(Value::is_inline),
            _ => true,
        }
    }

    /// Return a copy without empty nested objects, or `None` when the value
    /// itself is an object that ends up empty.
    ///
    /// Empty objects render as nothing, so they carry no information.
    pub fn pruned(&self) -> Option<Self> {
        match self {
            Self::Object(map) => {
                let map: ValueMap = map
                    .iter()
                    .filter_map(|(k, v)| v.pruned().map(|v| (k.clone(), v)))
                    .collect();
                (!map.is_empty()).then_some(Self::Object(map))
            }
            Self::Array(items) => Some(Self::Array(
                items
                    .iter()
                    .map(|v| v.pruned().unwrap_or_else(|| Self::Object(ValueMap::new())))
                    .collect(),
            )),
            other => Some(other.clone()),
        }
    }

    /// Return a copy with the given keys removed from every nested object.
    pub fn without_keys(&self, keys: &[String]) -> Self {
        match self {
            Self::Object(map) => Self::Object(
                map.iter()
                    .filter(|(k, _)| !keys.contains(k))
                    .map(|(k, v)| (k.clone(), v.without_keys(keys)))
                    .collect(),
            ),
            Self::Array(items) => Self::Array(items.iter().map(|v| v.without_keys(keys)).collect()),
            other => other.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Self::Object(value)
    }
}
