//! Live model definitions as produced by the model loader.
//!
//! These mirror what an ORM keeps in memory for a defined model: engine type
//! objects with their length and flag fields, arbitrary column properties,
//! and the raw options object. Nothing here is compared directly; the
//! normalizers in [`crate::normalize`] reduce them to snapshot records.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueMap};

/// Property key used by enum validators to flag an enumeration column.
pub const ENUM_MARKER: &str = "_checkEnum";

/// An engine-side column type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "DataTypeRepr")]
pub struct DataType {
    /// Base type name, upper-cased (e.g. `INTEGER`, `VARCHAR`).
    pub key: String,
    /// Declared length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Declared precision (decimal types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    /// Declared scale (decimal types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// `UNSIGNED` flag.
    #[serde(default)]
    pub unsigned: bool,
    /// `ZEROFILL` flag.
    #[serde(default)]
    pub zerofill: bool,
    /// `BINARY` flag.
    #[serde(default)]
    pub binary: bool,
}

impl DataType {
    /// Create a type with the given base name.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self {
            key: key.as_ref().trim().to_ascii_uppercase(),
            ..Default::default()
        }
    }

    /// Set the length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set precision and scale.
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Set the unsigned flag.
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Set the zerofill flag.
    pub fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }

    /// Set the binary flag.
    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// The base name with any parenthesised arguments stripped.
    pub fn base_name(&self) -> &str {
        self.key.split('(').next().unwrap_or_default().trim()
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty column type".to_string());
        }

        let is_separator = |c: char| c.is_whitespace() || c == '.';

        let (head, args, rest) = match s.find('(') {
            Some(open) => {
                let close = s[open..]
                    .find(')')
                    .map(|i| open + i)
                    .ok_or_else(|| format!("unclosed '(' in column type '{}'", s))?;
                (&s[..open], Some(&s[open + 1..close]), &s[close + 1..])
            }
            None => {
                let mut split = s.splitn(2, is_separator);
                (
                    split.next().unwrap_or_default(),
                    None,
                    split.next().unwrap_or_default(),
                )
            }
        };

        let mut data_type = DataType::new(head);

        if let Some(args) = args {
            let numbers = args
                .split(',')
                .map(|part| part.trim().parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| format!("invalid arguments '{}' in column type '{}'", args, s))?;
            match numbers.as_slice() {
                [length] => data_type.length = Some(*length),
                [precision, scale] => {
                    data_type.precision = Some(*precision);
                    data_type.scale = Some(*scale);
                }
                _ => return Err(format!("invalid arguments '{}' in column type '{}'", args, s)),
            }
        }

        for word in rest.split(is_separator).filter(|w| !w.is_empty()) {
            match word.to_ascii_uppercase().as_str() {
                "UNSIGNED" => data_type.unsigned = true,
                "ZEROFILL" => data_type.zerofill = true,
                "BINARY" => data_type.binary = true,
                other => return Err(format!("unknown modifier '{}' in column type '{}'", other, s)),
            }
        }

        Ok(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        match (self.precision, self.scale, self.length) {
            (Some(p), Some(s), _) => write!(f, "({},{})", p, s)?,
            (_, _, Some(len)) => write!(f, "({})", len)?,
            _ => {}
        }
        if self.unsigned {
            write!(f, " UNSIGNED")?;
        }
        if self.zerofill {
            write!(f, " ZEROFILL")?;
        }
        if self.binary {
            write!(f, " BINARY")?;
        }
        Ok(())
    }
}

/// Either the string shorthand or the full table form of a [`DataType`].
#[derive(Deserialize)]
#[serde(untagged)]
enum DataTypeRepr {
    Short(String),
    Full {
        key: String,
        #[serde(default)]
        length: Option<u32>,
        #[serde(default)]
        precision: Option<u32>,
        #[serde(default)]
        scale: Option<u32>,
        #[serde(default)]
        unsigned: bool,
        #[serde(default)]
        zerofill: bool,
        #[serde(default)]
        binary: bool,
    },
}

impl TryFrom<DataTypeRepr> for DataType {
    type Error = String;

    fn try_from(repr: DataTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            DataTypeRepr::Short(s) => s.parse(),
            DataTypeRepr::Full {
                key,
                length,
                precision,
                scale,
                unsigned,
                zerofill,
                binary,
            } => {
                // The key may itself carry arguments or flags.
                let mut data_type: DataType = key.parse()?;
                data_type.length = length.or(data_type.length);
                data_type.precision = precision.or(data_type.precision);
                data_type.scale = scale.or(data_type.scale);
                data_type.unsigned |= unsigned;
                data_type.zerofill |= zerofill;
                data_type.binary |= binary;
                Ok(data_type)
            }
        }
    }
}

/// A column as declared on a live model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveAttribute {
    /// Engine type of the column.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Every other declared property, in declaration order.
    #[serde(flatten)]
    pub properties: ValueMap,
}

impl LiveAttribute {
    /// Create a column of the given type.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            properties: ValueMap::new(),
        }
    }

    /// Add a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Check whether an enum validator marks this column.
    pub fn has_enum_marker(&self) -> bool {
        self.properties
            .get("validate")
            .and_then(Value::as_object)
            .is_some_and(|v| v.contains_key(ENUM_MARKER))
    }
}

/// A model definition as loaded from the models directory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LiveModel {
    /// Model name; the loader falls back to the file stem when empty.
    #[serde(default)]
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub attributes: IndexMap<String, LiveAttribute>,
    /// Raw model options.
    #[serde(default)]
    pub options: ValueMap,
}

impl LiveModel {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a column.
    pub fn attribute(mut self, name: impl Into<String>, attribute: LiveAttribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Add an option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}
