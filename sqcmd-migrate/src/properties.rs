//! Parsing of the `name[:type][:key=value...]` property shorthand used when
//! generating model files.

/// Type assigned to a property declared without one.
pub const DEFAULT_PROPERTY_TYPE: &str = "STRING";

/// A parsed property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    /// Column name.
    pub name: String,
    /// Upper-cased data type.
    pub data_type: String,
    /// Extra attributes in declaration order, values as written.
    pub attributes: Vec<(String, String)>,
}

impl PropertySpec {
    /// Parse one shorthand declaration such as `age:integer:allowNull=false`.
    ///
    /// A segment without `=` is the data type; `type=...` is accepted too.
    /// Returns `None` for an empty name.
    pub fn parse(input: &str) -> Option<Self> {
        let mut segments = input.split(':');
        let name = segments.next()?.trim();
        if name.is_empty() {
            return None;
        }

        let mut data_type = DEFAULT_PROPERTY_TYPE.to_string();
        let mut attributes = Vec::new();

        for segment in segments.map(str::trim).filter(|s| !s.is_empty()) {
            match segment.split_once('=') {
                Some((key, value)) if key.trim() == "type" => data_type = type_name(value),
                Some((key, value)) => attributes.push((key.trim().to_string(), value.trim().to_string())),
                None => data_type = type_name(segment),
            }
        }

        Some(Self {
            name: name.to_string(),
            data_type,
            attributes,
        })
    }

    /// Render as a TOML key/value line under `[attributes]`.
    pub fn to_toml_line(&self) -> String {
        let mut fields = vec![format!("type = {}", toml_string(&self.data_type))];
        fields.extend(
            self.attributes
                .iter()
                .map(|(key, value)| format!("{} = {}", toml_key(key), toml_value(value))),
        );
        format!("{} = {{ {} }}", toml_key(&self.name), fields.join(", "))
    }
}

/// Format shorthand properties as TOML attribute lines.
///
/// Returns `None` when no property could be parsed.
pub fn format_properties<S: AsRef<str>>(properties: &[S]) -> Option<String> {
    let lines: Vec<String> = properties
        .iter()
        .filter_map(|p| PropertySpec::parse(p.as_ref()))
        .map(|p| p.to_toml_line())
        .collect();

    if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

fn type_name(raw: &str) -> String {
    let raw = raw.trim();
    let raw = match raw.get(..10) {
        Some(prefix) if prefix.eq_ignore_ascii_case("datatypes.") => &raw[10..],
        _ => raw,
    };
    let raw = match raw.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("types.") => &raw[6..],
        _ => raw,
    };
    raw.to_uppercase()
}

fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare { key.to_string() } else { toml_string(key) }
}

/// Keep booleans and numbers literal, quote everything else.
fn toml_value(raw: &str) -> String {
    if raw == "true" || raw == "false" || raw.parse::<i64>().is_ok() || raw.parse::<f64>().is_ok_and(f64::is_finite) {
        return raw.to_string();
    }
    let unquoted = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(raw);
    toml_string(unquoted)
}

fn toml_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
