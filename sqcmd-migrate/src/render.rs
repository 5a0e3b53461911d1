//! Rendering of operations and values as migration source text.
//!
//! All indentation and quoting rules live here. Depth `d` maps to
//! `BASE_INDENT + d` tabs so rendered fragments line up with the body of the
//! migration template they are inserted into.

use crate::config::GeneratorConfig;
use crate::error::RenderError;
use crate::operation::{Operation, OperationSet, Operations};
use crate::snapshot::AttributeRecord;
use crate::value::{Value, ValueMap};

/// Tabs already present in the template where fragments are inserted.
pub const BASE_INDENT: usize = 2;

/// Extra tabs for the continuation lines of function sources.
pub const FUNCTION_OFFSET: usize = 1;

/// Deepest nesting the renderer accepts.
pub const MAX_DEPTH: usize = 32;

/// Rendered bodies of a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMigration {
    /// Body of the `up` function.
    pub up: String,
    /// Body of the `down` function.
    pub down: String,
}

type RenderResult<T> = Result<T, RenderError>;

/// Renders values, attribute literals and operations.
#[derive(Debug, Clone, Copy)]
pub struct ScriptRenderer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ScriptRenderer<'a> {
    /// Create a renderer for the given configuration.
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Indentation for a nesting depth.
    pub fn indent(depth: usize) -> String {
        "\t".repeat(BASE_INDENT + depth)
    }

    /// Render both halves of an operation set.
    pub fn render_set(&self, set: &OperationSet) -> RenderResult<RenderedMigration> {
        Ok(RenderedMigration {
            up: self.render_operations(&set.up)?,
            down: self.render_operations(&set.down)?,
        })
    }

    /// Render every operation in kind order, one per line group, without a
    /// trailing newline.
    pub fn render_operations(&self, operations: &Operations) -> RenderResult<String> {
        let rendered = operations
            .iter()
            .map(|op| self.render_operation(op))
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(rendered.join(&format!("\n{}", Self::indent(0))))
    }

    /// Render a single operation as a migration statement.
    pub fn render_operation(&self, operation: &Operation) -> RenderResult<String> {
        let method = operation.kind().method();
        let statement = match operation {
            Operation::CreateTable {
                model,
                columns,
                options,
            } => {
                let mut entries = Vec::with_capacity(columns.len());
                for (column, record) in columns {
                    let literal = self.render_attribute(record, 1, column)?;
                    entries.push(format!("{}: {}", render_key(column), literal));
                }
                let columns = block(entries, 0);

                let options = self.render_entries(options, 0, "options")?;
                if options.is_empty() {
                    format!("migration.{}({}, {});", method, quote(model), columns)
                } else {
                    format!(
                        "migration.{}({}, {}, {});",
                        method,
                        quote(model),
                        columns,
                        block(options, 0)
                    )
                }
            }
            Operation::DropTable { model } => {
                format!("migration.{}({});", method, quote(model))
            }
            Operation::AddColumn {
                model,
                column,
                attribute,
            } => format!(
                "migration.{}({}, {}, {});",
                method,
                quote(model),
                quote(column),
                self.render_attribute(attribute, 0, column)?
            ),
            Operation::RemoveColumn { model, column } => {
                format!("migration.{}({}, {});", method, quote(model), quote(column))
            }
            Operation::ChangeColumn {
                model,
                column,
                fields,
            } => format!(
                "migration.{}({}, {}, {});",
                method,
                quote(model),
                quote(column),
                self.render_fields(fields, 0, column)?
            ),
        };
        Ok(statement)
    }

    /// Render a column definition as an object literal.
    pub fn render_attribute(
        &self,
        record: &AttributeRecord,
        depth: usize,
        path: &str,
    ) -> RenderResult<String> {
        self.render_fields(&record.fields(), depth, path)
    }

    /// Render column fields, inline when every value fits on one line.
    ///
    /// A string `type` field is emitted as a reference into the type variable.
    pub fn render_fields(&self, fields: &ValueMap, depth: usize, path: &str) -> RenderResult<String> {
        let inline = fields.values().all(Value::is_inline);
        let mut entries = Vec::with_capacity(fields.len());

        for (key, value) in fields {
            if value.is_empty_object() {
                continue;
            }
            let rendered = match (key.as_str(), value) {
                ("type", Value::String(token)) => self.render_type(token, &join_path(path, key))?,
                _ => self.value_at(value, depth + 1, &join_path(path, key))?,
            };
            entries.push(format!("{}: {}", render_key(key), rendered));
        }

        if entries.is_empty() {
            Ok("{}".to_string())
        } else if inline {
            Ok(format!("{{ {} }}", entries.join(", ")))
        } else {
            Ok(block(entries, depth))
        }
    }

    /// Render a type token as a reference into the type variable.
    fn render_type(&self, token: &str, path: &str) -> RenderResult<String> {
        if token.is_empty() || token.contains(char::is_whitespace) {
            return Err(RenderError::unsupported(
                path,
                format!("type '{}' is not a valid type reference", token),
            ));
        }
        Ok(format!("{}.{}", self.config.type_variable, token))
    }

    /// Render any value as it appears at the given depth.
    pub fn render_value(&self, value: &Value, depth: usize) -> RenderResult<String> {
        self.value_at(value, depth, "value")
    }

    fn value_at(&self, value: &Value, depth: usize, path: &str) -> RenderResult<String> {
        if depth > MAX_DEPTH {
            return Err(RenderError::unsupported(
                path,
                format!("nesting deeper than {} levels", MAX_DEPTH),
            ));
        }

        match value {
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) if f.is_finite() => Ok(f.to_string()),
            Value::Float(f) => Err(RenderError::unsupported(path, format!("non-finite number {}", f))),
            Value::String(s) => Ok(quote(s)),
            Value::Array(items) => self.render_array(items, depth, path),
            Value::Object(map) => Ok(block(self.render_entries(map, depth, path)?, depth)),
            Value::Function(source) => render_function(&source.function, depth, path),
        }
    }

    /// Render an array: quoted strings, or elements joined unquoted.
    fn render_array(&self, items: &[Value], depth: usize, path: &str) -> RenderResult<String> {
        let elements = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.value_at(item, depth, &format!("{}[{}]", path, i)))
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(format!("[{}]", elements.join(", ")))
    }

    /// Render the `key: value` entries of an object one level below `depth`,
    /// omitting empty nested objects.
    fn render_entries(&self, map: &ValueMap, depth: usize, path: &str) -> RenderResult<Vec<String>> {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            if value.is_empty_object() {
                continue;
            }
            let rendered = self.value_at(value, depth + 1, &join_path(path, key))?;
            entries.push(format!("{}: {}", render_key(key), rendered));
        }
        Ok(entries)
    }
}

/// Lay out entries as a multi-line object closing at `depth`.
fn block(entries: Vec<String>, depth: usize) -> String {
    if entries.is_empty() {
        return "{}".to_string();
    }
    let inner = ScriptRenderer::indent(depth + 1);
    format!(
        "{{\n{}{}\n{}}}",
        inner,
        entries.join(&format!(",\n{}", inner)),
        ScriptRenderer::indent(depth)
    )
}

/// Keep the first line of a function source and re-indent the rest.
fn render_function(source: &str, depth: usize, path: &str) -> RenderResult<String> {
    if source.trim().is_empty() {
        return Err(RenderError::unsupported(path, "empty function source"));
    }

    let indent = "\t".repeat(BASE_INDENT + depth + FUNCTION_OFFSET);
    let mut lines = source.trim().lines();
    let mut rendered = lines.next().unwrap_or_default().trim_end().to_string();

    for line in lines {
        rendered.push('\n');
        let line = line.trim();
        if !line.is_empty() {
            rendered.push_str(&indent);
            rendered.push_str(line);
        }
    }
    Ok(rendered)
}

/// Single-quote a string literal.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Render an object key, quoting it unless it is a plain identifier.
fn render_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier { key.to_string() } else { quote(key) }
}

fn join_path(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}
