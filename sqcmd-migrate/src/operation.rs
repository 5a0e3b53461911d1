//! Schema change operations: the intermediate form between diffing and
//! rendering.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;

use crate::snapshot::AttributeRecord;
use crate::value::ValueMap;

/// Kind of schema change.
///
/// Declaration order is the order in which kinds are rendered. Table and
/// column renames and index changes are not produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    /// `migration.createTable`.
    CreateTable,
    /// `migration.dropTable`.
    DropTable,
    /// `migration.removeColumn`.
    RemoveColumn,
    /// `migration.addColumn`.
    AddColumn,
    /// `migration.changeColumn`.
    ChangeColumn,
}

impl OperationKind {
    /// Method name on the migration object.
    pub fn method(&self) -> &'static str {
        match self {
            Self::CreateTable => "createTable",
            Self::DropTable => "dropTable",
            Self::RemoveColumn => "removeColumn",
            Self::AddColumn => "addColumn",
            Self::ChangeColumn => "changeColumn",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// One atomic schema change.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a table with every column and its options.
    CreateTable {
        /// Model name.
        model: String,
        /// Columns in declaration order.
        columns: IndexMap<String, AttributeRecord>,
        /// Allow-listed table options.
        options: ValueMap,
    },
    /// Drop a table.
    DropTable {
        /// Model name.
        model: String,
    },
    /// Add a column.
    AddColumn {
        /// Model name.
        model: String,
        /// Column name.
        column: String,
        /// Full column definition.
        attribute: AttributeRecord,
    },
    /// Remove a column.
    RemoveColumn {
        /// Model name.
        model: String,
        /// Column name.
        column: String,
    },
    /// Change the listed fields of a column.
    ChangeColumn {
        /// Model name.
        model: String,
        /// Column name.
        column: String,
        /// Only the fields that differ.
        fields: ValueMap,
    },
}

impl Operation {
    /// The kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateTable { .. } => OperationKind::CreateTable,
            Self::DropTable { .. } => OperationKind::DropTable,
            Self::AddColumn { .. } => OperationKind::AddColumn,
            Self::RemoveColumn { .. } => OperationKind::RemoveColumn,
            Self::ChangeColumn { .. } => OperationKind::ChangeColumn,
        }
    }

    /// The model this operation touches.
    pub fn model(&self) -> &str {
        match self {
            Self::CreateTable { model, .. }
            | Self::DropTable { model }
            | Self::AddColumn { model, .. }
            | Self::RemoveColumn { model, .. }
            | Self::ChangeColumn { model, .. } => model,
        }
    }

    /// The column this operation touches, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::AddColumn { column, .. }
            | Self::RemoveColumn { column, .. }
            | Self::ChangeColumn { column, .. } => Some(column),
            _ => None,
        }
    }
}

/// Operations grouped by kind, each group in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operations {
    groups: BTreeMap<OperationKind, Vec<Operation>>,
}

impl Operations {
    /// Append an operation to its kind's group.
    pub fn push(&mut self, operation: Operation) {
        self.groups.entry(operation.kind()).or_default().push(operation);
    }

    /// Operations of a single kind.
    pub fn of_kind(&self, kind: OperationKind) -> &[Operation] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every operation, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.groups.values().flatten()
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Check if there are no operations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The `up` and `down` halves of one migration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationSet {
    /// Operations applying the change.
    pub up: Operations,
    /// Operations reverting the change.
    pub down: Operations,
}

impl OperationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if neither half has operations.
    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    /// Get a human-readable summary of the up half.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .up
            .groups
            .iter()
            .filter(|(_, ops)| !ops.is_empty())
            .map(|(kind, ops)| format!("{} {}", ops.len(), kind))
            .collect();

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}
