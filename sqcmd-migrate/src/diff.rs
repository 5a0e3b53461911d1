//! Snapshot diffing for generating migrations.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::operation::{Operation, OperationSet};
use crate::snapshot::{AttributeRecord, ModelSnapshot};
use crate::value::{Value, ValueMap};

/// Compares a model's current snapshot with its previous one.
#[derive(Debug, Clone, Copy)]
pub struct Differencer<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Differencer<'a> {
    /// Create a differ for the given configuration.
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Compute the operations turning `previous` into `current`, and back.
    pub fn diff(&self, current: &ModelSnapshot, previous: Option<&ModelSnapshot>) -> OperationSet {
        let mut set = OperationSet::new();
        self.diff_into(&mut set, current, previous);
        set
    }

    /// Append the operations for one model to a shared set.
    pub fn diff_into(
        &self,
        set: &mut OperationSet,
        current: &ModelSnapshot,
        previous: Option<&ModelSnapshot>,
    ) {
        match previous {
            None => self.diff_new(set, current),
            Some(previous) => self.diff_existing(set, current, previous),
        }
    }

    /// A model without a previous snapshot: create and drop the table.
    fn diff_new(&self, set: &mut OperationSet, current: &ModelSnapshot) {
        debug!(model = %current.name, "new model");

        set.up.push(Operation::CreateTable {
            model: current.name.clone(),
            columns: current
                .attributes
                .iter()
                .map(|(name, record)| (name.clone(), self.allowed(record)))
                .collect(),
            options: current.options.clone(),
        });
        set.down.push(Operation::DropTable {
            model: current.name.clone(),
        });
    }

    /// A model with a previous snapshot: column level changes only.
    fn diff_existing(&self, set: &mut OperationSet, current: &ModelSnapshot, previous: &ModelSnapshot) {
        let model = &current.name;

        // Dropped columns first.
        for (column, record) in &previous.attributes {
            if current.attributes.contains_key(column) {
                continue;
            }
            debug!(model = %model, column = %column, "column removed");
            set.up.push(Operation::RemoveColumn {
                model: model.clone(),
                column: column.clone(),
            });
            set.down.push(Operation::AddColumn {
                model: model.clone(),
                column: column.clone(),
                attribute: self.allowed(record),
            });
        }

        for (column, record) in &current.attributes {
            match previous.attributes.get(column) {
                Some(prev) => {
                    let up = self.changed_fields(record, prev);
                    let down = self.changed_fields(prev, record);

                    if !up.is_empty() {
                        debug!(model = %model, column = %column, fields = up.len(), "column changed");
                        set.up.push(Operation::ChangeColumn {
                            model: model.clone(),
                            column: column.clone(),
                            fields: up,
                        });
                    }
                    if !down.is_empty() {
                        set.down.push(Operation::ChangeColumn {
                            model: model.clone(),
                            column: column.clone(),
                            fields: down,
                        });
                    }
                }
                None => {
                    debug!(model = %model, column = %column, "column added");
                    set.up.push(Operation::AddColumn {
                        model: model.clone(),
                        column: column.clone(),
                        attribute: self.allowed(record),
                    });
                    set.down.push(Operation::RemoveColumn {
                        model: model.clone(),
                        column: column.clone(),
                    });
                }
            }
        }
    }

    /// Fields of `target` that differ from `other`, on allow-listed keys.
    ///
    /// A key that only `other` has is reported as `null`, resetting it to
    /// the ORM default.
    pub fn changed_fields(&self, target: &AttributeRecord, other: &AttributeRecord) -> ValueMap {
        let target_fields = self.allowed_fields(target);
        let other_fields = self.allowed_fields(other);

        let mut changed = ValueMap::new();
        for (key, value) in &target_fields {
            if other_fields.get(key) != Some(value) {
                changed.insert(key.clone(), value.clone());
            }
        }
        for key in other_fields.keys() {
            if !target_fields.contains_key(key) {
                changed.insert(key.clone(), Value::Null);
            }
        }
        changed
    }

    /// Every allow-listed field of a record, `type` first.
    ///
    /// An empty object counts as an absent key.
    fn allowed_fields(&self, record: &AttributeRecord) -> ValueMap {
        record
            .fields()
            .into_iter()
            .filter(|(key, _)| key == "type" || self.config.is_valid_attribute(key))
            .filter_map(|(key, value)| value.pruned().map(|value| (key, value)))
            .collect()
    }

    /// A copy of a record restricted to allow-listed constraints.
    fn allowed(&self, record: &AttributeRecord) -> AttributeRecord {
        AttributeRecord {
            data_type: record.data_type.clone(),
            constraints: record
                .constraints
                .iter()
                .filter(|(key, _)| self.config.is_valid_attribute(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;
    use pretty_assertions::assert_eq;

    fn user(columns: &[(&str, AttributeRecord)]) -> ModelSnapshot {
        columns
            .iter()
            .fold(ModelSnapshot::new("User"), |model, (name, record)| {
                model.attribute(*name, record.clone())
            })
    }

    #[test]
    fn test_new_model_creates_and_drops() {
        let config = GeneratorConfig::default();
        let current = user(&[("email", AttributeRecord::new("STRING"))]).option("tableName", "users");

        let set = Differencer::new(&config).diff(&current, None);

        assert_eq!(set.up.len(), 1);
        assert_eq!(set.down.len(), 1);
        match &set.up.of_kind(OperationKind::CreateTable)[0] {
            Operation::CreateTable { model, columns, options } => {
                assert_eq!(model, "User");
                assert!(columns.contains_key("email"));
                assert_eq!(options["tableName"], Value::from("users"));
            }
            other => panic!("unexpected operation {:?}", other),
        }
        assert_eq!(set.down.of_kind(OperationKind::DropTable)[0].model(), "User");
    }

    #[test]
    fn test_identical_snapshot_is_empty() {
        let config = GeneratorConfig::default();
        let current = user(&[
            ("email", AttributeRecord::new("STRING").with("allowNull", false)),
            ("age", AttributeRecord::new("INTEGER")),
        ])
        .option("paranoid", true);

        let set = Differencer::new(&config).diff(&current, Some(&current.clone()));
        assert!(set.is_empty());
    }

    #[test]
    fn test_removed_columns_precede_added_and_changed() {
        let config = GeneratorConfig::default();
        let previous = user(&[
            ("email", AttributeRecord::new("STRING")),
            ("legacy", AttributeRecord::new("TEXT").with("comment", "old")),
        ]);
        let current = user(&[
            ("email", AttributeRecord::new("STRING").with("unique", true)),
            ("age", AttributeRecord::new("INTEGER")),
        ]);

        let set = Differencer::new(&config).diff(&current, Some(&previous));

        let up: Vec<(OperationKind, Option<&str>)> =
            set.up.iter().map(|op| (op.kind(), op.column())).collect();
        assert_eq!(
            up,
            vec![
                (OperationKind::RemoveColumn, Some("legacy")),
                (OperationKind::AddColumn, Some("age")),
                (OperationKind::ChangeColumn, Some("email")),
            ]
        );

        let down: Vec<(OperationKind, Option<&str>)> =
            set.down.iter().map(|op| (op.kind(), op.column())).collect();
        assert_eq!(
            down,
            vec![
                (OperationKind::RemoveColumn, Some("age")),
                (OperationKind::AddColumn, Some("legacy")),
                (OperationKind::ChangeColumn, Some("email")),
            ]
        );
    }

    #[test]
    fn test_changed_fields_only_lists_differences() {
        let config = GeneratorConfig::default();
        let differ = Differencer::new(&config);
        let current = AttributeRecord::new("STRING").with("allowNull", false);
        let previous = AttributeRecord::new("STRING").with("allowNull", true);

        let up = differ.changed_fields(&current, &previous);
        assert_eq!(up.len(), 1);
        assert_eq!(up["allowNull"], Value::Bool(false));

        let down = differ.changed_fields(&previous, &current);
        assert_eq!(down["allowNull"], Value::Bool(true));
    }

    #[test]
    fn test_added_constraint_resets_on_down() {
        let config = GeneratorConfig::default();
        let previous = user(&[("email", AttributeRecord::new("STRING"))]);
        let current = user(&[("email", AttributeRecord::new("STRING").with("unique", true))]);

        let set = Differencer::new(&config).diff(&current, Some(&previous));

        match &set.down.of_kind(OperationKind::ChangeColumn)[0] {
            Operation::ChangeColumn { fields, .. } => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields["unique"], Value::Null);
            }
            other => panic!("unexpected operation {:?}", other),
        }
        assert_eq!(set.up.of_kind(OperationKind::ChangeColumn).len(), 1);
    }

    #[test]
    fn test_empty_object_counts_as_absent() {
        let config = GeneratorConfig::default();
        let renderer = crate::render::ScriptRenderer::new(&config);
        let mut is_email = ValueMap::new();
        is_email.insert("isEmail".to_string(), Value::Bool(true));

        let previous = user(&[("email", AttributeRecord::new("STRING").with("validate", is_email))]);
        let current = user(&[("email", AttributeRecord::new("STRING").with("validate", ValueMap::new()))]);

        let set = Differencer::new(&config).diff(&current, Some(&previous));
        let rendered = renderer.render_set(&set).unwrap();
        assert_eq!(rendered.up, "migration.changeColumn('User', 'email', { validate: null });");
        assert!(rendered.down.contains("isEmail: true"));

        // An empty object on one side and nothing on the other is no change.
        let bare = user(&[("email", AttributeRecord::new("STRING"))]);
        assert!(Differencer::new(&config).diff(&current, Some(&bare)).is_empty());
        assert!(Differencer::new(&config).diff(&bare, Some(&current)).is_empty());
    }

    #[test]
    fn test_keys_outside_allow_list_are_ignored() {
        let config = GeneratorConfig::default();
        let previous = user(&[("email", AttributeRecord::new("STRING").with("fieldName", "email"))]);
        let current = user(&[("email", AttributeRecord::new("STRING").with("fieldName", "mail"))]);

        let set = Differencer::new(&config).diff(&current, Some(&previous));
        assert!(set.is_empty());
    }

    #[test]
    fn test_options_are_not_diffed_for_existing_models() {
        let config = GeneratorConfig::default();
        let previous = user(&[("email", AttributeRecord::new("STRING"))]).option("paranoid", false);
        let current = user(&[("email", AttributeRecord::new("STRING"))]).option("paranoid", true);

        let set = Differencer::new(&config).diff(&current, Some(&previous));
        assert!(set.is_empty());
    }

    #[test]
    fn test_diff_into_accumulates_models() {
        let config = GeneratorConfig::default();
        let differ = Differencer::new(&config);
        let mut set = OperationSet::new();

        differ.diff_into(&mut set, &user(&[("email", AttributeRecord::new("STRING"))]), None);
        differ.diff_into(&mut set, &ModelSnapshot::new("Post"), None);

        let models: Vec<&str> = set.up.iter().map(Operation::model).collect();
        assert_eq!(models, vec!["User", "Post"]);
        assert_eq!(set.down.len(), 2);
    }
}
