//! `TableSchema`: the declarative description of one artifact table.
//!
//! Built once per artifact type through [`TableSchemaBuilder`] and immutable
//! afterwards. `build()` checks every identifier and whitelist entry, so an
//! identifier that reaches SQL text is always one declared here.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use super::column::{Column, StorageType};
use super::filter::{FilterColumn, FilterOp};
use super::order::OrderColumn;
use crate::errors::{ValidationError, ValidationResult};
use crate::record::Record;

/// Partition key column every table must declare.
pub const EVIDENCE_ID_COLUMN: &str = "evidence_id";
/// Column `delete_by_run` matches on.
pub const RUN_ID_COLUMN: &str = "run_id";

/// Pure record transform attached to a schema.
pub type RecordHook = Arc<dyn Fn(Record) -> Record + Send + Sync>;

/// What an insert does when it collides with an existing unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConflictAction {
    #[default]
    Fail,
    Ignore,
    Replace,
}

impl ConflictAction {
    /// Statement prefix for this action.
    pub fn insert_verb(self) -> &'static str {
        match self {
            Self::Fail => "INSERT",
            Self::Ignore => "INSERT OR IGNORE",
            Self::Replace => "INSERT OR REPLACE",
        }
    }
}

#[derive(Clone)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
    conflict_action: ConflictAction,
    sortable_columns: Vec<String>,
    default_order: Vec<OrderColumn>,
    filterable_columns: Vec<FilterColumn>,
    supports_run_delete: bool,
    pre_insert_hook: Option<RecordHook>,
    post_fetch_hook: Option<RecordHook>,
}

impl TableSchema {
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn conflict_action(&self) -> ConflictAction {
        self.conflict_action
    }

    pub fn sortable_columns(&self) -> &[String] {
        &self.sortable_columns
    }

    pub fn is_sortable(&self, name: &str) -> bool {
        self.sortable_columns.iter().any(|c| c == name)
    }

    pub fn default_order(&self) -> &[OrderColumn] {
        &self.default_order
    }

    pub fn filterable_columns(&self) -> &[FilterColumn] {
        &self.filterable_columns
    }

    pub fn filter_column(&self, name: &str) -> Option<&FilterColumn> {
        self.filterable_columns.iter().find(|fc| fc.name() == name)
    }

    pub fn supports_run_delete(&self) -> bool {
        self.supports_run_delete
    }

    pub fn pre_insert_hook(&self) -> Option<&RecordHook> {
        self.pre_insert_hook.as_ref()
    }

    pub fn post_fetch_hook(&self) -> Option<&RecordHook> {
        self.post_fetch_hook.as_ref()
    }

    /// Columns written by the insert path, in declaration order.
    pub fn insert_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_auto_increment())
    }

    /// Columns returned by `get_rows`, in declaration order.
    pub fn select_columns(&self, include_excluded: bool) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(move |c| include_excluded || !c.is_excluded_from_select())
    }

    /// Declared column defaults.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .filter_map(|c| c.default().map(|d| (c.name(), d)))
    }
}

impl fmt::Debug for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSchema")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("conflict_action", &self.conflict_action)
            .field("sortable_columns", &self.sortable_columns)
            .field("default_order", &self.default_order)
            .field("filterable_columns", &self.filterable_columns)
            .field("supports_run_delete", &self.supports_run_delete)
            .field("pre_insert_hook", &self.pre_insert_hook.is_some())
            .field("post_fetch_hook", &self.post_fetch_hook.is_some())
            .finish()
    }
}

/// Builder for [`TableSchema`].
pub struct TableSchemaBuilder {
    name: String,
    columns: Vec<Column>,
    conflict_action: ConflictAction,
    sortable_columns: Vec<String>,
    default_order: Vec<OrderColumn>,
    filterable_columns: Vec<FilterColumn>,
    supports_run_delete: bool,
    pre_insert_hook: Option<RecordHook>,
    post_fetch_hook: Option<RecordHook>,
}

impl TableSchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            conflict_action: ConflictAction::default(),
            sortable_columns: Vec::new(),
            default_order: Vec::new(),
            filterable_columns: Vec::new(),
            supports_run_delete: false,
            pre_insert_hook: None,
            post_fetch_hook: None,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn conflict_action(mut self, action: ConflictAction) -> Self {
        self.conflict_action = action;
        self
    }

    pub fn sortable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable_columns.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn default_order(mut self, order: impl IntoIterator<Item = OrderColumn>) -> Self {
        self.default_order.extend(order);
        self
    }

    pub fn filterable(mut self, name: impl Into<String>, ops: impl IntoIterator<Item = FilterOp>) -> Self {
        self.filterable_columns.push(FilterColumn::new(name, ops));
        self
    }

    pub fn filter_column(mut self, column: FilterColumn) -> Self {
        self.filterable_columns.push(column);
        self
    }

    pub fn supports_run_delete(mut self, enabled: bool) -> Self {
        self.supports_run_delete = enabled;
        self
    }

    pub fn pre_insert_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        self.pre_insert_hook = Some(Arc::new(hook));
        self
    }

    pub fn post_fetch_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        self.post_fetch_hook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> ValidationResult<TableSchema> {
        let table = self.name.as_str();
        if !is_identifier(table) {
            return Err(ValidationError::schema(table, "table name is not a plain identifier"));
        }
        if self.columns.is_empty() {
            return Err(ValidationError::schema(table, "no columns declared"));
        }

        let mut declared = BTreeSet::new();
        for column in &self.columns {
            let name = column.name();
            if !is_identifier(name) {
                return Err(ValidationError::schema(
                    table,
                    format!("column name '{name}' is not a plain identifier"),
                ));
            }
            if !declared.insert(name) {
                return Err(ValidationError::schema(table, format!("duplicate column '{name}'")));
            }
            if column.is_auto_increment() && column.storage_type() != StorageType::Integer {
                return Err(ValidationError::schema(
                    table,
                    format!("auto-increment column '{name}' must be INTEGER"),
                ));
            }
        }

        if self.columns.iter().filter(|c| c.is_auto_increment()).count() > 1 {
            return Err(ValidationError::schema(table, "more than one auto-increment column"));
        }
        match self.columns.iter().find(|c| c.name() == EVIDENCE_ID_COLUMN) {
            None => {
                return Err(ValidationError::schema(
                    table,
                    format!("missing '{EVIDENCE_ID_COLUMN}' column"),
                ))
            }
            Some(c) if c.is_auto_increment() => {
                return Err(ValidationError::schema(
                    table,
                    format!("'{EVIDENCE_ID_COLUMN}' cannot be auto-increment"),
                ))
            }
            Some(_) => {}
        }
        if self.supports_run_delete && !declared.contains(RUN_ID_COLUMN) {
            return Err(ValidationError::schema(
                table,
                format!("run-based deletion requires a '{RUN_ID_COLUMN}' column"),
            ));
        }

        let mut sortable = BTreeSet::new();
        for name in &self.sortable_columns {
            if !declared.contains(name.as_str()) {
                return Err(ValidationError::schema(
                    table,
                    format!("sortable column '{name}' is not declared"),
                ));
            }
            if !sortable.insert(name.as_str()) {
                return Err(ValidationError::schema(
                    table,
                    format!("sortable column '{name}' listed twice"),
                ));
            }
        }
        for key in &self.default_order {
            if !sortable.contains(key.name.as_str()) {
                return Err(ValidationError::schema(
                    table,
                    format!("default order column '{}' is not sortable", key.name),
                ));
            }
        }

        let mut filterable = BTreeSet::new();
        for fc in &self.filterable_columns {
            let name = fc.name();
            if !declared.contains(name) {
                return Err(ValidationError::schema(
                    table,
                    format!("filterable column '{name}' is not declared"),
                ));
            }
            if fc.ops().is_empty() {
                return Err(ValidationError::schema(
                    table,
                    format!("filterable column '{name}' permits no operators"),
                ));
            }
            if !filterable.insert(name) {
                return Err(ValidationError::schema(
                    table,
                    format!("filterable column '{name}' listed twice"),
                ));
            }
        }

        Ok(TableSchema {
            name: self.name,
            columns: self.columns,
            conflict_action: self.conflict_action,
            sortable_columns: self.sortable_columns,
            default_order: self.default_order,
            filterable_columns: self.filterable_columns,
            supports_run_delete: self.supports_run_delete,
            pre_insert_hook: self.pre_insert_hook,
            post_fetch_hook: self.post_fetch_hook,
        })
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TableSchemaBuilder {
        TableSchema::builder("items")
            .column(Column::integer("id").auto_increment())
            .column(Column::integer("evidence_id").not_null())
            .column(Column::text("name").not_null())
            .column(Column::integer("score").default_value(0))
            .column(Column::text("run_id"))
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("evidence_id"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("name; DROP TABLE x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("naïve"));
    }

    #[test]
    fn conflict_verbs() {
        assert_eq!(ConflictAction::Fail.insert_verb(), "INSERT");
        assert_eq!(ConflictAction::Ignore.insert_verb(), "INSERT OR IGNORE");
        assert_eq!(ConflictAction::Replace.insert_verb(), "INSERT OR REPLACE");
        assert_eq!(ConflictAction::default(), ConflictAction::Fail);
    }

    #[test]
    fn insert_columns_skip_auto_increment() {
        let schema = base().build().unwrap();
        let names: Vec<_> = schema.insert_columns().map(Column::name).collect();
        assert_eq!(names, ["evidence_id", "name", "score", "run_id"]);
    }

    #[test]
    fn default_order_must_be_sortable() {
        let err = base()
            .sortable(["name"])
            .default_order([OrderColumn::desc("score")])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("default order column 'score' is not sortable"));
    }

    #[test]
    fn debug_hides_hook_bodies() {
        let schema = base().pre_insert_hook(|r| r).build().unwrap();
        let rendered = format!("{schema:?}");
        assert!(rendered.contains("pre_insert_hook: true"));
        assert!(rendered.contains("post_fetch_hook: false"));
    }
}
