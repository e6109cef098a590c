//! Construction-time checks on `TableSchemaBuilder`.
//!
//! A schema that builds can be handed to the engine without any further
//! identifier checks: every whitelist entry is a declared, plain identifier.

use artifact_core::schema::{
    Column, ConflictAction, FilterOp, OrderColumn, TableSchema, TableSchemaBuilder,
};
use artifact_core::ValidationError;
use proptest::prelude::*;

fn items() -> TableSchemaBuilder {
    TableSchema::builder("test_items")
        .column(Column::integer("id").auto_increment())
        .column(Column::integer("evidence_id").not_null())
        .column(Column::text("name").not_null())
        .column(Column::text("value"))
        .column(Column::integer("score").default_value(0))
        .column(Column::text("run_id"))
        .column(Column::text("created_at"))
}

fn reason(err: ValidationError) -> String {
    match err {
        ValidationError::InvalidSchema { reason, .. } => reason,
        other => panic!("expected InvalidSchema, got {other:?}"),
    }
}

#[test]
fn full_schema_builds_with_accessors() {
    let schema = items()
        .conflict_action(ConflictAction::Ignore)
        .sortable(["id", "name", "score", "created_at"])
        .default_order([OrderColumn::desc("score")])
        .filterable("name", [FilterOp::Eq, FilterOp::Like])
        .filterable("score", [FilterOp::Eq, FilterOp::Gte, FilterOp::Lte])
        .filterable("run_id", [FilterOp::Eq])
        .supports_run_delete(true)
        .build()
        .unwrap();

    assert_eq!(schema.name(), "test_items");
    assert_eq!(schema.columns().len(), 7);
    assert_eq!(schema.conflict_action(), ConflictAction::Ignore);
    assert!(schema.is_sortable("score"));
    assert!(!schema.is_sortable("value"));
    assert!(schema.filter_column("score").unwrap().allows(FilterOp::Gte));
    assert!(!schema.filter_column("name").unwrap().allows(FilterOp::Gte));
    assert!(schema.supports_run_delete());
    assert_eq!(
        schema.defaults().collect::<Vec<_>>(),
        [("score", &artifact_core::Value::Integer(0))]
    );
}

#[test]
fn whitelists_are_independent() {
    let schema = items()
        .sortable(["created_at"])
        .filterable("value", [FilterOp::Eq])
        .build()
        .unwrap();

    assert!(schema.is_sortable("created_at"));
    assert!(schema.filter_column("created_at").is_none());
    assert!(schema.filter_column("value").is_some());
    assert!(!schema.is_sortable("value"));
}

#[test]
fn rejects_undeclared_whitelist_entries() {
    let err = items().sortable(["nonexistent"]).build().unwrap_err();
    assert!(reason(err).contains("sortable column 'nonexistent' is not declared"));

    let err = items().filterable("ghost", [FilterOp::Eq]).build().unwrap_err();
    assert!(reason(err).contains("filterable column 'ghost' is not declared"));
}

#[test]
fn rejects_non_identifier_names() {
    let err = TableSchema::builder("items; DROP TABLE cookies")
        .column(Column::integer("evidence_id"))
        .build()
        .unwrap_err();
    assert!(reason(err).contains("table name"));

    let err = items().column(Column::text("a b")).build().unwrap_err();
    assert!(reason(err).contains("'a b' is not a plain identifier"));
}

#[test]
fn rejects_duplicate_columns_and_entries() {
    let err = items().column(Column::text("name")).build().unwrap_err();
    assert!(reason(err).contains("duplicate column 'name'"));

    let err = items()
        .filterable("name", [FilterOp::Eq])
        .filterable("name", [FilterOp::Like])
        .build()
        .unwrap_err();
    assert!(reason(err).contains("listed twice"));
}

#[test]
fn rejects_empty_operator_set() {
    let err = items().filterable("name", []).build().unwrap_err();
    assert!(reason(err).contains("permits no operators"));
}

#[test]
fn requires_evidence_id() {
    let err = TableSchema::builder("orphans")
        .column(Column::text("name"))
        .build()
        .unwrap_err();
    assert!(reason(err).contains("missing 'evidence_id'"));
}

#[test]
fn run_delete_requires_run_id_column() {
    let err = TableSchema::builder("no_runs")
        .column(Column::integer("evidence_id").not_null())
        .supports_run_delete(true)
        .build()
        .unwrap_err();
    assert!(reason(err).contains("'run_id'"));
}

#[test]
fn auto_increment_must_be_single_integer() {
    let err = items()
        .column(Column::text("uuid").auto_increment())
        .build()
        .unwrap_err();
    assert!(reason(err).contains("must be INTEGER"));
}

#[test]
fn excluded_columns_hidden_from_select_only() {
    let schema = items()
        .column(Column::blob("secret").exclude_from_select())
        .build()
        .unwrap();

    assert!(!schema.select_columns(false).any(|c| c.name() == "secret"));
    assert!(schema.select_columns(true).any(|c| c.name() == "secret"));
    assert!(schema.insert_columns().any(|c| c.name() == "secret"));
}

proptest! {
    /// Any column name that is not a plain identifier fails the build.
    #[test]
    fn non_identifier_column_names_never_build(name in "[a-z]{0,4}[ ;'\"()\\-][a-z]{0,4}") {
        let result = items().column(Column::text(name)).build();
        prop_assert!(result.is_err());
    }

    /// Plain identifiers always pass the name check.
    #[test]
    fn identifier_column_names_build(name in "x_[a-z0-9_]{0,12}") {
        let result = items().column(Column::text(name)).build();
        prop_assert!(result.is_ok());
    }
}
