//! Whitelist validation of caller-supplied filters, sort keys and DISTINCT
//! targets.
//!
//! The accepted types borrow their column names from the schema, not from the
//! request, and can only be constructed here. The SQL builder takes nothing
//! else, so an identifier in statement text is always a schema identifier.

use tracing::warn;

use artifact_core::errors::{ValidationError, ValidationResult};
use artifact_core::schema::{Column, Direction, Filter, FilterSpec, OrderColumn, TableSchema};

/// Filters that passed the `filterable_columns` whitelist.
#[derive(Debug, Clone, Default)]
pub struct AcceptedFilters<'s, 'f> {
    entries: Vec<(&'s str, &'f Filter)>,
}

impl<'s, 'f> AcceptedFilters<'s, 'f> {
    pub fn iter(&self) -> impl Iterator<Item = (&'s str, &'f Filter)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sort keys that passed the `sortable_columns` whitelist, in caller order.
#[derive(Debug, Clone, Default)]
pub struct AcceptedOrder<'s> {
    keys: Vec<(&'s str, Direction)>,
}

impl<'s> AcceptedOrder<'s> {
    pub fn iter(&self) -> impl Iterator<Item = (&'s str, Direction)> + '_ {
        self.keys.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn rejected(table: &str, err: ValidationError) -> ValidationError {
    warn!(table, error = %err, "rejected request");
    err
}

/// Check every filter column and operator against the schema.
pub fn validate_filters<'s, 'f>(
    schema: &'s TableSchema,
    filters: &'f FilterSpec,
) -> ValidationResult<AcceptedFilters<'s, 'f>> {
    let mut entries = Vec::with_capacity(filters.len());
    for (column, filter) in filters {
        let Some(allowed) = schema.filter_column(column) else {
            return Err(rejected(
                schema.name(),
                ValidationError::NotFilterable {
                    table: schema.name().to_string(),
                    column: column.clone(),
                },
            ));
        };
        if !allowed.allows(filter.op()) {
            return Err(rejected(
                schema.name(),
                ValidationError::OperatorNotAllowed {
                    table: schema.name().to_string(),
                    column: column.clone(),
                    op: filter.op().to_string(),
                },
            ));
        }
        entries.push((allowed.name(), filter));
    }
    Ok(AcceptedFilters { entries })
}

/// Check sort keys against `sortable_columns`. `None` substitutes the
/// schema's default order; an explicit empty slice means no ORDER BY.
pub fn validate_order<'s>(
    schema: &'s TableSchema,
    order_by: Option<&[OrderColumn]>,
) -> ValidationResult<AcceptedOrder<'s>> {
    let requested = order_by.unwrap_or_else(|| schema.default_order());
    let mut keys = Vec::with_capacity(requested.len());
    for key in requested {
        let Some(column) = schema.sortable_columns().iter().find(|c| **c == key.name) else {
            return Err(rejected(
                schema.name(),
                ValidationError::NotSortable {
                    table: schema.name().to_string(),
                    column: key.name.clone(),
                },
            ));
        };
        keys.push((column.as_str(), key.direction));
    }
    Ok(AcceptedOrder { keys })
}

/// Any declared column may be a DISTINCT target, filterable or not.
pub fn validate_distinct_column<'s>(
    schema: &'s TableSchema,
    column: &str,
) -> ValidationResult<&'s Column> {
    schema.column(column).ok_or_else(|| {
        rejected(
            schema.name(),
            ValidationError::NotDistinct {
                table: schema.name().to_string(),
                column: column.to_string(),
            },
        )
    })
}

pub fn validate_run_delete(schema: &TableSchema) -> ValidationResult<()> {
    if schema.supports_run_delete() {
        Ok(())
    } else {
        Err(rejected(
            schema.name(),
            ValidationError::RunDeleteUnsupported {
                table: schema.name().to_string(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_core::schema::FilterOp;

    fn schema() -> TableSchema {
        TableSchema::builder("test_items")
            .column(Column::integer("id").auto_increment())
            .column(Column::integer("evidence_id").not_null())
            .column(Column::text("name").not_null())
            .column(Column::text("value"))
            .column(Column::integer("score").default_value(0))
            .sortable(["name", "score"])
            .default_order([OrderColumn::desc("score")])
            .filterable("name", [FilterOp::Eq, FilterOp::Like])
            .filterable("score", [FilterOp::Gte, FilterOp::Lte])
            .build()
            .unwrap()
    }

    #[test]
    fn accepts_whitelisted_filters() {
        let schema = schema();
        let mut filters = FilterSpec::new();
        filters.insert("name".into(), Filter::like("a%"));
        filters.insert("score".into(), Filter::gte(5));

        let accepted = validate_filters(&schema, &filters).unwrap();
        let columns: Vec<_> = accepted.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, ["name", "score"]);
    }

    #[test]
    fn rejects_unlisted_column() {
        let schema = schema();
        let mut filters = FilterSpec::new();
        filters.insert("value".into(), Filter::eq("x"));

        let err = validate_filters(&schema, &filters).unwrap_err();
        assert!(err.to_string().starts_with("value is not filterable"));
    }

    #[test]
    fn rejects_unlisted_operator() {
        let schema = schema();
        let mut filters = FilterSpec::new();
        filters.insert("name".into(), Filter::gte("a"));

        let err = validate_filters(&schema, &filters).unwrap_err();
        assert!(err.to_string().starts_with("GTE is not allowed for name"));
    }

    #[test]
    fn default_order_substituted_when_absent() {
        let schema = schema();
        let order = validate_order(&schema, None).unwrap();
        assert_eq!(order.iter().collect::<Vec<_>>(), [("score", Direction::Desc)]);

        let none = validate_order(&schema, Some(&[][..])).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn rejects_unsortable_key_anywhere_in_list() {
        let schema = schema();
        let keys = [OrderColumn::asc("name"), OrderColumn::desc("value")];
        let err = validate_order(&schema, Some(&keys[..])).unwrap_err();
        assert!(err.to_string().starts_with("value is not allowed for ORDER BY"));
    }

    #[test]
    fn distinct_accepts_any_declared_column() {
        let schema = schema();
        assert_eq!(validate_distinct_column(&schema, "value").unwrap().name(), "value");
        let err = validate_distinct_column(&schema, "nonexistent").unwrap_err();
        assert!(err.to_string().contains("not allowed for DISTINCT"));
    }

    #[test]
    fn run_delete_requires_opt_in() {
        let err = validate_run_delete(&schema()).unwrap_err();
        assert_eq!(err.to_string(), "test_items does not support run-based deletion");
    }
}
