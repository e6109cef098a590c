//! Read path: filtered rows, counts and distinct values.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::debug;

use artifact_core::errors::StorageResult;
use artifact_core::schema::{Column, FilterSpec, TableSchema};
use artifact_core::Record;

use super::RowQuery;
use crate::sql::{self, Page};
use crate::validate::{validate_distinct_column, validate_filters, validate_order};

/// Fetch rows for `evidence_id` matching `query`.
///
/// Records are keyed by column name. The schema's post-fetch hook, if any,
/// is applied to each row.
pub fn get_rows(
    conn: &Connection,
    schema: &TableSchema,
    evidence_id: i64,
    query: &RowQuery,
) -> StorageResult<Vec<Record>> {
    let filters = validate_filters(schema, &query.filters)?;
    let order = validate_order(schema, query.order_by.as_deref())?;
    if query.limit == Some(0) {
        return Ok(Vec::new());
    }

    let columns: Vec<&Column> = schema.select_columns(query.include_excluded).collect();
    let page = Page {
        limit: query.limit,
        offset: query.offset,
    };
    let statement = sql::select(schema, evidence_id, &columns, &filters, &order, page);
    debug!(
        table = schema.name(),
        sql = %statement.sql,
        params = statement.params.len(),
        "get_rows"
    );

    let mut stmt = conn.prepare_cached(&statement.sql)?;
    let mut rows = stmt.query(params_from_iter(statement.params.iter()))?;
    let hook = schema.post_fetch_hook();
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Record::new();
        for (i, column) in columns.iter().enumerate() {
            record.insert(column.name(), row.get::<_, Value>(i)?);
        }
        records.push(match hook {
            Some(hook) => hook(record),
            None => record,
        });
    }
    Ok(records)
}

/// Number of rows for `evidence_id` matching `filters`.
pub fn get_count(
    conn: &Connection,
    schema: &TableSchema,
    evidence_id: i64,
    filters: &FilterSpec,
) -> StorageResult<i64> {
    let filters = validate_filters(schema, filters)?;
    let statement = sql::count(schema, evidence_id, &filters);
    debug!(
        table = schema.name(),
        sql = %statement.sql,
        params = statement.params.len(),
        "get_count"
    );

    let mut stmt = conn.prepare_cached(&statement.sql)?;
    let count = stmt.query_row(params_from_iter(statement.params.iter()), |row| row.get(0))?;
    Ok(count)
}

/// Sorted non-null distinct values of `column` for `evidence_id`.
pub fn get_distinct_values(
    conn: &Connection,
    schema: &TableSchema,
    evidence_id: i64,
    column: &str,
) -> StorageResult<Vec<Value>> {
    let column = validate_distinct_column(schema, column)?;
    let statement = sql::distinct(schema, evidence_id, column);
    debug!(
        table = schema.name(),
        sql = %statement.sql,
        params = statement.params.len(),
        "get_distinct_values"
    );

    let mut stmt = conn.prepare_cached(&statement.sql)?;
    let values = stmt
        .query_map(params_from_iter(statement.params.iter()), |row| row.get(0))?
        .collect::<Result<Vec<Value>, _>>()?;
    Ok(values)
}
