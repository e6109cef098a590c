//! Statement text and bind parameters for validated requests.
//!
//! Only schema identifiers and direction keywords are interpolated; every
//! value is bound. Identifiers are double-quoted.

use rusqlite::types::Value;

use artifact_core::schema::{Column, FilterOp, TableSchema, EVIDENCE_ID_COLUMN, RUN_ID_COLUMN};

use crate::validate::{AcceptedFilters, AcceptedOrder};

/// A built statement ready for `prepare_cached`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// LIMIT/OFFSET window. `limit: None` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: u64,
}

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

fn to_integer(n: u64) -> Value {
    Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

/// `WHERE "evidence_id" = ? [AND <filter>]...`
fn push_where(
    sql: &mut String,
    params: &mut Vec<Value>,
    evidence_id: i64,
    filters: &AcceptedFilters<'_, '_>,
) {
    sql.push_str(&format!(" WHERE {} = ?", quote(EVIDENCE_ID_COLUMN)));
    params.push(Value::Integer(evidence_id));

    for (column, filter) in filters.iter() {
        let operands = filter.operands();
        let op = filter.op();
        if op == FilterOp::In {
            let marks = vec!["?"; operands.len()].join(", ");
            sql.push_str(&format!(" AND {} IN ({marks})", quote(column)));
        } else {
            sql.push_str(&format!(" AND {} {} ?", quote(column), op.sql()));
        }
        params.extend(operands);
    }
}

fn push_order(sql: &mut String, order: &AcceptedOrder<'_>) {
    if order.is_empty() {
        return;
    }
    let keys: Vec<String> = order
        .iter()
        .map(|(column, direction)| format!("{} {}", quote(column), direction.as_sql()))
        .collect();
    sql.push_str(&format!(" ORDER BY {}", keys.join(", ")));
}

fn push_page(sql: &mut String, params: &mut Vec<Value>, page: Page) {
    match page.limit {
        Some(limit) => {
            sql.push_str(" LIMIT ?");
            params.push(to_integer(limit));
            if page.offset > 0 {
                sql.push_str(" OFFSET ?");
                params.push(to_integer(page.offset));
            }
        }
        // SQLite only accepts OFFSET after a LIMIT; -1 is unbounded.
        None if page.offset > 0 => {
            sql.push_str(" LIMIT -1 OFFSET ?");
            params.push(to_integer(page.offset));
        }
        None => {}
    }
}

/// `SELECT <columns> FROM t WHERE ... [ORDER BY ...] [LIMIT ? [OFFSET ?]]`
pub fn select(
    schema: &TableSchema,
    evidence_id: i64,
    columns: &[&Column],
    filters: &AcceptedFilters<'_, '_>,
    order: &AcceptedOrder<'_>,
    page: Page,
) -> Statement {
    let projection: Vec<String> = columns.iter().map(|c| quote(c.name())).collect();
    let mut sql = format!("SELECT {} FROM {}", projection.join(", "), quote(schema.name()));
    let mut params = Vec::with_capacity(1 + filters.len() + 2);

    push_where(&mut sql, &mut params, evidence_id, filters);
    push_order(&mut sql, order);
    push_page(&mut sql, &mut params, page);

    Statement { sql, params }
}

/// `SELECT COUNT(*) FROM t WHERE ...`
pub fn count(schema: &TableSchema, evidence_id: i64, filters: &AcceptedFilters<'_, '_>) -> Statement {
    let mut sql = format!("SELECT COUNT(*) FROM {}", quote(schema.name()));
    let mut params = Vec::with_capacity(1 + filters.len());
    push_where(&mut sql, &mut params, evidence_id, filters);
    Statement { sql, params }
}

/// Non-null distinct values of one column, ascending.
pub fn distinct(schema: &TableSchema, evidence_id: i64, column: &Column) -> Statement {
    let col = quote(column.name());
    let sql = format!(
        "SELECT DISTINCT {col} FROM {} WHERE {} = ? AND {col} IS NOT NULL ORDER BY {col}",
        quote(schema.name()),
        quote(EVIDENCE_ID_COLUMN),
    );
    Statement {
        sql,
        params: vec![Value::Integer(evidence_id)],
    }
}

pub fn delete_by_run(schema: &TableSchema, evidence_id: i64, run_id: &str) -> Statement {
    let sql = format!(
        "DELETE FROM {} WHERE {} = ? AND {} = ?",
        quote(schema.name()),
        quote(EVIDENCE_ID_COLUMN),
        quote(RUN_ID_COLUMN),
    );
    Statement {
        sql,
        params: vec![Value::Integer(evidence_id), Value::Text(run_id.to_string())],
    }
}

/// Insert text for every non-auto-increment column, in declaration order.
/// Parameters come from [`crate::normalize::insert_params`].
pub fn insert(schema: &TableSchema) -> String {
    let columns: Vec<String> = schema.insert_columns().map(|c| quote(c.name())).collect();
    let marks = vec!["?"; columns.len()].join(", ");
    format!(
        "{} INTO {} ({}) VALUES ({marks})",
        schema.conflict_action().insert_verb(),
        quote(schema.name()),
        columns.join(", "),
    )
}
