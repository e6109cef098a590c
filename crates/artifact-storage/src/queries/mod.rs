//! CRUD operations over any schema-described table.
//!
//! Each function validates first, builds its statement through [`crate::sql`],
//! and only then touches the connection.

pub mod delete;
pub mod insert;
pub mod select;

pub use delete::delete_by_run;
pub use insert::{insert_row, insert_rows};
pub use select::{get_count, get_distinct_values, get_rows};

use artifact_core::schema::{Direction, Filter, FilterSpec, OrderColumn};

/// Parameters of a `get_rows` call.
///
/// `order_by: None` uses the schema's default order. `limit: Some(0)` returns
/// nothing without querying.
#[derive(Debug, Clone, Default)]
pub struct RowQuery {
    pub filters: FilterSpec,
    pub order_by: Option<Vec<OrderColumn>>,
    pub limit: Option<u64>,
    pub offset: u64,
    /// Also return columns marked `exclude_from_select`.
    pub include_excluded: bool,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the filter on `column`.
    pub fn filter(mut self, column: impl Into<String>, filter: Filter) -> Self {
        self.filters.insert(column.into(), filter);
        self
    }

    /// Append a sort key. The first call replaces the default order.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by
            .get_or_insert_with(Vec::new)
            .push(OrderColumn::new(column, direction));
        self
    }

    /// Replace the sort keys. An empty list disables ordering.
    pub fn order_by_columns(mut self, keys: impl IntoIterator<Item = OrderColumn>) -> Self {
        self.order_by = Some(keys.into_iter().collect());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn include_excluded(mut self, include: bool) -> Self {
        self.include_excluded = include;
        self
    }
}
