//! Filter operators, typed filter operands and per-column operator whitelists.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::record::IntoValue;

/// Comparison operators a filter may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterOp {
    Eq,
    Neq,
    Like,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    pub const ALL: [FilterOp; 8] = [
        Self::Eq,
        Self::Neq,
        Self::Like,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Like => "LIKE",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::In => "IN",
        }
    }

    /// SQL operator keyword.
    pub fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Like => "LIKE",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts operator names (`GTE`) or SQL symbols (`>=`), case-insensitive.
impl FromStr for FilterOp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FilterOp::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s) || op.sql() == s)
            .or(if s == "<>" { Some(Self::Neq) } else { None })
            .ok_or_else(|| ValidationError::UnknownOperator { op: s.to_string() })
    }
}

/// An operator paired with its operand. `LIKE` patterns are bound verbatim;
/// the caller supplies any `%` wildcards.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(Value),
    Neq(Value),
    Like(String),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
}

impl Filter {
    pub fn eq(value: impl IntoValue) -> Self {
        Self::Eq(value.into_value())
    }

    pub fn neq(value: impl IntoValue) -> Self {
        Self::Neq(value.into_value())
    }

    pub fn like(pattern: impl Into<String>) -> Self {
        Self::Like(pattern.into())
    }

    pub fn gt(value: impl IntoValue) -> Self {
        Self::Gt(value.into_value())
    }

    pub fn gte(value: impl IntoValue) -> Self {
        Self::Gte(value.into_value())
    }

    pub fn lt(value: impl IntoValue) -> Self {
        Self::Lt(value.into_value())
    }

    pub fn lte(value: impl IntoValue) -> Self {
        Self::Lte(value.into_value())
    }

    pub fn is_in<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoValue,
    {
        Self::In(values.into_iter().map(IntoValue::into_value).collect())
    }

    pub fn op(&self) -> FilterOp {
        match self {
            Self::Eq(_) => FilterOp::Eq,
            Self::Neq(_) => FilterOp::Neq,
            Self::Like(_) => FilterOp::Like,
            Self::Gt(_) => FilterOp::Gt,
            Self::Gte(_) => FilterOp::Gte,
            Self::Lt(_) => FilterOp::Lt,
            Self::Lte(_) => FilterOp::Lte,
            Self::In(_) => FilterOp::In,
        }
    }

    /// Operands in bind order.
    pub fn operands(&self) -> Vec<Value> {
        match self {
            Self::Eq(v) | Self::Neq(v) | Self::Gt(v) | Self::Gte(v) | Self::Lt(v) | Self::Lte(v) => {
                vec![v.clone()]
            }
            Self::Like(pattern) => vec![Value::Text(pattern.clone())],
            Self::In(values) => values.clone(),
        }
    }
}

/// Column name → filter. Entries are AND-combined; a column appears at most once.
pub type FilterSpec = BTreeMap<String, Filter>;

/// A filterable column and the operators permitted on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterColumn {
    name: String,
    ops: BTreeSet<FilterOp>,
}

impl FilterColumn {
    pub fn new(name: impl Into<String>, ops: impl IntoIterator<Item = FilterOp>) -> Self {
        Self {
            name: name.into(),
            ops: ops.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ops(&self) -> &BTreeSet<FilterOp> {
        &self.ops
    }

    pub fn allows(&self, op: FilterOp) -> bool {
        self.ops.contains(&op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_symbols() {
        assert_eq!("gte".parse::<FilterOp>().unwrap(), FilterOp::Gte);
        assert_eq!(">=".parse::<FilterOp>().unwrap(), FilterOp::Gte);
        assert_eq!("<>".parse::<FilterOp>().unwrap(), FilterOp::Neq);
        assert_eq!(" like ".parse::<FilterOp>().unwrap(), FilterOp::Like);
        assert!(matches!(
            "BETWEEN".parse::<FilterOp>(),
            Err(ValidationError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn like_pattern_is_not_rewritten() {
        let filter = Filter::like("%google%");
        assert_eq!(filter.op(), FilterOp::Like);
        assert_eq!(filter.operands(), vec![Value::Text("%google%".to_string())]);

        let plain = Filter::like("google");
        assert_eq!(plain.operands(), vec![Value::Text("google".to_string())]);
    }

    #[test]
    fn in_filter_expands_operands() {
        let filter = Filter::is_in(["chrome", "edge"]);
        assert_eq!(filter.op(), FilterOp::In);
        assert_eq!(filter.operands().len(), 2);
    }
}
