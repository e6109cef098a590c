//! Sort directions and ORDER BY keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            d if d.eq_ignore_ascii_case("ASC") => Ok(Self::Asc),
            d if d.eq_ignore_ascii_case("DESC") => Ok(Self::Desc),
            other => Err(ValidationError::InvalidDirection {
                direction: other.to_string(),
            }),
        }
    }
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderColumn {
    pub name: String,
    pub direction: Direction,
}

impl OrderColumn {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    pub fn asc(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Asc)
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Desc)
    }

    /// Build from a column name and a direction string such as `"desc"`.
    pub fn parse(name: impl Into<String>, direction: &str) -> ValidationResult<Self> {
        Ok(Self::new(name, direction.parse()?))
    }
}
