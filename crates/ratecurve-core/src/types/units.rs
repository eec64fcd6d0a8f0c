//! Units in which term values are expressed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Unit of a term value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermUnits {
    /// Days (business or calendar, depending on the day count).
    Day,
    /// Calendar months.
    Month,
    /// Years.
    Year,
}

impl TermUnits {
    /// Singular name, e.g. `"day"`.
    #[must_use]
    pub fn singular(&self) -> &'static str {
        match self {
            TermUnits::Day => "day",
            TermUnits::Month => "month",
            TermUnits::Year => "year",
        }
    }

    /// Plural name, e.g. `"days"`.
    #[must_use]
    pub fn plural(&self) -> &'static str {
        match self {
            TermUnits::Day => "days",
            TermUnits::Month => "months",
            TermUnits::Year => "years",
        }
    }
}

impl fmt::Display for TermUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.singular())
    }
}

impl FromStr for TermUnits {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" => Ok(TermUnits::Day),
            "month" | "months" => Ok(TermUnits::Month),
            "year" | "years" => Ok(TermUnits::Year),
            other => Err(CoreError::invalid_argument(format!(
                "unknown term units '{other}'"
            ))),
        }
    }
}
