//! Interest compounding conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Interest compounding convention.
///
/// `periods` is always expressed in years (the time factor produced by a
/// day count convention).
///
/// # Example
///
/// ```rust
/// use ratecurve_core::types::Compounding;
///
/// let factor = Compounding::Discrete.compound(2.0, 0.05);
/// assert!((factor - 1.1025).abs() < 1e-12);
/// assert!((Compounding::Discrete.implied_rate(2.0, factor) - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    /// Simple interest: `1 + r*t`.
    Simple,
    /// Annually compounded interest: `(1 + r)^t`.
    #[serde(alias = "compounded")]
    Discrete,
    /// Continuous compounding: `exp(r*t)`.
    #[default]
    Continuous,
}

impl Compounding {
    /// All compounding variants.
    pub const ALL: [Compounding; 3] = [
        Compounding::Simple,
        Compounding::Discrete,
        Compounding::Continuous,
    ];

    /// Returns the compounding factor for `rate` held over `periods` years.
    #[must_use]
    pub fn compound(&self, periods: f64, rate: f64) -> f64 {
        match self {
            Compounding::Simple => 1.0 + rate * periods,
            Compounding::Discrete => (1.0 + rate).powf(periods),
            Compounding::Continuous => (rate * periods).exp(),
        }
    }

    /// Returns the rate that produces `factor` over `periods` years.
    ///
    /// Not defined for `periods == 0`; the result is then non-finite.
    #[must_use]
    pub fn implied_rate(&self, periods: f64, factor: f64) -> f64 {
        match self {
            Compounding::Simple => (factor - 1.0) / periods,
            Compounding::Discrete => factor.powf(1.0 / periods) - 1.0,
            Compounding::Continuous => factor.ln() / periods,
        }
    }

    /// Returns the discount factor `1 / compound(periods, rate)`.
    #[must_use]
    pub fn discount(&self, periods: f64, rate: f64) -> f64 {
        1.0 / self.compound(periods, rate)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Compounding::Simple => "simple",
            Compounding::Discrete => "discrete",
            Compounding::Continuous => "continuous",
        }
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Compounding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(Compounding::Simple),
            "discrete" | "compounded" => Ok(Compounding::Discrete),
            "continuous" => Ok(Compounding::Continuous),
            other => Err(CoreError::invalid_argument(format!(
                "unknown compounding '{other}'"
            ))),
        }
    }
}
