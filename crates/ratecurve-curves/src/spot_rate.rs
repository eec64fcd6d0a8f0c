//! Spot rates tagged with their compounding, day count and calendar.
//!
//! Two [`SpotRate`] values can only be combined when their
//! [`RateConvention`]s are identical. Arithmetic, ordering and
//! concatenation fail with [`CurveError::SlotMismatch`] otherwise, while
//! [`SpotRate::eq_values`] and [`SpotRate::ne_values`] fold the mismatch
//! into their result instead of failing. Plain numbers are always accepted
//! and act on the numeric part only.
//!
//! ```rust
//! use ratecurve_curves::spot_rate::{Operand, SpotRate};
//!
//! let a = SpotRate::from_names(vec![0.05], "discrete", "business/252", "actual").unwrap();
//! let b = SpotRate::from_names(vec![0.05], "continuous", "business/252", "actual").unwrap();
//!
//! assert!(a.add(Operand::Rate(&b)).is_err());
//! assert_eq!(a.eq_values(Operand::Rate(&b)).unwrap(), vec![false]);
//! assert!((a.add(Operand::Scalar(0.01)).unwrap().values()[0] - 0.06).abs() < 1e-12);
//! ```

use std::fmt;
use std::str::FromStr;

use ratecurve_core::{Compounding, DayCountConvention};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::term::{broadcast, mask_values, select_values, Term};

/// The convention triple every spot rate carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateConvention {
    /// Compounding regime.
    pub compounding: Compounding,
    /// Day count used to turn terms into compounding periods.
    pub daycount: DayCountConvention,
    /// Calendar name.
    pub calendar: String,
}

impl RateConvention {
    /// Creates a convention.
    #[must_use]
    pub fn new(
        compounding: Compounding,
        daycount: DayCountConvention,
        calendar: impl Into<String>,
    ) -> Self {
        Self {
            compounding,
            daycount,
            calendar: calendar.into(),
        }
    }

    /// Creates a convention from compounding and day count names.
    pub fn from_names(compounding: &str, daycount: &str, calendar: &str) -> CurveResult<Self> {
        Ok(Self::new(
            compounding.parse()?,
            daycount.parse()?,
            calendar.trim(),
        ))
    }
}

impl fmt::Display for RateConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.compounding, self.daycount, self.calendar)
    }
}

/// Right-hand side of spot rate arithmetic and comparison.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Another spot rate; conventions must match.
    Rate(&'a SpotRate),
    /// A scalar applied to every element.
    Scalar(f64),
    /// Element-wise values; length must match or be 1.
    Values(&'a [f64]),
}

impl<'a> From<&'a SpotRate> for Operand<'a> {
    fn from(rate: &'a SpotRate) -> Self {
        Operand::Rate(rate)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(values: &'a [f64]) -> Self {
        Operand::Values(values)
    }
}

/// A vector of annualized rates under one convention.
///
/// `NaN` marks a missing rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotRate {
    values: Vec<f64>,
    convention: RateConvention,
}

impl SpotRate {
    /// Creates spot rates from convention instances.
    #[must_use]
    pub fn new(
        values: Vec<f64>,
        compounding: Compounding,
        daycount: DayCountConvention,
        calendar: impl Into<String>,
    ) -> Self {
        Self::with_convention(values, RateConvention::new(compounding, daycount, calendar))
    }

    /// Creates spot rates under an existing convention.
    #[must_use]
    pub fn with_convention(values: Vec<f64>, convention: RateConvention) -> Self {
        Self { values, convention }
    }

    /// Creates spot rates from convention names.
    pub fn from_names(
        values: Vec<f64>,
        compounding: &str,
        daycount: &str,
        calendar: &str,
    ) -> CurveResult<Self> {
        Ok(Self::with_convention(
            values,
            RateConvention::from_names(compounding, daycount, calendar)?,
        ))
    }

    /// Implied rates from compounding factors over `term`.
    pub fn from_factors(
        factors: &[f64],
        term: &Term,
        convention: RateConvention,
    ) -> CurveResult<Self> {
        let periods = nonzero_periods(term, convention.daycount)?;
        let compounding = convention.compounding;
        let values = broadcast(factors, periods, |cf, p| compounding.implied_rate(p, cf))?;
        Ok(Self::with_convention(values, convention))
    }

    /// Returns the numeric values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the convention.
    pub fn convention(&self) -> &RateConvention {
        &self.convention
    }

    /// Returns the compounding regime.
    pub fn compounding(&self) -> Compounding {
        self.convention.compounding
    }

    /// Returns the day count convention.
    pub fn daycount(&self) -> DayCountConvention {
        self.convention.daycount
    }

    /// Returns the calendar name.
    pub fn calendar(&self) -> &str {
        &self.convention.calendar
    }

    /// Returns the number of rates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no rates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the rate at `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Flags missing (`NaN`) entries.
    pub fn is_missing(&self) -> Vec<bool> {
        self.values.iter().map(|v| v.is_nan()).collect()
    }

    /// Returns true if `other` carries the same convention.
    pub fn same_convention(&self, other: &SpotRate) -> bool {
        self.convention == other.convention
    }

    /// Element-wise sum.
    pub fn add<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Self> {
        self.arithmetic(operand.into(), |a, b| a + b)
    }

    /// Element-wise difference.
    pub fn sub<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Self> {
        self.arithmetic(operand.into(), |a, b| a - b)
    }

    /// Element-wise product.
    pub fn mul<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Self> {
        self.arithmetic(operand.into(), |a, b| a * b)
    }

    /// Element-wise quotient.
    pub fn div<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Self> {
        self.arithmetic(operand.into(), |a, b| a / b)
    }

    /// Element-wise `<`.
    pub fn lt<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Vec<bool>> {
        broadcast(&self.values, self.strict_values(operand.into())?, |a, b| a < b)
    }

    /// Element-wise `<=`.
    pub fn le<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Vec<bool>> {
        broadcast(&self.values, self.strict_values(operand.into())?, |a, b| a <= b)
    }

    /// Element-wise `>`.
    pub fn gt<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Vec<bool>> {
        broadcast(&self.values, self.strict_values(operand.into())?, |a, b| a > b)
    }

    /// Element-wise `>=`.
    pub fn ge<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Vec<bool>> {
        broadcast(&self.values, self.strict_values(operand.into())?, |a, b| a >= b)
    }

    /// Element-wise equality AND-ed with the convention match.
    ///
    /// Never fails on a convention mismatch: the result is then all false.
    pub fn eq_values<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Vec<bool>> {
        let (rhs, matches) = self.loose_values(operand.into());
        broadcast(&self.values, rhs, |a, b| matches && a == b)
    }

    /// Element-wise inequality OR-ed with the convention mismatch.
    ///
    /// Never fails on a convention mismatch: the result is then all true.
    pub fn ne_values<'a>(&self, operand: impl Into<Operand<'a>>) -> CurveResult<Vec<bool>> {
        let (rhs, matches) = self.loose_values(operand.into());
        broadcast(&self.values, rhs, |a, b| !matches || a != b)
    }

    /// Appends the values of every operand.
    ///
    /// Spot rate operands must match this convention; numbers are absorbed
    /// as same-convention values.
    pub fn concat(&self, others: &[Operand<'_>]) -> CurveResult<Self> {
        let mut values = self.values.clone();
        for operand in others {
            values.extend(self.strict_values(*operand)?);
        }
        Ok(Self::with_convention(values, self.convention.clone()))
    }

    /// Selects rates by position.
    pub fn select(&self, positions: &[usize]) -> CurveResult<Self> {
        Ok(Self::with_convention(
            select_values(&self.values, positions)?,
            self.convention.clone(),
        ))
    }

    /// Selects rates where `mask` is true.
    pub fn select_mask(&self, mask: &[bool]) -> CurveResult<Self> {
        Ok(Self::with_convention(
            mask_values(&self.values, mask)?,
            self.convention.clone(),
        ))
    }

    /// Returns a copy with the rates at `positions` replaced.
    ///
    /// A single value is broadcast over all positions.
    pub fn replace(&self, positions: &[usize], values: &[f64]) -> CurveResult<Self> {
        if values.len() != 1 && values.len() != positions.len() {
            return Err(CurveError::invalid_argument(format!(
                "expected 1 or {} replacement values, got {}",
                positions.len(),
                values.len()
            )));
        }

        let mut result = self.values.clone();
        for (k, &i) in positions.iter().enumerate() {
            let slot = result.get_mut(i).ok_or_else(|| {
                CurveError::invalid_argument(format!(
                    "position {i} out of range for length {}",
                    self.values.len()
                ))
            })?;
            *slot = if values.len() == 1 { values[0] } else { values[k] };
        }
        Ok(Self::with_convention(result, self.convention.clone()))
    }

    /// Compounding factors over `term` under this convention.
    pub fn compound(&self, term: &Term) -> CurveResult<Vec<f64>> {
        let compounding = self.compounding();
        broadcast(&self.values, term.to_years(self.daycount()), |r, p| {
            compounding.compound(p, r)
        })
    }

    /// Discount factors over `term` under this convention.
    pub fn discount(&self, term: &Term) -> CurveResult<Vec<f64>> {
        Ok(self.compound(term)?.into_iter().map(|cf| 1.0 / cf).collect())
    }

    /// Equivalent rates under `target` over the same term.
    ///
    /// ```rust
    /// use ratecurve_core::{Compounding, DayCountConvention};
    /// use ratecurve_curves::spot_rate::{RateConvention, SpotRate};
    /// use ratecurve_curves::term::Term;
    ///
    /// let rate = SpotRate::new(vec![0.05], Compounding::Discrete, DayCountConvention::Actual365, "actual");
    /// let target = RateConvention::new(Compounding::Continuous, DayCountConvention::Actual365, "actual");
    /// let converted = rate.convert(&Term::years(vec![2.0]), &target).unwrap();
    /// assert!((converted.values()[0] - 1.05f64.ln()).abs() < 1e-12);
    /// ```
    pub fn convert(&self, term: &Term, target: &RateConvention) -> CurveResult<Self> {
        let factors = self.compound(term)?;
        Self::from_factors(&factors, term, target.clone())
    }

    fn arithmetic(&self, operand: Operand<'_>, f: impl Fn(f64, f64) -> f64) -> CurveResult<Self> {
        let values = broadcast(&self.values, self.strict_values(operand)?, f)?;
        Ok(Self::with_convention(values, self.convention.clone()))
    }

    /// Operand values, failing on a convention mismatch.
    fn strict_values(&self, operand: Operand<'_>) -> CurveResult<Vec<f64>> {
        match operand {
            Operand::Rate(other) if !self.same_convention(other) => Err(
                CurveError::slot_mismatch(self.convention.to_string(), other.convention.to_string()),
            ),
            other => Ok(self.loose_values(other).0),
        }
    }

    /// Operand values plus whether the conventions match.
    fn loose_values(&self, operand: Operand<'_>) -> (Vec<f64>, bool) {
        match operand {
            Operand::Rate(other) => (other.values.clone(), self.same_convention(other)),
            Operand::Scalar(x) => (vec![x], true),
            Operand::Values(v) => (v.to_vec(), true),
        }
    }
}

fn nonzero_periods(term: &Term, daycount: DayCountConvention) -> CurveResult<Vec<f64>> {
    let periods = term.to_years(daycount);
    if periods.iter().any(|p| *p == 0.0) {
        return Err(CurveError::invalid_argument(
            "implied rate is undefined over a zero-length term",
        ));
    }
    Ok(periods)
}

impl fmt::Display for SpotRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|v| format!("{v} {}", self.convention))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl FromStr for SpotRate {
    type Err = CurveError;

    /// Parses `"<rate> <compounding> <daycount> <calendar>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [rate, compounding, daycount, calendar] = tokens.as_slice() else {
            return Err(CurveError::invalid_argument(format!(
                "cannot parse spot rate '{s}': expected '<rate> <compounding> <daycount> <calendar>'"
            )));
        };

        let value: f64 = rate
            .parse()
            .map_err(|_| CurveError::invalid_argument(format!("invalid rate value '{rate}'")))?;

        Self::from_names(vec![value], compounding, daycount, calendar)
    }
}

/// Result of parsing a batch of spot rate strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSpotRates {
    /// Every entry shares one convention.
    Uniform(SpotRate),
    /// Entries differ in convention; one spot rate per entry.
    Mixed(Vec<SpotRate>),
}

/// Parses several spot rate strings.
///
/// When every entry has the same convention the rates are collected into a
/// single vector, otherwise each entry is returned separately.
///
/// ```rust
/// use ratecurve_curves::spot_rate::{parse_spot_rates, ParsedSpotRates};
///
/// let parsed = parse_spot_rates(&["0.05 discrete business/252 actual", "0.06 discrete business/252 actual"]).unwrap();
/// assert!(matches!(parsed, ParsedSpotRates::Uniform(ref r) if r.len() == 2));
/// ```
pub fn parse_spot_rates(inputs: &[&str]) -> CurveResult<ParsedSpotRates> {
    let rates = inputs
        .iter()
        .map(|s| s.parse::<SpotRate>())
        .collect::<CurveResult<Vec<_>>>()?;

    let Some(first) = rates.first() else {
        return Err(CurveError::invalid_argument("no spot rates to parse"));
    };

    if rates.iter().all(|r| r.same_convention(first)) {
        let convention = first.convention.clone();
        let values = rates.iter().flat_map(|r| r.values.iter().copied()).collect();
        Ok(ParsedSpotRates::Uniform(SpotRate::with_convention(
            values, convention,
        )))
    } else {
        Ok(ParsedSpotRates::Mixed(rates))
    }
}
