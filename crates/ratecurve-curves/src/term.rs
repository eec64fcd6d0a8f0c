//! Time spans measured in days, months or years.
//!
//! A [`Term`] is a vector of values sharing one unit. A [`DateRangeTerm`]
//! derives its values from pairs of dates as business-day counts under a
//! calendar.
//!
//! Terms format as `"<number> <unit>[s]"` per element, pluralizing the unit
//! when the magnitude exceeds one, and parse back from the same form:
//!
//! ```rust
//! use ratecurve_curves::term::Term;
//! use ratecurve_core::TermUnits;
//!
//! let term: Term = "6 months".parse().unwrap();
//! assert_eq!(term.values(), &[6.0]);
//! assert_eq!(term.units(), TermUnits::Month);
//! assert_eq!(term.to_string(), "6 months");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ratecurve_core::calendars::{Calendar, CalendarRegistry};
use ratecurve_core::{Date, DayCountConvention, TermUnits};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Right-hand side of term arithmetic and comparison.
#[derive(Debug, Clone, Copy)]
pub enum TermOperand<'a> {
    /// Another term. Always rejected: mixing units is ambiguous.
    Term(&'a Term),
    /// A scalar applied to every element.
    Scalar(f64),
    /// Element-wise values; length must match or be 1.
    Values(&'a [f64]),
}

/// A sequence of time spans sharing one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    values: Vec<f64>,
    units: TermUnits,
}

impl Term {
    /// Creates a term from values and a unit.
    #[must_use]
    pub fn new(values: Vec<f64>, units: TermUnits) -> Self {
        Self { values, units }
    }

    /// Creates a single-element term.
    #[must_use]
    pub fn single(value: f64, units: TermUnits) -> Self {
        Self::new(vec![value], units)
    }

    /// Creates a term in days.
    #[must_use]
    pub fn days(values: Vec<f64>) -> Self {
        Self::new(values, TermUnits::Day)
    }

    /// Creates a term in months.
    #[must_use]
    pub fn months(values: Vec<f64>) -> Self {
        Self::new(values, TermUnits::Month)
    }

    /// Creates a term in years.
    #[must_use]
    pub fn years(values: Vec<f64>) -> Self {
        Self::new(values, TermUnits::Year)
    }

    /// Creates a term from unit names.
    ///
    /// Either a single name is broadcast over all values or one name is
    /// given per value; singular and plural spellings are accepted but all
    /// names must resolve to the same unit.
    pub fn from_unit_names(values: Vec<f64>, names: &[&str]) -> CurveResult<Self> {
        if names.is_empty() {
            return Err(CurveError::invalid_argument("no term unit given"));
        }
        if names.len() != 1 && names.len() != values.len() {
            return Err(CurveError::invalid_argument(format!(
                "expected 1 or {} unit names, got {}",
                values.len(),
                names.len()
            )));
        }

        let units = names
            .iter()
            .map(|name| name.parse::<TermUnits>())
            .collect::<Result<Vec<_>, _>>()?;

        let first = units[0];
        if units.iter().any(|u| *u != first) {
            return Err(CurveError::invalid_argument(
                "all elements of a term must share one unit",
            ));
        }

        Ok(Self::new(values, first))
    }

    /// Returns the numeric values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the unit.
    pub fn units(&self) -> TermUnits {
        self.units
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the term has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Consumes the term, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Selects elements by position.
    pub fn select(&self, positions: &[usize]) -> CurveResult<Self> {
        Ok(Self::new(select_values(&self.values, positions)?, self.units))
    }

    /// Selects elements where `mask` is true.
    pub fn select_mask(&self, mask: &[bool]) -> CurveResult<Self> {
        Ok(Self::new(mask_values(&self.values, mask)?, self.units))
    }

    /// Shifts elements by `n` positions.
    ///
    /// Positive `n` lags (moves values towards the end), negative `n` leads.
    /// Vacated positions take `fill`.
    #[must_use]
    pub fn shift(&self, n: isize, fill: f64) -> Self {
        let len = self.values.len();
        let values = (0..len)
            .map(|i| {
                // Offsets beyond isize range always land outside the term
                isize::try_from(i)
                    .ok()
                    .and_then(|i| i.checked_sub(n))
                    .and_then(|src| usize::try_from(src).ok())
                    .and_then(|src| self.values.get(src).copied())
                    .unwrap_or(fill)
            })
            .collect();
        Self::new(values, self.units)
    }

    /// Lagged difference `v[i] - v[i - lag]`.
    ///
    /// Without `fill` the result has `len - lag` elements; with `fill` it
    /// keeps the original length and the first `lag` elements take `fill`.
    #[must_use]
    pub fn diff(&self, lag: usize, fill: Option<f64>) -> Self {
        let diffs = self
            .values
            .iter()
            .skip(lag)
            .zip(self.values.iter())
            .map(|(hi, lo)| hi - lo);

        let values = match fill {
            Some(fill) => std::iter::repeat(fill)
                .take(lag.min(self.values.len()))
                .chain(diffs)
                .collect(),
            None => diffs.collect(),
        };
        Self::new(values, self.units)
    }

    /// Adds a scalar or element-wise values. Term operands are rejected.
    pub fn add(&self, operand: TermOperand<'_>) -> CurveResult<Self> {
        self.arithmetic(operand, "add", |a, b| a + b)
    }

    /// Subtracts a scalar or element-wise values. Term operands are rejected.
    pub fn sub(&self, operand: TermOperand<'_>) -> CurveResult<Self> {
        self.arithmetic(operand, "subtract", |a, b| a - b)
    }

    /// Compares every element against a scalar or element-wise values.
    ///
    /// Term operands are rejected; `None` marks NaN comparisons.
    pub fn compare(&self, operand: TermOperand<'_>) -> CurveResult<Vec<Option<Ordering>>> {
        let rhs = self.operand_values(operand, "compare")?;
        broadcast(&self.values, rhs, |a, b| a.partial_cmp(&b))
    }

    /// Converts every element to years under `daycount`.
    pub fn to_years(&self, daycount: DayCountConvention) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| daycount.time_factor(*v, self.units))
            .collect()
    }

    /// Re-expresses the term in `target` units through years under
    /// `daycount`.
    #[must_use]
    pub fn to_units(&self, target: TermUnits, daycount: DayCountConvention) -> Self {
        if target == self.units {
            return self.clone();
        }
        let values = self
            .to_years(daycount)
            .into_iter()
            .map(|y| daycount.from_time_factor(y, target))
            .collect();
        Self::new(values, target)
    }

    fn arithmetic(
        &self,
        operand: TermOperand<'_>,
        op: &str,
        f: impl Fn(f64, f64) -> f64,
    ) -> CurveResult<Self> {
        let rhs = self.operand_values(operand, op)?;
        Ok(Self::new(broadcast(&self.values, rhs, f)?, self.units))
    }

    fn operand_values<'a>(&self, operand: TermOperand<'a>, op: &str) -> CurveResult<Vec<f64>> {
        match operand {
            TermOperand::Term(_) => Err(CurveError::invalid_operation(format!(
                "cannot {op} two terms: unit semantics are ambiguous"
            ))),
            TermOperand::Scalar(x) => Ok(vec![x]),
            TermOperand::Values(v) => Ok(v.to_vec()),
        }
    }
}

fn format_element(value: f64, units: TermUnits) -> String {
    let unit = if value.abs() > 1.0 {
        units.plural()
    } else {
        units.singular()
    };
    format!("{value} {unit}")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An empty term keeps its units so it parses back unchanged
        if self.values.is_empty() {
            return write!(f, "{}", self.units.plural());
        }
        let parts: Vec<String> = self
            .values
            .iter()
            .map(|v| format_element(*v, self.units))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl FromStr for Term {
    type Err = CurveError;

    /// Parses `"<number> <unit>[s]"`, optionally several separated by
    /// commas, all in the same unit. A bare unit name is an empty term.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(units) = s.parse::<TermUnits>() {
            return Ok(Self::new(Vec::new(), units));
        }

        let mut values = Vec::new();
        let mut units: Option<TermUnits> = None;

        for part in s.split(',') {
            let mut tokens = part.split_whitespace();
            let (Some(number), Some(unit), None) = (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(CurveError::invalid_argument(format!(
                    "cannot parse term '{}': expected '<number> <unit>'",
                    part.trim()
                )));
            };

            let value: f64 = number.parse().map_err(|_| {
                CurveError::invalid_argument(format!("invalid term value '{number}'"))
            })?;
            let unit: TermUnits = unit.parse()?;

            match units {
                Some(u) if u != unit => {
                    return Err(CurveError::invalid_argument(format!(
                        "mixed term units in '{s}'"
                    )))
                }
                _ => units = Some(unit),
            }
            values.push(value);
        }

        units
            .map(|u| Self::new(values, u))
            .ok_or_else(|| CurveError::invalid_argument("empty term string"))
    }
}

/// A term in business days derived from start and end dates.
///
/// ```rust
/// use ratecurve_core::calendars::WeekendCalendar;
/// use ratecurve_core::Date;
/// use ratecurve_curves::term::DateRangeTerm;
///
/// let start = Date::from_ymd(2025, 1, 3).unwrap(); // Friday
/// let ends = [Date::from_ymd(2025, 1, 10).unwrap(), Date::from_ymd(2025, 1, 17).unwrap()];
/// let term = DateRangeTerm::new(&[start], &ends, &WeekendCalendar).unwrap();
/// assert_eq!(term.term().values(), &[5.0, 10.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeTerm {
    term: Term,
    start_dates: Vec<Date>,
    end_dates: Vec<Date>,
    calendar: String,
}

impl DateRangeTerm {
    /// Counts business days between each start and end date.
    ///
    /// A single start date is broadcast over all end dates; otherwise the
    /// lengths must match.
    pub fn new(start: &[Date], end: &[Date], calendar: &dyn Calendar) -> CurveResult<Self> {
        if start.is_empty() || end.is_empty() {
            return Err(CurveError::invalid_argument(
                "date range needs start and end dates",
            ));
        }
        if start.len() != 1 && start.len() != end.len() {
            return Err(CurveError::invalid_argument(format!(
                "expected 1 or {} start dates, got {}",
                end.len(),
                start.len()
            )));
        }

        let start_dates: Vec<Date> = if start.len() == 1 {
            vec![start[0]; end.len()]
        } else {
            start.to_vec()
        };

        let values = start_dates
            .iter()
            .zip(end)
            .map(|(s, e)| calendar.business_days_between(*s, *e) as f64)
            .collect();

        Ok(Self {
            term: Term::days(values),
            start_dates,
            end_dates: end.to_vec(),
            calendar: calendar.name().to_string(),
        })
    }

    /// Same as [`new`](Self::new), resolving the calendar by name.
    pub fn from_registry(
        start: &[Date],
        end: &[Date],
        calendar: &str,
        registry: &CalendarRegistry,
    ) -> CurveResult<Self> {
        Self::new(start, end, registry.get(calendar)?)
    }

    /// Returns the business-day term.
    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Returns the start dates, one per element.
    pub fn start_dates(&self) -> &[Date] {
        &self.start_dates
    }

    /// Returns the end dates.
    pub fn end_dates(&self) -> &[Date] {
        &self.end_dates
    }

    /// Returns the calendar name.
    pub fn calendar(&self) -> &str {
        &self.calendar
    }

    /// Consumes the range, returning the plain term.
    pub fn into_term(self) -> Term {
        self.term
    }
}

impl From<DateRangeTerm> for Term {
    fn from(range: DateRangeTerm) -> Self {
        range.into_term()
    }
}

/// Element-wise binary operation with length-1 broadcasting on either side.
pub(crate) fn broadcast<T>(
    lhs: &[f64],
    rhs: Vec<f64>,
    f: impl Fn(f64, f64) -> T,
) -> CurveResult<Vec<T>> {
    match (lhs.len(), rhs.len()) {
        (a, b) if a == b => Ok(lhs.iter().zip(&rhs).map(|(x, y)| f(*x, *y)).collect()),
        (_, 1) => Ok(lhs.iter().map(|x| f(*x, rhs[0])).collect()),
        (1, _) => Ok(rhs.iter().map(|y| f(lhs[0], *y)).collect()),
        (a, b) => Err(CurveError::invalid_argument(format!(
            "length mismatch: {a} vs {b}"
        ))),
    }
}

pub(crate) fn select_values(values: &[f64], positions: &[usize]) -> CurveResult<Vec<f64>> {
    positions
        .iter()
        .map(|&i| {
            values.get(i).copied().ok_or_else(|| {
                CurveError::invalid_argument(format!(
                    "position {i} out of range for length {}",
                    values.len()
                ))
            })
        })
        .collect()
}

pub(crate) fn mask_values(values: &[f64], mask: &[bool]) -> CurveResult<Vec<f64>> {
    if mask.len() != values.len() {
        return Err(CurveError::invalid_argument(format!(
            "mask length {} does not match length {}",
            mask.len(),
            values.len()
        )));
    }
    Ok(values
        .iter()
        .zip(mask)
        .filter_map(|(v, keep)| keep.then_some(*v))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ratecurve_core::calendars::{HolidayCalendar, WeekendCalendar};

    #[test]
    fn test_from_unit_names() {
        let term = Term::from_unit_names(vec![1.0, 2.0], &["day", "days"]).unwrap();
        assert_eq!(term.units(), TermUnits::Day);

        let term = Term::from_unit_names(vec![1.0, 2.0, 3.0], &["Months"]).unwrap();
        assert_eq!(term.units(), TermUnits::Month);

        assert!(Term::from_unit_names(vec![1.0, 2.0], &["day", "month"]).is_err());
        assert!(Term::from_unit_names(vec![1.0, 2.0, 3.0], &["day", "day"]).is_err());
        assert!(Term::from_unit_names(vec![1.0], &["week"]).is_err());
    }

    #[test]
    fn test_format() {
        let term = Term::days(vec![1.0, 21.0, 0.5, -2.0]);
        assert_eq!(term.to_string(), "1 day, 21 days, 0.5 day, -2 days");
        assert_eq!(Term::single(1.0, TermUnits::Year).to_string(), "1 year");
    }

    #[test]
    fn test_parse() {
        let term: Term = "1 year, 2 years".parse().unwrap();
        assert_eq!(term, Term::years(vec![1.0, 2.0]));

        assert!("6".parse::<Term>().is_err());
        assert!("six months".parse::<Term>().is_err());
        assert!("6 fortnights".parse::<Term>().is_err());
        assert!("1 day, 1 month".parse::<Term>().is_err());
        assert!("".parse::<Term>().is_err());
    }

    #[test]
    fn test_empty_term_round_trip() {
        for units in [TermUnits::Day, TermUnits::Month, TermUnits::Year] {
            let empty = Term::new(Vec::new(), units);
            assert_eq!(empty.to_string(), units.plural());
            assert_eq!(empty.to_string().parse::<Term>().unwrap(), empty);
        }
        assert_eq!("month".parse::<Term>().unwrap(), Term::months(Vec::new()));
    }

    #[test]
    fn test_select() {
        let term = Term::days(vec![1.0, 21.0, 42.0, 63.0]);
        assert_eq!(term.select(&[0, 2]).unwrap(), Term::days(vec![1.0, 42.0]));
        assert_eq!(
            term.select_mask(&[false, true, false, true]).unwrap(),
            Term::days(vec![21.0, 63.0])
        );
        assert!(term.select(&[4]).is_err());
        assert!(term.select_mask(&[true]).is_err());
    }

    #[test]
    fn test_shift() {
        let term = Term::days(vec![1.0, 2.0, 3.0]);
        assert_eq!(term.shift(1, 0.0).values(), &[0.0, 1.0, 2.0]);
        assert_eq!(term.shift(-1, f64::NAN).values()[..2], [2.0, 3.0]);
        assert!(term.shift(-1, f64::NAN).values()[2].is_nan());
        assert_eq!(term.shift(5, 9.0).values(), &[9.0, 9.0, 9.0]);
    }

    #[test]
    fn test_shift_extreme_offsets() {
        let term = Term::days(vec![1.0, 2.0, 3.0]);
        assert_eq!(term.shift(isize::MIN, 0.0).values(), &[0.0, 0.0, 0.0]);
        assert_eq!(term.shift(isize::MAX, 0.0).values(), &[0.0, 0.0, 0.0]);
        assert_eq!(term.shift(-isize::MAX, 0.0).values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_diff() {
        let term = Term::days(vec![1.0, 21.0, 42.0, 63.0]);
        assert_eq!(term.diff(1, None).values(), &[20.0, 21.0, 21.0]);
        assert_eq!(term.diff(2, Some(0.0)).values(), &[0.0, 0.0, 41.0, 42.0]);
        assert!(term.diff(10, None).is_empty());
    }

    #[test]
    fn test_arithmetic() {
        let term = Term::days(vec![1.0, 21.0]);
        assert_eq!(
            term.add(TermOperand::Scalar(1.0)).unwrap(),
            Term::days(vec![2.0, 22.0])
        );
        assert_eq!(
            term.sub(TermOperand::Values(&[1.0, 1.0])).unwrap(),
            Term::days(vec![0.0, 20.0])
        );

        let other = Term::days(vec![1.0, 1.0]);
        assert!(matches!(
            term.add(TermOperand::Term(&other)),
            Err(CurveError::InvalidOperation { .. })
        ));
        assert!(matches!(
            term.compare(TermOperand::Term(&other)),
            Err(CurveError::InvalidOperation { .. })
        ));
        assert!(matches!(
            term.add(TermOperand::Values(&[1.0, 2.0, 3.0])),
            Err(CurveError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_compare_scalar() {
        let term = Term::days(vec![1.0, 21.0]);
        let result = term.compare(TermOperand::Scalar(10.0)).unwrap();
        assert_eq!(result, vec![Some(Ordering::Less), Some(Ordering::Greater)]);
    }

    #[test]
    fn test_unit_conversion() {
        let term = Term::months(vec![6.0, 12.0]);
        let days = term.to_units(TermUnits::Day, DayCountConvention::Business252);
        assert_relative_eq!(days.values()[0], 126.0);
        assert_relative_eq!(days.values()[1], 252.0);

        let years = Term::days(vec![180.0]).to_years(DayCountConvention::Actual360);
        assert_relative_eq!(years[0], 0.5);
    }

    #[test]
    fn test_date_range_term() {
        let start = Date::from_ymd(2025, 1, 3).unwrap();
        let ends = [
            Date::from_ymd(2025, 1, 6).unwrap(),
            Date::from_ymd(2025, 1, 10).unwrap(),
        ];
        let range = DateRangeTerm::new(&[start], &ends, &WeekendCalendar).unwrap();
        assert_eq!(range.term().values(), &[1.0, 5.0]);
        assert_eq!(range.term().units(), TermUnits::Day);
        assert_eq!(range.calendar(), "weekends");
        assert_eq!(range.start_dates().len(), 2);

        let holiday = HolidayCalendar::from_dates("test", [Date::from_ymd(2025, 1, 6).unwrap()]);
        let range = DateRangeTerm::new(&[start], &ends, &holiday).unwrap();
        assert_eq!(range.term().values(), &[0.0, 4.0]);
    }

    #[test]
    fn test_date_range_from_registry() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 1, 31).unwrap();
        let range =
            DateRangeTerm::from_registry(&[start], &[end], "actual", CalendarRegistry::global())
                .unwrap();
        assert_eq!(range.term().values(), &[30.0]);

        assert!(
            DateRangeTerm::from_registry(&[start], &[end], "nowhere", CalendarRegistry::global())
                .is_err()
        );
    }

    #[test]
    fn test_date_range_length_mismatch() {
        let d = Date::from_ymd(2025, 1, 1).unwrap();
        assert!(DateRangeTerm::new(&[d, d], &[d, d, d], &WeekendCalendar).is_err());
        assert!(DateRangeTerm::new(&[], &[d], &WeekendCalendar).is_err());
    }
}
