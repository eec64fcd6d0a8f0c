//! Spot-rate term structures.
//!
//! A [`SpotRateCurve`] is an ordered set of (term, rate) rows plus an
//! optional bound interpolation. Every operation that changes the rows
//! returns a new curve; only [`SpotRateCurve::set_interpolation`] and
//! [`SpotRateCurve::fit_interpolation`] mutate in place.
//!
//! # Interpolation state
//!
//! - Positional slicing (`select`, `select_mask`, `remove`, `first`,
//!   `last`, `closest`) returns an unbound curve.
//! - Rate replacement (`replace`, `set_rate`) re-prepares a bound
//!   interpolation on the new rows.
//! - `remove_terms` is refused while an interpolation is bound.
//!
//! # Example
//!
//! ```rust
//! use ratecurve_core::{Compounding, Date, DayCountConvention};
//! use ratecurve_curves::prelude::*;
//!
//! let curve = SpotRateCurve::new(
//!     Term::days(vec![1.0, 21.0, 42.0, 63.0, 126.0, 252.0]),
//!     SpotRate::new(
//!         vec![0.1050, 0.1055, 0.1058, 0.1060, 0.1065, 0.1070],
//!         Compounding::Discrete,
//!         DayCountConvention::Business252,
//!         "actual",
//!     ),
//!     Date::from_ymd(2025, 1, 2).unwrap(),
//! )
//! .unwrap();
//!
//! // Without interpolation, missing terms resolve to None
//! assert_eq!(curve.lookup(&[21.0, 30.0]), vec![Some(0.1055), None]);
//!
//! let curve = curve.with_interpolation(Some(Interpolation::flat_forward())).unwrap();
//! assert!(curve.lookup(&[30.0])[0].is_some());
//! ```

use ratecurve_core::calendars::{Calendar, CalendarRegistry};
use ratecurve_core::{Date, DayCountConvention, TermUnits};

use crate::config::FitConfig;
use crate::error::{CurveError, CurveResult};
use crate::forward::ForwardRateCurve;
use crate::interpolation::{BoundInterpolation, Interpolation};
use crate::spot_rate::SpotRate;
use crate::term::Term;

/// Tolerance for inclusive term bounds in years.
const BOUND_TOLERANCE: f64 = 1e-12;

/// Relative distance under which a converted term counts as a whole number.
const WHOLE_TERM_TOLERANCE: f64 = 1e-9;

/// Term magnitudes at or beyond this have no representable maturity.
const MAX_MATURITY_OFFSET: f64 = 2_147_483_648.0;

/// Terms used to index a curve.
#[derive(Debug, Clone, Copy)]
pub enum TermQuery<'a> {
    /// A term, converted to the curve's units when they differ.
    Term(&'a Term),
    /// Values already in the curve's units.
    Values(&'a [f64]),
}

impl<'a> From<&'a Term> for TermQuery<'a> {
    fn from(term: &'a Term) -> Self {
        TermQuery::Term(term)
    }
}

impl<'a> From<&'a [f64]> for TermQuery<'a> {
    fn from(values: &'a [f64]) -> Self {
        TermQuery::Values(values)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for TermQuery<'a> {
    fn from(values: &'a [f64; N]) -> Self {
        TermQuery::Values(values)
    }
}

impl<'a> From<&'a Vec<f64>> for TermQuery<'a> {
    fn from(values: &'a Vec<f64>) -> Self {
        TermQuery::Values(values)
    }
}

/// Interpolation binding of a curve.
#[derive(Debug, Clone, Default)]
pub enum InterpolationState {
    /// No interpolation; missing terms resolve to NaN.
    #[default]
    Unbound,
    /// Prepared against the curve's current rows.
    Bound(BoundInterpolation),
}

/// A spot-rate term structure.
#[derive(Debug, Clone)]
pub struct SpotRateCurve {
    terms: Term,
    rates: SpotRate,
    refdate: Date,
    state: InterpolationState,
}

impl SpotRateCurve {
    /// Creates an unbound curve.
    ///
    /// Rows are sorted by term. Lengths must match, terms must be finite and
    /// unique.
    pub fn new(terms: Term, rates: SpotRate, refdate: Date) -> CurveResult<Self> {
        if terms.len() != rates.len() {
            return Err(CurveError::invalid_argument(format!(
                "terms and rates must have same length: {} vs {}",
                terms.len(),
                rates.len()
            )));
        }
        if terms.values().iter().any(|t| !t.is_finite()) {
            return Err(CurveError::invalid_argument("terms must be finite"));
        }

        let mut order: Vec<usize> = (0..terms.len()).collect();
        order.sort_by(|&a, &b| terms.values()[a].total_cmp(&terms.values()[b]));

        let terms = terms.select(&order)?;
        let rates = rates.select(&order)?;

        if let Some(w) = terms.values().windows(2).find(|w| w[0] == w[1]) {
            return Err(CurveError::invalid_argument(format!(
                "duplicate term {}",
                w[0]
            )));
        }

        Ok(Self {
            terms,
            rates,
            refdate,
            state: InterpolationState::Unbound,
        })
    }

    /// Returns the terms.
    pub fn terms(&self) -> &Term {
        &self.terms
    }

    /// Returns the rates.
    pub fn rates(&self) -> &SpotRate {
        &self.rates
    }

    /// Returns the reference date.
    pub fn refdate(&self) -> Date {
        self.refdate
    }

    /// Returns the term units.
    pub fn units(&self) -> TermUnits {
        self.terms.units()
    }

    /// Returns the day count convention of the rates.
    pub fn daycount(&self) -> DayCountConvention {
        self.rates.daycount()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the curve has no rows.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the interpolation state.
    pub fn state(&self) -> &InterpolationState {
        &self.state
    }

    /// Returns the bound interpolation, if any.
    pub fn bound(&self) -> Option<&BoundInterpolation> {
        match &self.state {
            InterpolationState::Bound(bound) => Some(bound),
            InterpolationState::Unbound => None,
        }
    }

    /// Returns the bound interpolation method, if any.
    pub fn interpolation(&self) -> Option<&Interpolation> {
        self.bound().map(BoundInterpolation::interpolation)
    }

    /// Returns true if an interpolation is bound.
    pub fn is_bound(&self) -> bool {
        self.bound().is_some()
    }

    /// Terms in years under the curve's day count.
    pub fn years(&self) -> Vec<f64> {
        self.terms.to_years(self.daycount())
    }

    /// Binds an interpolation to the current rows, or unbinds with `None`.
    ///
    /// The curve is unchanged if preparation fails.
    pub fn set_interpolation(&mut self, interpolation: Option<Interpolation>) -> CurveResult<()> {
        self.state = match interpolation {
            Some(interpolation) => InterpolationState::Bound(self.prepare(&interpolation)?),
            None => InterpolationState::Unbound,
        };
        Ok(())
    }

    /// By-value form of [`set_interpolation`](Self::set_interpolation).
    pub fn with_interpolation(mut self, interpolation: Option<Interpolation>) -> CurveResult<Self> {
        self.set_interpolation(interpolation)?;
        Ok(self)
    }

    /// Fits a parametric interpolation to the rows and binds it.
    ///
    /// The parameters carried by `interpolation` are the initial guess.
    pub fn fit_interpolation(
        &mut self,
        interpolation: &Interpolation,
        config: &FitConfig,
    ) -> CurveResult<()> {
        let fitted = interpolation.fit(&self.years(), self.rates.values(), config)?;
        self.set_interpolation(Some(fitted))
    }

    fn prepare(&self, interpolation: &Interpolation) -> CurveResult<BoundInterpolation> {
        let bound = interpolation.prepare(
            &self.years(),
            self.rates.values(),
            self.rates.compounding(),
        )?;
        log::debug!(
            "bound {} interpolation to {} points",
            interpolation,
            self.len()
        );
        Ok(bound)
    }

    /// New curve over already sorted rows, re-preparing a bound
    /// interpolation.
    fn rebuild(&self, terms: Term, rates: SpotRate) -> CurveResult<Self> {
        let mut curve = self.unbound(terms, rates);
        if let Some(interpolation) = self.interpolation() {
            curve.state = InterpolationState::Bound(curve.prepare(interpolation)?);
        }
        Ok(curve)
    }

    /// New unbound curve over already sorted rows.
    fn unbound(&self, terms: Term, rates: SpotRate) -> Self {
        Self {
            terms,
            rates,
            refdate: self.refdate,
            state: InterpolationState::Unbound,
        }
    }

    /// Rows at `positions`, unbound.
    ///
    /// Positions are re-sorted by term.
    pub fn select(&self, positions: &[usize]) -> CurveResult<Self> {
        Self::new(
            self.terms.select(positions)?,
            self.rates.select(positions)?,
            self.refdate,
        )
    }

    /// Rows where `mask` is true, unbound.
    pub fn select_mask(&self, mask: &[bool]) -> CurveResult<Self> {
        Ok(self.unbound(self.terms.select_mask(mask)?, self.rates.select_mask(mask)?))
    }

    /// Copy with rates at `positions` replaced.
    pub fn replace(&self, positions: &[usize], values: &[f64]) -> CurveResult<Self> {
        self.rebuild(self.terms.clone(), self.rates.replace(positions, values)?)
    }

    /// Copy without the rows at `positions`, unbound.
    pub fn remove(&self, positions: &[usize]) -> CurveResult<Self> {
        if let Some(&i) = positions.iter().find(|&&i| i >= self.len()) {
            return Err(CurveError::invalid_argument(format!(
                "position {i} out of range for length {}",
                self.len()
            )));
        }
        let mask: Vec<bool> = (0..self.len()).map(|i| !positions.contains(&i)).collect();
        self.select_mask(&mask)
    }

    /// Query values in the curve's units.
    fn query_values(&self, query: TermQuery<'_>) -> Vec<f64> {
        match query {
            TermQuery::Term(term) if term.units() == self.units() => term.values().to_vec(),
            TermQuery::Term(term) => term
                .to_units(self.units(), self.daycount())
                .into_values()
                .into_iter()
                .map(snap_whole)
                .collect(),
            TermQuery::Values(values) => values.to_vec(),
        }
    }

    fn position(&self, term: f64) -> Option<usize> {
        self.terms
            .values()
            .binary_search_by(|t| t.total_cmp(&term))
            .ok()
    }

    /// Rate at `term` (curve units): stored, interpolated or NaN.
    fn resolve(&self, term: f64) -> f64 {
        if let Some(i) = self.position(term) {
            return self.rates.values()[i];
        }
        match &self.state {
            InterpolationState::Bound(bound) => {
                bound.evaluate(self.daycount().time_factor(term, self.units()))
            }
            InterpolationState::Unbound => f64::NAN,
        }
    }

    /// Term-based indexing.
    ///
    /// Each queried term resolves to the stored rate on an exact match,
    /// else to the interpolated rate when bound, else to NaN. The result is
    /// an unbound curve over the queried terms.
    pub fn at_terms<'a>(&self, query: impl Into<TermQuery<'a>>) -> CurveResult<Self> {
        let terms = self.query_values(query.into());
        let rates: Vec<f64> = terms.iter().map(|t| self.resolve(*t)).collect();
        Self::new(
            Term::new(terms, self.units()),
            SpotRate::with_convention(rates, self.rates.convention().clone()),
            self.refdate,
        )
    }

    /// Same resolution as [`at_terms`](Self::at_terms) in query order, with
    /// `None` for missing rates.
    pub fn lookup<'a>(&self, query: impl Into<TermQuery<'a>>) -> Vec<Option<f64>> {
        self.query_values(query.into())
            .iter()
            .map(|t| Some(self.resolve(*t)).filter(|r| !r.is_nan()))
            .collect()
    }

    /// Copy with rates set at the given terms, inserting new rows in term
    /// order.
    ///
    /// A single rate is broadcast over all terms.
    pub fn set_rate<'a>(&self, query: impl Into<TermQuery<'a>>, rates: &[f64]) -> CurveResult<Self> {
        let terms = self.query_values(query.into());
        if rates.len() != 1 && rates.len() != terms.len() {
            return Err(CurveError::invalid_argument(format!(
                "expected 1 or {} rates, got {}",
                terms.len(),
                rates.len()
            )));
        }
        if terms.iter().any(|t| !t.is_finite()) {
            return Err(CurveError::invalid_argument("terms must be finite"));
        }

        let mut new_terms = self.terms.values().to_vec();
        let mut new_rates = self.rates.values().to_vec();
        for (k, term) in terms.iter().enumerate() {
            let rate = if rates.len() == 1 { rates[0] } else { rates[k] };
            match new_terms.binary_search_by(|t| t.total_cmp(term)) {
                Ok(i) => new_rates[i] = rate,
                Err(i) => {
                    new_terms.insert(i, *term);
                    new_rates.insert(i, rate);
                }
            }
        }

        self.rebuild(
            Term::new(new_terms, self.units()),
            SpotRate::with_convention(new_rates, self.rates.convention().clone()),
        )
    }

    /// Copy without the rows at the given terms.
    ///
    /// Refused while an interpolation is bound, since the binding was
    /// prepared on those rows. Terms not on the curve are ignored.
    pub fn remove_terms<'a>(&self, query: impl Into<TermQuery<'a>>) -> CurveResult<Self> {
        if self.is_bound() {
            return Err(CurveError::invalid_operation(
                "cannot remove terms from a curve with a bound interpolation",
            ));
        }
        let terms = self.query_values(query.into());
        let mask: Vec<bool> = self
            .terms
            .values()
            .iter()
            .map(|t| !terms.contains(t))
            .collect();
        self.select_mask(&mask)
    }

    fn limit_years(&self, limit: &Term) -> CurveResult<f64> {
        match limit.to_years(self.daycount()).as_slice() {
            [years] => Ok(*years),
            _ => Err(CurveError::invalid_argument(format!(
                "expected a single term limit, got {}",
                limit.len()
            ))),
        }
    }

    /// Rows whose term is at most `limit` from the reference date.
    pub fn first(&self, limit: &Term) -> CurveResult<Self> {
        let limit = self.limit_years(limit)?;
        let mask: Vec<bool> = self
            .years()
            .iter()
            .map(|t| *t <= limit + BOUND_TOLERANCE)
            .collect();
        self.select_mask(&mask)
    }

    /// Rows whose term is at most `limit` before the last term.
    pub fn last(&self, limit: &Term) -> CurveResult<Self> {
        let limit = self.limit_years(limit)?;
        let years = self.years();
        let Some(&end) = years.last() else {
            return Ok(self.clone());
        };
        let mask: Vec<bool> = years
            .iter()
            .map(|t| *t >= end - limit - BOUND_TOLERANCE)
            .collect();
        self.select_mask(&mask)
    }

    /// The single row closest to `term`; ties go to the lower term.
    pub fn closest<'a>(&self, query: impl Into<TermQuery<'a>>) -> CurveResult<Self> {
        let target = match self.query_values(query.into()).as_slice() {
            [t] if t.is_finite() => *t,
            _ => {
                return Err(CurveError::invalid_argument(
                    "closest needs a single finite term",
                ))
            }
        };

        let mut best: Option<(usize, f64)> = None;
        for (i, t) in self.terms.values().iter().enumerate() {
            let distance = (t - target).abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        match best {
            Some((i, _)) => self.select(&[i]),
            None => Err(CurveError::invalid_operation("curve is empty")),
        }
    }

    /// Interpolated rates at the queried terms. Requires a bound
    /// interpolation.
    pub fn interpolate<'a>(&self, query: impl Into<TermQuery<'a>>) -> CurveResult<SpotRate> {
        let Some(bound) = self.bound() else {
            return Err(CurveError::invalid_operation(
                "interpolate requires a bound interpolation",
            ));
        };
        let years: Vec<f64> = self
            .query_values(query.into())
            .iter()
            .map(|t| self.daycount().time_factor(*t, self.units()))
            .collect();
        Ok(SpotRate::with_convention(
            bound.evaluate_all(&years),
            self.rates.convention().clone(),
        ))
    }

    /// Continuously compounded instantaneous forward rates at the given
    /// terms, from the slope of the bound interpolation.
    pub fn instantaneous_forwards<'a>(
        &self,
        query: impl Into<TermQuery<'a>>,
    ) -> CurveResult<Vec<f64>> {
        let Some(bound) = self.bound() else {
            return Err(CurveError::invalid_operation(
                "instantaneous forwards require a bound interpolation",
            ));
        };
        Ok(self
            .query_values(query.into())
            .iter()
            .map(|t| bound.instantaneous_forward(self.daycount().time_factor(*t, self.units())))
            .collect())
    }

    /// Forward rates between consecutive terms.
    ///
    /// The first period runs from the reference date to the first term, so
    /// the first forward equals the first spot rate. A zero first term adds
    /// no period.
    pub fn forward_rates(&self) -> CurveResult<ForwardRateCurve> {
        let mut starts = Vec::with_capacity(self.len());
        let mut ends = Vec::with_capacity(self.len());
        let mut forwards = Vec::with_capacity(self.len());

        let (mut prev_term, mut prev_years, mut prev_cf) = (0.0, 0.0, 1.0);
        let compounding = self.rates.compounding();

        for ((term, years), rate) in self
            .terms
            .values()
            .iter()
            .zip(self.years())
            .zip(self.rates.values())
        {
            let cf = compounding.compound(years, *rate);
            let dt = years - prev_years;
            if dt > 0.0 {
                starts.push(prev_term);
                ends.push(*term);
                forwards.push(compounding.implied_rate(dt, cf / prev_cf));
            }
            (prev_term, prev_years, prev_cf) = (*term, years, cf);
        }

        self.forward_curve(starts, &ends, forwards)
    }

    /// Forward rates between every pair of consecutive days from the first
    /// to the last term.
    ///
    /// Requires a bound interpolation and day units; rates at each day are
    /// resolved like [`at_terms`](Self::at_terms).
    pub fn forward_rates_daily(&self) -> CurveResult<ForwardRateCurve> {
        if !self.is_bound() {
            return Err(CurveError::invalid_operation(
                "daily forward rates require a bound interpolation",
            ));
        }
        if self.units() != TermUnits::Day {
            return Err(CurveError::invalid_operation(format!(
                "daily forward rates require day terms, curve is in {}",
                self.units().plural()
            )));
        }

        let (Some(&first), Some(&last)) = (self.terms.values().first(), self.terms.values().last())
        else {
            return Err(CurveError::invalid_operation("curve is empty"));
        };

        let days: Vec<f64> = std::iter::successors(Some(first), |d| Some(d + 1.0))
            .take_while(|d| *d <= last)
            .collect();

        let compounding = self.rates.compounding();
        let daycount = self.daycount();
        let factors: Vec<f64> = days
            .iter()
            .map(|d| compounding.compound(daycount.time_factor(*d, TermUnits::Day), self.resolve(*d)))
            .collect();

        let dt = daycount.time_factor(1.0, TermUnits::Day);
        let forwards = factors
            .windows(2)
            .map(|w| compounding.implied_rate(dt, w[1] / w[0]))
            .collect();

        let starts = days[..days.len().saturating_sub(1)].to_vec();
        let ends: Vec<f64> = starts.iter().map(|d| d + 1.0).collect();
        self.forward_curve(starts, &ends, forwards)
    }

    fn forward_curve(
        &self,
        starts: Vec<f64>,
        ends: &[f64],
        forwards: Vec<f64>,
    ) -> CurveResult<ForwardRateCurve> {
        let periods = starts.iter().zip(ends).map(|(s, e)| e - s).collect();
        ForwardRateCurve::new(
            Term::new(starts, self.units()),
            Term::new(periods, self.units()),
            SpotRate::with_convention(forwards, self.rates.convention().clone()),
            self.refdate,
        )
    }

    /// Discount factors at every term.
    pub fn discount_factors(&self) -> CurveResult<Vec<f64>> {
        self.rates.discount(&self.terms)
    }

    /// Maturity dates of every term, using the calendar named by the rates.
    pub fn maturities(&self) -> CurveResult<Vec<Date>> {
        self.maturities_with(CalendarRegistry::global().get(self.rates.calendar())?)
    }

    /// Maturity dates of every term under `calendar`.
    ///
    /// Day terms advance by business days; month and year terms by calendar
    /// months. Terms must be whole numbers.
    pub fn maturities_with(&self, calendar: &dyn Calendar) -> CurveResult<Vec<Date>> {
        self.terms
            .values()
            .iter()
            .map(|t| {
                if t.fract() != 0.0 {
                    return Err(CurveError::invalid_argument(format!(
                        "maturity of fractional term {t} is undefined"
                    )));
                }
                let out_of_range = || {
                    CurveError::invalid_argument(format!(
                        "maturity of term {t} {} from {} is out of range",
                        self.units().plural(),
                        self.refdate
                    ))
                };
                if t.abs() >= MAX_MATURITY_OFFSET {
                    return Err(out_of_range());
                }
                let n = *t as i64;
                let maturity = match self.units() {
                    TermUnits::Day => calendar.checked_add_business_days(self.refdate, n),
                    TermUnits::Month => self.refdate.add_months(n as i32),
                    TermUnits::Year => self.refdate.add_years(n as i32),
                };
                maturity.map_err(|_| out_of_range())
            })
            .collect()
    }
}

/// Rounds unit conversions that land next to a whole number onto it, so
/// `97 months` finds the stored `2037 days` on business/252.
fn snap_whole(value: f64) -> f64 {
    let whole = value.round();
    if (value - whole).abs() <= WHOLE_TERM_TOLERANCE * whole.abs().max(1.0) {
        whole
    } else {
        value
    }
}
