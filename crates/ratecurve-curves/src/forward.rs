//! Forward rate curves.

use ratecurve_core::Date;

use crate::curve::SpotRateCurve;
use crate::error::{CurveError, CurveResult};
use crate::spot_rate::SpotRate;
use crate::term::Term;

/// Forward rates over consecutive periods.
///
/// Period `i` starts at `start_terms[i]` and lasts `terms[i]`, both in the
/// same units. Rates share the convention of the spot curve they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRateCurve {
    start_terms: Term,
    terms: Term,
    rates: SpotRate,
    refdate: Date,
}

impl ForwardRateCurve {
    /// Creates a forward curve.
    pub fn new(start_terms: Term, terms: Term, rates: SpotRate, refdate: Date) -> CurveResult<Self> {
        if start_terms.units() != terms.units() {
            return Err(CurveError::invalid_argument(format!(
                "start terms in {} but periods in {}",
                start_terms.units().plural(),
                terms.units().plural()
            )));
        }
        if start_terms.len() != terms.len() || terms.len() != rates.len() {
            return Err(CurveError::invalid_argument(format!(
                "start terms, periods and rates must have same length: {}, {}, {}",
                start_terms.len(),
                terms.len(),
                rates.len()
            )));
        }
        if terms.values().iter().any(|p| !(*p > 0.0)) {
            return Err(CurveError::invalid_argument("periods must be positive"));
        }
        Ok(Self {
            start_terms,
            terms,
            rates,
            refdate,
        })
    }

    /// Start of each period.
    pub fn start_terms(&self) -> &Term {
        &self.start_terms
    }

    /// Length of each period.
    pub fn terms(&self) -> &Term {
        &self.terms
    }

    /// End of each period.
    pub fn end_terms(&self) -> Term {
        let ends = self
            .start_terms
            .values()
            .iter()
            .zip(self.terms.values())
            .map(|(s, p)| s + p)
            .collect();
        Term::new(ends, self.terms.units())
    }

    /// Forward rates.
    pub fn rates(&self) -> &SpotRate {
        &self.rates
    }

    /// Reference date.
    pub fn refdate(&self) -> Date {
        self.refdate
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no periods.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Chains the forwards back into spot rates at each period end.
    ///
    /// Periods must be contiguous and start at the reference date.
    pub fn to_spot_curve(&self) -> CurveResult<SpotRateCurve> {
        let ends = self.end_terms();
        let contiguous = self.start_terms.values().first().map_or(true, |s| *s == 0.0)
            && self
                .start_terms
                .values()
                .iter()
                .skip(1)
                .zip(ends.values())
                .all(|(s, e)| (s - e).abs() <= 1e-9 * e.abs().max(1.0));
        if !contiguous {
            return Err(CurveError::invalid_operation(
                "forward periods must be contiguous from the reference date",
            ));
        }

        let compounding = self.rates.compounding();
        let daycount = self.rates.daycount();
        let units = self.terms.units();

        let mut cf = 1.0;
        let spots = self
            .terms
            .values()
            .iter()
            .zip(ends.values())
            .zip(self.rates.values())
            .map(|((period, end), forward)| {
                cf *= compounding.compound(daycount.time_factor(*period, units), *forward);
                compounding.implied_rate(daycount.time_factor(*end, units), cf)
            })
            .collect();

        SpotRateCurve::new(
            ends,
            SpotRate::with_convention(spots, self.rates.convention().clone()),
            self.refdate,
        )
    }
}
