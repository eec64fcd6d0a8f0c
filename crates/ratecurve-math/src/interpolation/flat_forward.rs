//! Flat forward interpolation.
//!
//! Flat forward interpolation assumes constant forward rates between pillar
//! points. It works on log compounding factors: given `y_i = ln CF(t_i)` at
//! pillars `t_i`, the curve `y(t)` is piecewise linear through the origin
//! knot `(0, 0)` and the pillars, so the instantaneous forward rate
//!
//! ```text
//! f_i = (y_{i+1} - y_i) / (t_{i+1} - t_i)
//! ```
//!
//! is constant (flat) within each segment. Any compounding convention can
//! be layered on top by mapping rates to `ln CF` and back.

use super::{check_range, find_segment, validate_knots, Interpolator};
use crate::error::{MathError, MathResult};

/// Flat forward interpolation on log compounding factors.
///
/// [`Interpolator::interpolate`] returns `ln CF(t)` and
/// [`Interpolator::derivative`] the instantaneous (continuously
/// compounded) forward rate.
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::{FlatForward, Interpolator};
///
/// // Continuously compounded zero rates at 1Y and 2Y: ln CF = r * t
/// let interp = FlatForward::new(vec![1.0, 2.0], vec![0.02, 0.08]).unwrap();
///
/// // Forward from 1Y to 2Y is 6%
/// assert!((interp.forward_rate(1.5).unwrap() - 0.06).abs() < 1e-12);
/// assert!((interp.interpolate(1.5).unwrap() - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FlatForward {
    /// Knot times, starting with the origin
    tenors: Vec<f64>,
    /// Log compounding factors at each knot, starting with 0
    log_factors: Vec<f64>,
    /// Forward rate for each segment
    forward_rates: Vec<f64>,
    /// Allow extrapolation beyond data range
    allow_extrapolation: bool,
}

impl FlatForward {
    /// Creates a flat forward interpolator from pillar log factors.
    ///
    /// An origin knot `(0, 0)` is prepended, so a single pillar is enough.
    ///
    /// # Errors
    ///
    /// Returns an error if no pillars are given, lengths differ, the first
    /// tenor is not positive, or tenors are not strictly increasing.
    pub fn new(tenors: Vec<f64>, log_factors: Vec<f64>) -> MathResult<Self> {
        validate_knots(&tenors, &log_factors, 1)?;

        if tenors[0] <= 0.0 {
            return Err(MathError::invalid_input(
                "First tenor must be positive for flat forward interpolation",
            ));
        }

        let mut knots = Vec::with_capacity(tenors.len() + 1);
        knots.push(0.0);
        knots.extend(tenors);

        let mut values = Vec::with_capacity(log_factors.len() + 1);
        values.push(0.0);
        values.extend(log_factors);

        let forward_rates = knots
            .windows(2)
            .zip(values.windows(2))
            .map(|(t, y)| (y[1] - y[0]) / (t[1] - t[0]))
            .collect();

        Ok(Self {
            tenors: knots,
            log_factors: values,
            forward_rates,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    ///
    /// When extrapolating:
    /// - Below the origin: uses the first forward rate
    /// - Above last tenor: uses the last forward rate
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the forward rate at tenor t.
    pub fn forward_rate(&self, t: f64) -> MathResult<f64> {
        check_range(&self.tenors, t, self.allow_extrapolation)?;
        Ok(self.forward_rates[find_segment(&self.tenors, t)])
    }

    /// Returns the knot tenors, origin included.
    pub fn tenors(&self) -> &[f64] {
        &self.tenors
    }

    /// Returns the segment forward rates.
    pub fn forward_rates(&self) -> &[f64] {
        &self.forward_rates
    }
}

impl Interpolator for FlatForward {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        check_range(&self.tenors, t, self.allow_extrapolation)?;

        let i = find_segment(&self.tenors, t);
        Ok(self.log_factors[i] + self.forward_rates[i] * (t - self.tenors[i]))
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        self.forward_rate(t)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.tenors[0]
    }

    fn max_x(&self) -> f64 {
        self.tenors[self.tenors.len() - 1]
    }
}
