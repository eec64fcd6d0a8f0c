//! Cubic Hermite spline interpolation.
//!
//! A Hermite spline is defined by the knot values and a tangent at every
//! knot. [`HermiteSpline`] uses Catmull-Rom (finite-difference) tangents;
//! [`MonotoneSpline`](super::MonotoneSpline) shares the same evaluation
//! with monotonicity-preserving tangents.

use super::{check_range, find_segment, validate_knots, Interpolator};
use crate::error::MathResult;

/// Knots and tangents of a piecewise cubic Hermite curve.
///
/// Outside the knot range the curve continues linearly with the end
/// tangent.
#[derive(Debug, Clone)]
pub(crate) struct HermiteKnots {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
    pub(crate) tangents: Vec<f64>,
}

impl HermiteKnots {
    pub(crate) fn value(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        if x < self.xs[0] {
            return self.ys[0] + self.tangents[0] * (x - self.xs[0]);
        }
        if x > self.xs[last] {
            return self.ys[last] + self.tangents[last] * (x - self.xs[last]);
        }

        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let s = (x - self.xs[i]) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * self.ys[i]
            + h10 * h * self.tangents[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.tangents[i + 1]
    }

    pub(crate) fn slope(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        if x < self.xs[0] {
            return self.tangents[0];
        }
        if x > self.xs[last] {
            return self.tangents[last];
        }

        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let s = (x - self.xs[i]) / h;
        let s2 = s * s;

        ((6.0 * s2 - 6.0 * s) * self.ys[i] + (-6.0 * s2 + 6.0 * s) * self.ys[i + 1]) / h
            + (3.0 * s2 - 4.0 * s + 1.0) * self.tangents[i]
            + (3.0 * s2 - 2.0 * s) * self.tangents[i + 1]
    }
}

/// Secant slopes between consecutive knots.
pub(crate) fn secants(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
        .collect()
}

/// Catmull-Rom tangents: central differences at interior knots, one-sided
/// differences at the ends.
fn catmull_rom_tangents(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let secants = secants(xs, ys);
    let mut tangents = Vec::with_capacity(n);

    tangents.push(secants[0]);
    for i in 1..n - 1 {
        tangents.push((ys[i + 1] - ys[i - 1]) / (xs[i + 1] - xs[i - 1]));
    }
    tangents.push(secants[n - 2]);

    tangents
}

/// Cubic Hermite spline with Catmull-Rom tangents.
///
/// C1 continuous and local: moving one knot only changes the two
/// neighbouring segments on each side. With extrapolation enabled the
/// spline is continued linearly with its end tangent.
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::{HermiteSpline, Interpolator};
///
/// let spline = HermiteSpline::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert!((spline.derivative(1.0).unwrap() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct HermiteSpline {
    knots: HermiteKnots,
    allow_extrapolation: bool,
}

impl HermiteSpline {
    /// Creates a Catmull-Rom Hermite spline.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points, if lengths differ
    /// or if xs are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 3)?;

        let tangents = catmull_rom_tangents(&xs, &ys);

        Ok(Self {
            knots: HermiteKnots { xs, ys, tangents },
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Tangents at the knots.
    pub fn tangents(&self) -> &[f64] {
        &self.knots.tangents
    }
}

impl Interpolator for HermiteSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.knots.xs, x, self.allow_extrapolation)?;
        Ok(self.knots.value(x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.knots.xs, x, self.allow_extrapolation)?;
        Ok(self.knots.slope(x))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.knots.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.knots.xs[self.knots.xs.len() - 1]
    }
}
