//! Monotonicity-preserving cubic interpolation (Fritsch-Carlson).

use super::hermite::{secants, HermiteKnots};
use super::{check_range, validate_knots, Interpolator};
use crate::error::MathResult;

/// Cubic Hermite spline with Fritsch-Carlson tangents.
///
/// The interpolant is monotone on every interval where the data is
/// monotone, and flat at local extrema of the data, so it never
/// overshoots the knot values. With extrapolation enabled the spline is
/// continued linearly with its end tangent.
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::{Interpolator, MonotoneSpline};
///
/// let spline = MonotoneSpline::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 0.0, 1.0, 1.0]).unwrap();
/// let y = spline.interpolate(2.5).unwrap();
/// assert!(y <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct MonotoneSpline {
    knots: HermiteKnots,
    allow_extrapolation: bool,
}

impl MonotoneSpline {
    /// Creates a Fritsch-Carlson monotone spline.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points, if lengths differ
    /// or if xs are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 3)?;

        let tangents = fritsch_carlson_tangents(&xs, &ys);

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

/// Fritsch-Carlson tangent selection.
///
/// Start from averaged secants, zero the tangent where the secants change
/// sign, then rescale any segment whose `(alpha, beta)` pair falls outside
/// the circle of radius 3.
fn fritsch_carlson_tangents(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let delta = secants(xs, ys);
    let mut m = vec![0.0; n];

    m[0] = delta[0];
    m[n - 1] = delta[n - 2];
    for k in 1..n - 1 {
        m[k] = if delta[k - 1] * delta[k] <= 0.0 {
            0.0
        } else {
            (delta[k - 1] + delta[k]) / 2.0
        };
    }

    for i in 0..n - 1 {
        if delta[i] == 0.0 {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }

        let alpha = m[i] / delta[i];
        let beta = m[i + 1] / delta[i];
        let r2 = alpha * alpha + beta * beta;
        if r2 > 9.0 {
            let tau = 3.0 / r2.sqrt();
            m[i] = tau * alpha * delta[i];
            m[i + 1] = tau * beta * delta[i];
        }
    }

    m
}

impl Interpolator for MonotoneSpline {
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
