//! Natural cubic spline interpolation.

use super::{check_range, find_segment, validate_knots, Interpolator};
use crate::error::MathResult;
use crate::linear_algebra::solve_tridiagonal;

/// Natural cubic spline interpolation.
///
/// Piecewise cubic polynomials with continuous first and second
/// derivatives. "Natural" means the second derivative is zero at the
/// endpoints. With extrapolation enabled the spline is continued linearly
/// with its end-point slope.
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::{CubicSpline, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let spline = CubicSpline::new(xs, ys).unwrap();
/// let y = spline.interpolate(1.5).unwrap();
/// assert!(y > 1.0 && y < 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    allow_extrapolation: bool,
}

impl CubicSpline {
    /// Creates a natural cubic spline interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points, if lengths differ
    /// or if xs are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 3)?;

        let y2s = compute_second_derivatives(&xs, &ys)?;

        Ok(Self {
            xs,
            ys,
            y2s,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Second derivatives at the knots.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.y2s
    }

    fn segment_value(&self, i: usize, x: f64) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * (h * h) / 6.0
    }

    fn segment_slope(&self, i: usize, x: f64) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;

        (self.ys[i + 1] - self.ys[i]) / h - (3.0 * a * a - 1.0) / 6.0 * h * self.y2s[i]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2s[i + 1]
    }

    /// Knot index and position to evaluate at, for linear continuation
    /// outside the sample range.
    fn boundary(&self, x: f64) -> Option<(usize, f64)> {
        let last = self.xs.len() - 1;
        if x < self.xs[0] {
            Some((0, self.xs[0]))
        } else if x > self.xs[last] {
            Some((last - 1, self.xs[last]))
        } else {
            None
        }
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;

        if let Some((i, edge)) = self.boundary(x) {
            return Ok(self.segment_value(i, edge) + self.segment_slope(i, edge) * (x - edge));
        }

        Ok(self.segment_value(find_segment(&self.xs, x), x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;

        if let Some((i, edge)) = self.boundary(x) {
            return Ok(self.segment_slope(i, edge));
        }

        Ok(self.segment_slope(find_segment(&self.xs, x), x))
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Computes the knot second derivatives of a natural cubic spline.
///
/// The interior equations
/// `h[i-1]*M[i-1] + 2*(h[i-1]+h[i])*M[i] + h[i]*M[i+1] = 6*(d[i] - d[i-1])`
/// form a tridiagonal system; `M[0] = M[n-1] = 0`.
fn compute_second_derivatives(xs: &[f64], ys: &[f64]) -> MathResult<Vec<f64>> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let slopes: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

    let m = n - 2;
    let lower: Vec<f64> = (1..m).map(|k| h[k]).collect();
    let diag: Vec<f64> = (0..m).map(|k| 2.0 * (h[k] + h[k + 1])).collect();
    let upper: Vec<f64> = (0..m.saturating_sub(1)).map(|k| h[k + 1]).collect();
    let rhs: Vec<f64> = (0..m).map(|k| 6.0 * (slopes[k + 1] - slopes[k])).collect();

    let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;

    let mut y2s = Vec::with_capacity(n);
    y2s.push(0.0);
    y2s.extend(interior);
    y2s.push(0.0);
    Ok(y2s)
}
