//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values, which keeps interpolated values
//! strictly positive.

use super::{check_range, find_segment, validate_knots, Interpolator};
use crate::error::{MathError, MathResult};

/// Log-linear interpolation between data points.
///
/// ```text
/// y(x) = exp(linear_interpolate(x, ln(y)))
/// ```
///
/// With extrapolation enabled the boundary segments are continued in log
/// space.
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::{LogLinearInterpolator, Interpolator};
///
/// let terms = vec![1.0, 2.0, 3.0];
/// let rates = vec![0.02, 0.04, 0.05];
///
/// let interp = LogLinearInterpolator::new(terms, rates).unwrap();
/// let r = interp.interpolate(1.5).unwrap();
/// assert!((r - (0.02f64 * 0.04).sqrt()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    /// Precomputed ln(y) values
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, lengths differ,
    /// xs are not strictly increasing, or any y value is non-positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_knots(&xs, &ys, 2)?;

        if let Some(bad) = ys.iter().find(|&&y| y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {bad}"
            )));
        }

        let log_ys = ys.iter().map(|y| y.ln()).collect();

        Ok(Self {
            xs,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    fn log_value(&self, x: f64) -> (f64, f64) {
        let i = find_segment(&self.xs, x);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]);
        (self.log_ys[i] + slope * (x - self.xs[i]), slope)
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;

        Ok(self.log_value(x).0.exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x, self.allow_extrapolation)?;

        // d/dx exp(g(x)) = exp(g(x)) * g'(x)
        let (log_y, slope) = self.log_value(x);
        Ok(log_y.exp() * slope)
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geometric_midpoint() {
        let interp = LogLinearInterpolator::new(vec![0.0, 2.0], vec![1.0, 4.0]).unwrap();
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![0.01, 0.0]).is_err());
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![-0.01, 0.02]).is_err());
    }

    #[test]
    fn test_extrapolation_in_log_space() {
        let interp = LogLinearInterpolator::new(vec![1.0, 2.0], vec![1.0, 2.0])
            .unwrap()
            .with_extrapolation();
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.5, epsilon = 1e-12);
    }
}
