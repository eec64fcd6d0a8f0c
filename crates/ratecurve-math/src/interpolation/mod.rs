//! Interpolation methods for term structure construction.
//!
//! # Available Methods
//!
//! **Pointwise:**
//! - [`LinearInterpolator`]: Linear interpolation
//! - [`LogLinearInterpolator`]: Linear interpolation of `ln(y)`
//! - [`CubicSpline`]: Natural cubic spline
//! - [`HermiteSpline`]: Cubic Hermite spline with Catmull-Rom tangents
//! - [`MonotoneSpline`]: Cubic Hermite spline with Fritsch-Carlson tangents
//! - [`FlatForward`]: Linear interpolation of log compounding factors from the origin
//!
//! **Parametric Models:**
//! - [`NelsonSiegel`]: Nelson-Siegel parametric curve
//! - [`Svensson`]: Nelson-Siegel-Svensson extension
//!
//! # Choosing an Interpolation Method
//!
//! | Method | Min points | Smoothness | Preserves monotonicity | Extension |
//! |--------|-----------|------------|------------------------|-----------|
//! | Linear | 2 | C0 | Yes | boundary segment |
//! | Log-Linear | 2 | C0 | Yes | boundary segment in log space |
//! | Cubic Spline | 3 | C2 | No | linear with end slope |
//! | Hermite | 3 | C1 | No | linear with end slope |
//! | Monotone | 3 | C1 | **Yes** | linear with end slope |
//! | Flat Forward | 1 | C0 (factors) | Yes (factors) | last forward |
//! | Nelson-Siegel | - | C∞ | - | formula |
//!
//! Interpolators reject queries outside the sample range unless built
//! with `with_extrapolation()`, in which case the extension listed above
//! applies.

mod cubic_spline;
mod flat_forward;
mod hermite;
mod linear;
mod log_linear;
mod monotone;
mod parametric;

pub use cubic_spline::CubicSpline;
pub use flat_forward::FlatForward;
pub use hermite::HermiteSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use monotone::MonotoneSpline;
pub use parametric::{NelsonSiegel, Svensson};

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
///
/// All interpolation methods implement this trait, providing a unified
/// interface for curve construction.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Validates knot data: enough points, equal lengths, finite values and
/// strictly increasing x.
pub(crate) fn validate_knots(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<()> {
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < min_points {
        return Err(MathError::insufficient_data(min_points, xs.len()));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("knot values must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the
/// first and last segments.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    match xs.binary_search_by(|v| v.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(xs.len() - 2),
        Err(i) => (i.saturating_sub(1)).min(xs.len() - 2),
    }
}

/// Rejects out-of-range queries when extrapolation is disabled.
pub(crate) fn check_range(xs: &[f64], x: f64, allow_extrapolation: bool) -> MathResult<()> {
    let min = xs[0];
    let max = xs[xs.len() - 1];
    if !allow_extrapolation && (x < min || x > max) {
        return Err(MathError::ExtrapolationNotAllowed { x, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> (Vec<f64>, Vec<f64>) {
        (
            vec![0.5, 1.0, 2.0, 3.0, 5.0],
            vec![0.02, 0.025, 0.03, 0.035, 0.04],
        )
    }

    fn all_interpolators(xs: &[f64], ys: &[f64]) -> Vec<(&'static str, Box<dyn Interpolator>)> {
        vec![
            (
                "Linear",
                Box::new(LinearInterpolator::new(xs.to_vec(), ys.to_vec()).unwrap()),
            ),
            (
                "LogLinear",
                Box::new(LogLinearInterpolator::new(xs.to_vec(), ys.to_vec()).unwrap()),
            ),
            (
                "CubicSpline",
                Box::new(CubicSpline::new(xs.to_vec(), ys.to_vec()).unwrap()),
            ),
            (
                "Hermite",
                Box::new(HermiteSpline::new(xs.to_vec(), ys.to_vec()).unwrap()),
            ),
            (
                "Monotone",
                Box::new(MonotoneSpline::new(xs.to_vec(), ys.to_vec()).unwrap()),
            ),
        ]
    }

    #[test]
    fn test_all_interpolators_through_points() {
        let (xs, ys) = sample();
        for (name, interp) in all_interpolators(&xs, &ys) {
            for (x, y) in xs.iter().zip(ys.iter()) {
                let v = interp.interpolate(*x).unwrap();
                assert!((v - y).abs() < 1e-12, "{name} misses knot {x}: {v} vs {y}");
            }
        }
    }

    #[test]
    fn test_derivative_consistency() {
        let (xs, ys) = sample();
        let mut interps = all_interpolators(&xs, &ys);
        interps.push((
            "NelsonSiegel",
            Box::new(NelsonSiegel::new(0.04, -0.02, 0.01, 2.0).unwrap()),
        ));
        interps.push((
            "Svensson",
            Box::new(Svensson::new(0.04, -0.02, 0.01, -0.005, 2.0, 8.0).unwrap()),
        ));

        for (name, interp) in &interps {
            check_derivative(interp.as_ref(), 1.5, name);
        }
    }

    fn check_derivative(interp: &dyn Interpolator, t: f64, name: &str) {
        let h = 1e-6;
        let y_plus = interp.interpolate(t + h).unwrap();
        let y_minus = interp.interpolate(t - h).unwrap();
        let numerical = (y_plus - y_minus) / (2.0 * h);

        let analytical = interp.derivative(t).unwrap();

        assert!(
            (analytical - numerical).abs() < 1e-4,
            "{} derivative at t={}: analytical={}, numerical={}",
            name,
            t,
            analytical,
            numerical
        );
    }

    #[test]
    fn test_extrapolation_disabled_by_default() {
        let (xs, ys) = sample();
        for (name, interp) in all_interpolators(&xs, &ys) {
            assert!(!interp.allows_extrapolation(), "{name}");
            assert!(interp.interpolate(0.1).is_err(), "{name}");
            assert!(interp.interpolate(6.0).is_err(), "{name}");
        }
    }

    #[test]
    fn test_validate_knots() {
        assert!(matches!(
            validate_knots(&[1.0], &[1.0], 2),
            Err(MathError::InsufficientData { required: 2, actual: 1 })
        ));
        assert!(validate_knots(&[1.0, 1.0], &[1.0, 2.0], 2).is_err());
        assert!(validate_knots(&[1.0, 2.0], &[1.0], 2).is_err());
        assert!(validate_knots(&[1.0, 2.0], &[1.0, f64::NAN], 2).is_err());
        assert!(validate_knots(&[1.0, 2.0], &[1.0, 2.0], 2).is_ok());
    }

    #[test]
    fn test_find_segment() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_segment(&xs, -1.0), 0);
        assert_eq!(find_segment(&xs, 0.0), 0);
        assert_eq!(find_segment(&xs, 1.5), 1);
        assert_eq!(find_segment(&xs, 3.0), 2);
        assert_eq!(find_segment(&xs, 10.0), 2);
    }

    #[test]
    fn test_yield_curve_construction() {
        let maturities = vec![0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];
        let zero_rates = vec![
            0.0200, 0.0210, 0.0225, 0.0250, 0.0275, 0.0310, 0.0340, 0.0370, 0.0400, 0.0410,
        ];

        for (name, interp) in all_interpolators(&maturities, &zero_rates) {
            let z = interp.interpolate(4.0).unwrap();
            assert!(z > 0.0275 && z < 0.0310, "{name}: {z}");
        }
        assert_relative_eq!(
            LinearInterpolator::new(maturities, zero_rates)
                .unwrap()
                .interpolate(4.0)
                .unwrap(),
            0.02925,
            epsilon = 1e-12
        );
    }
}
