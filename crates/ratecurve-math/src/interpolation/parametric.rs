//! Parametric yield curve models.
//!
//! - Nelson-Siegel: 4-parameter model
//! - Nelson-Siegel-Svensson: 6-parameter extension
//!
//! Both are closed-form in `t` and are used for curve fitting rather than
//! point-by-point interpolation.

use super::Interpolator;
use crate::error::{MathError, MathResult};

/// (1 - e^(-x)) / x
fn loading_factor_1(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        1.0 - x / 2.0 + x * x / 6.0 // Taylor expansion for numerical stability
    } else {
        (1.0 - (-x).exp()) / x
    }
}

/// (1 - e^(-x)) / x - e^(-x)
fn loading_factor_2(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        x / 2.0 - x * x / 3.0
    } else {
        loading_factor_1(x) - (-x).exp()
    }
}

/// d/dx of both loading factors.
fn loading_derivatives(x: f64) -> (f64, f64) {
    let exp_x = (-x).exp();
    let dl1 = if x.abs() < 1e-6 {
        -0.5 + x / 3.0
    } else {
        (exp_x - loading_factor_1(x)) / x
    };
    (dl1, dl1 + exp_x)
}

fn check_decay(name: &str, value: f64) -> MathResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MathError::invalid_input(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Nelson-Siegel yield curve model.
///
/// ```text
/// r(t) = β₁ + β₂ * L₁(t/λ₁) + β₃ * L₂(t/λ₁)
///
/// L₁(x) = (1 - e^(-x)) / x
/// L₂(x) = L₁(x) - e^(-x)
/// ```
///
/// - β₁: Long-term level (asymptotic rate)
/// - β₁ + β₂: Instantaneous short rate (as t → 0)
/// - β₃ > 0: Hump in curve; β₃ < 0: U-shape
/// - λ₁: Decay factor (time to maximum hump effect)
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::{NelsonSiegel, Interpolator};
///
/// let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
///
/// assert!(ns.rate(0.25) < ns.rate(30.0));
/// assert!((ns.rate(0.0) - 0.025).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelsonSiegel {
    beta1: f64,
    beta2: f64,
    beta3: f64,
    lambda1: f64,
}

impl NelsonSiegel {
    /// Number of model parameters.
    pub const NUM_PARAMS: usize = 4;

    /// Creates a new Nelson-Siegel curve.
    ///
    /// # Errors
    ///
    /// Returns an error if `lambda1` is not positive and finite.
    pub fn new(beta1: f64, beta2: f64, beta3: f64, lambda1: f64) -> MathResult<Self> {
        check_decay("lambda1", lambda1)?;

        Ok(Self {
            beta1,
            beta2,
            beta3,
            lambda1,
        })
    }

    /// Creates a curve from `[β₁, β₂, β₃, λ₁]`.
    pub fn from_parameters(params: &[f64]) -> MathResult<Self> {
        match params {
            [b1, b2, b3, l1] => Self::new(*b1, *b2, *b3, *l1),
            _ => Err(MathError::invalid_input(format!(
                "Nelson-Siegel takes {} parameters, got {}",
                Self::NUM_PARAMS,
                params.len()
            ))),
        }
    }

    /// Returns the model parameters as `[β₁, β₂, β₃, λ₁]`.
    pub fn parameters(&self) -> [f64; 4] {
        [self.beta1, self.beta2, self.beta3, self.lambda1]
    }

    /// Spot rate at time `t`; `t <= 0` gives the short rate `β₁ + β₂`.
    pub fn rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta1 + self.beta2;
        }

        let x = t / self.lambda1;
        self.beta1 + self.beta2 * loading_factor_1(x) + self.beta3 * loading_factor_2(x)
    }
}

impl Interpolator for NelsonSiegel {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        Ok(self.rate(t))
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        if t <= 0.0 {
            return Ok(0.0);
        }

        let (dl1, dl2) = loading_derivatives(t / self.lambda1);
        Ok((self.beta2 * dl1 + self.beta3 * dl2) / self.lambda1)
    }

    fn allows_extrapolation(&self) -> bool {
        true
    }

    fn min_x(&self) -> f64 {
        0.0
    }

    fn max_x(&self) -> f64 {
        f64::INFINITY
    }
}

/// Nelson-Siegel-Svensson yield curve model.
///
/// Nelson-Siegel with a second hump term:
///
/// ```text
/// r(t) = β₁ + β₂ * L₁(t/λ₁) + β₃ * L₂(t/λ₁) + β₄ * L₂(t/λ₂)
/// ```
///
/// # Example
///
/// ```rust
/// use ratecurve_math::interpolation::Svensson;
///
/// let sv = Svensson::new(0.045, -0.02, 0.01, -0.005, 2.0, 8.0).unwrap();
/// assert!(sv.rate(5.0) > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svensson {
    beta1: f64,
    beta2: f64,
    beta3: f64,
    beta4: f64,
    lambda1: f64,
    lambda2: f64,
}

impl Svensson {
    /// Number of model parameters.
    pub const NUM_PARAMS: usize = 6;

    /// Creates a new Svensson curve.
    ///
    /// # Errors
    ///
    /// Returns an error if either decay factor is not positive and finite.
    pub fn new(
        beta1: f64,
        beta2: f64,
        beta3: f64,
        beta4: f64,
        lambda1: f64,
        lambda2: f64,
    ) -> MathResult<Self> {
        check_decay("lambda1", lambda1)?;
        check_decay("lambda2", lambda2)?;

        Ok(Self {
            beta1,
            beta2,
            beta3,
            beta4,
            lambda1,
            lambda2,
        })
    }

    /// Creates a curve from `[β₁, β₂, β₃, β₄, λ₁, λ₂]`.
    pub fn from_parameters(params: &[f64]) -> MathResult<Self> {
        match params {
            [b1, b2, b3, b4, l1, l2] => Self::new(*b1, *b2, *b3, *b4, *l1, *l2),
            _ => Err(MathError::invalid_input(format!(
                "Svensson takes {} parameters, got {}",
                Self::NUM_PARAMS,
                params.len()
            ))),
        }
    }

    /// Returns the model parameters as `[β₁, β₂, β₃, β₄, λ₁, λ₂]`.
    pub fn parameters(&self) -> [f64; 6] {
        [
            self.beta1,
            self.beta2,
            self.beta3,
            self.beta4,
            self.lambda1,
            self.lambda2,
        ]
    }

    /// Spot rate at time `t`; `t <= 0` gives the short rate `β₁ + β₂`.
    pub fn rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta1 + self.beta2;
        }

        let x1 = t / self.lambda1;
        let x2 = t / self.lambda2;

        self.beta1
            + self.beta2 * loading_factor_1(x1)
            + self.beta3 * loading_factor_2(x1)
            + self.beta4 * loading_factor_2(x2)
    }
}

impl Interpolator for Svensson {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        Ok(self.rate(t))
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        if t <= 0.0 {
            return Ok(0.0);
        }

        let (dl1_1, dl2_1) = loading_derivatives(t / self.lambda1);
        let (_, dl2_2) = loading_derivatives(t / self.lambda2);

        Ok((self.beta2 * dl1_1 + self.beta3 * dl2_1) / self.lambda1
            + self.beta4 * dl2_2 / self.lambda2)
    }

    fn allows_extrapolation(&self) -> bool {
        true
    }

    fn min_x(&self) -> f64 {
        0.0
    }

    fn max_x(&self) -> f64 {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ============ Nelson-Siegel Tests ============

    #[test]
    fn test_nelson_siegel_asymptotic() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();

        // As t → ∞, r(t) → β₁
        assert_relative_eq!(ns.rate(100.0), 0.045, epsilon = 0.001);
    }

    #[test]
    fn test_nelson_siegel_short_rate() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();

        assert_relative_eq!(ns.rate(0.0), 0.025, epsilon = 1e-15);
        assert_relative_eq!(ns.rate(1e-12), 0.025, epsilon = 1e-10);
    }

    #[test]
    fn test_nelson_siegel_known_value() {
        let ns = NelsonSiegel::new(0.05, -0.01, 0.02, 1.0).unwrap();
        let e = (-1.0_f64).exp();
        let expected = 0.05 - 0.01 * (1.0 - e) + 0.02 * ((1.0 - e) - e);
        assert_relative_eq!(ns.rate(1.0), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_nelson_siegel_hump() {
        let ns = NelsonSiegel::new(0.03, 0.0, 0.02, 2.0).unwrap();

        let r_short = ns.rate(0.5);
        let r_mid = ns.rate(2.0);
        let r_long = ns.rate(20.0);

        assert!(r_mid > r_short);
        assert!(r_mid > r_long);
    }

    #[test]
    fn test_nelson_siegel_derivative() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();

        assert_eq!(ns.derivative(0.0).unwrap(), 0.0);
        assert!(ns.derivative(100.0).unwrap().abs() < 1e-6);

        let t = 3.0;
        let h = 1e-6;
        let numerical = (ns.rate(t + h) - ns.rate(t - h)) / (2.0 * h);
        assert_relative_eq!(ns.derivative(t).unwrap(), numerical, epsilon = 1e-8);
    }

    #[test]
    fn test_nelson_siegel_invalid_lambda() {
        assert!(NelsonSiegel::new(0.045, -0.02, 0.01, 0.0).is_err());
        assert!(NelsonSiegel::new(0.045, -0.02, 0.01, -1.0).is_err());
        assert!(NelsonSiegel::new(0.045, -0.02, 0.01, f64::NAN).is_err());
    }

    #[test]
    fn test_parameter_roundtrip() {
        let ns = NelsonSiegel::from_parameters(&[0.04, -0.01, 0.02, 1.5]).unwrap();
        assert_eq!(ns.parameters(), [0.04, -0.01, 0.02, 1.5]);
        assert!(NelsonSiegel::from_parameters(&[0.04, -0.01]).is_err());

        let params = [0.04, -0.01, 0.02, -0.01, 1.5, 6.0];
        assert_eq!(Svensson::from_parameters(&params).unwrap().parameters(), params);
        assert!(Svensson::from_parameters(&params[..4]).is_err());
    }

    // ============ Svensson Tests ============

    #[test]
    fn test_svensson_asymptotic() {
        let sv = Svensson::new(0.045, -0.02, 0.01, -0.005, 2.0, 8.0).unwrap();
        assert_relative_eq!(sv.rate(200.0), 0.045, epsilon = 0.001);
    }

    #[test]
    fn test_svensson_reduces_to_nelson_siegel() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
        let sv = Svensson::new(0.045, -0.02, 0.01, 0.0, 2.0, 5.0).unwrap();

        for t in [0.5, 1.0, 2.0, 5.0, 10.0] {
            assert_relative_eq!(ns.rate(t), sv.rate(t), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_svensson_derivative() {
        let sv = Svensson::new(0.045, -0.02, 0.01, -0.005, 2.0, 8.0).unwrap();

        let t = 5.0;
        let h = 1e-6;
        let numerical = (sv.rate(t + h) - sv.rate(t - h)) / (2.0 * h);

        assert_relative_eq!(sv.derivative(t).unwrap(), numerical, epsilon = 1e-8);
    }

    #[test]
    fn test_svensson_invalid_lambda() {
        assert!(Svensson::new(0.045, -0.02, 0.01, -0.005, 0.0, 8.0).is_err());
        assert!(Svensson::new(0.045, -0.02, 0.01, -0.005, 2.0, -1.0).is_err());
    }

    #[test]
    fn test_parametric_allows_extrapolation() {
        let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
        let sv = Svensson::new(0.045, -0.02, 0.01, -0.005, 2.0, 8.0).unwrap();

        assert!(ns.allows_extrapolation());
        assert!(sv.allows_extrapolation());
        assert!(ns.interpolate(50.0).is_ok());
        assert!(sv.interpolate(50.0).is_ok());
    }
}
