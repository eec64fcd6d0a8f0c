//! Interpolation methods for spot-rate curves.
//!
//! An [`Interpolation`] is an unbound description: the method and whether
//! out-of-range queries hold the boundary rate flat. [`Interpolation::prepare`]
//! binds it to a set of samples and returns a [`BoundInterpolation`], the
//! only type that can be evaluated.
//!
//! Sample terms are always given in years.
//!
//! | Method | Name | Min points | Natural extension |
//! |--------|------|-----------|-------------------|
//! | Flat forward | `flatforward` | 1 | last forward rate |
//! | Linear | `linear` | 2 | boundary segment |
//! | Log-linear | `loglinear` | 2 | boundary segment in log space |
//! | Natural spline | `naturalspline` | 3 | linear with end slope |
//! | Hermite spline | `hermitespline` | 3 | linear with end slope |
//! | Monotone spline | `monotonespline` | 3 | linear with end slope |
//! | Nelson-Siegel | `nelsonsiegel` | 4 | formula |
//! | Nelson-Siegel-Svensson | `nelsonsiegelsvensson` | 6 | formula |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ratecurve_core::Compounding;
use ratecurve_math::interpolation::{
    CubicSpline, FlatForward, HermiteSpline, Interpolator, LinearInterpolator,
    LogLinearInterpolator, MonotoneSpline, NelsonSiegel, Svensson,
};
use ratecurve_math::optimization::levenberg_marquardt;
use serde::{Deserialize, Serialize};

use crate::config::{FitConfig, Validate};
use crate::error::{CurveError, CurveResult};

/// Nelson-Siegel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelsonSiegelParams {
    /// Long-term level.
    pub beta1: f64,
    /// Short-term component.
    pub beta2: f64,
    /// Medium-term hump.
    pub beta3: f64,
    /// Decay factor in years.
    pub lambda1: f64,
}

impl Default for NelsonSiegelParams {
    fn default() -> Self {
        Self {
            beta1: 0.05,
            beta2: -0.01,
            beta3: 0.01,
            lambda1: 2.0,
        }
    }
}

impl NelsonSiegelParams {
    /// Creates parameters from `[β₁, β₂, β₃, λ₁]`.
    pub fn from_slice(params: &[f64]) -> CurveResult<Self> {
        Ok(Self::from_model(NelsonSiegel::from_parameters(params)?))
    }

    /// Returns `[β₁, β₂, β₃, λ₁]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.beta1, self.beta2, self.beta3, self.lambda1]
    }

    fn model(&self) -> CurveResult<NelsonSiegel> {
        Ok(NelsonSiegel::new(
            self.beta1,
            self.beta2,
            self.beta3,
            self.lambda1,
        )?)
    }

    fn from_model(model: NelsonSiegel) -> Self {
        let [beta1, beta2, beta3, lambda1] = model.parameters();
        Self {
            beta1,
            beta2,
            beta3,
            lambda1,
        }
    }
}

/// Nelson-Siegel-Svensson parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvenssonParams {
    /// Long-term level.
    pub beta1: f64,
    /// Short-term component.
    pub beta2: f64,
    /// First hump.
    pub beta3: f64,
    /// Second hump.
    pub beta4: f64,
    /// First decay factor in years.
    pub lambda1: f64,
    /// Second decay factor in years.
    pub lambda2: f64,
}

impl Default for SvenssonParams {
    fn default() -> Self {
        Self {
            beta1: 0.05,
            beta2: -0.01,
            beta3: 0.01,
            beta4: 0.01,
            lambda1: 2.0,
            lambda2: 8.0,
        }
    }
}

impl SvenssonParams {
    /// Creates parameters from `[β₁, β₂, β₃, β₄, λ₁, λ₂]`.
    pub fn from_slice(params: &[f64]) -> CurveResult<Self> {
        Ok(Self::from_model(Svensson::from_parameters(params)?))
    }

    /// Returns `[β₁, β₂, β₃, β₄, λ₁, λ₂]`.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.beta1,
            self.beta2,
            self.beta3,
            self.beta4,
            self.lambda1,
            self.lambda2,
        ]
    }

    fn model(&self) -> CurveResult<Svensson> {
        Ok(Svensson::from_parameters(&self.to_array())?)
    }

    fn from_model(model: Svensson) -> Self {
        let [beta1, beta2, beta3, beta4, lambda1, lambda2] = model.parameters();
        Self {
            beta1,
            beta2,
            beta3,
            beta4,
            lambda1,
            lambda2,
        }
    }
}

/// The interpolation method, with parameters for the parametric models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolationKind {
    /// Constant forward rates between samples.
    FlatForward,
    /// Linear in rates.
    Linear,
    /// Linear in log rates.
    LogLinear,
    /// Natural cubic spline.
    NaturalSpline,
    /// Cubic Hermite spline with Catmull-Rom tangents.
    HermiteSpline,
    /// Cubic Hermite spline with Fritsch-Carlson tangents.
    MonotoneSpline,
    /// Nelson-Siegel model.
    NelsonSiegel(NelsonSiegelParams),
    /// Nelson-Siegel-Svensson model.
    NelsonSiegelSvensson(SvenssonParams),
}

impl InterpolationKind {
    /// Names of all registered methods.
    pub const NAMES: [&'static str; 8] = [
        "flatforward",
        "linear",
        "loglinear",
        "naturalspline",
        "hermitespline",
        "monotonespline",
        "nelsonsiegel",
        "nelsonsiegelsvensson",
    ];

    /// Registered name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FlatForward => "flatforward",
            Self::Linear => "linear",
            Self::LogLinear => "loglinear",
            Self::NaturalSpline => "naturalspline",
            Self::HermiteSpline => "hermitespline",
            Self::MonotoneSpline => "monotonespline",
            Self::NelsonSiegel(_) => "nelsonsiegel",
            Self::NelsonSiegelSvensson(_) => "nelsonsiegelsvensson",
        }
    }

    /// Looks up a method by name (case-insensitive).
    ///
    /// Parametric methods start from default parameters.
    pub fn from_name(name: &str) -> CurveResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "flatforward" => Ok(Self::FlatForward),
            "linear" => Ok(Self::Linear),
            "loglinear" => Ok(Self::LogLinear),
            "naturalspline" => Ok(Self::NaturalSpline),
            "hermitespline" => Ok(Self::HermiteSpline),
            "monotonespline" => Ok(Self::MonotoneSpline),
            "nelsonsiegel" => Ok(Self::NelsonSiegel(NelsonSiegelParams::default())),
            "nelsonsiegelsvensson" => {
                Ok(Self::NelsonSiegelSvensson(SvenssonParams::default()))
            }
            other => Err(CurveError::invalid_argument(format!(
                "unknown interpolation '{other}', expected one of {}",
                Self::NAMES.join(", ")
            ))),
        }
    }

    /// Minimum number of samples needed to prepare the method.
    pub fn min_points(&self) -> usize {
        match self {
            Self::FlatForward => 1,
            Self::Linear | Self::LogLinear => 2,
            Self::NaturalSpline | Self::HermiteSpline | Self::MonotoneSpline => 3,
            Self::NelsonSiegel(_) => NelsonSiegel::NUM_PARAMS,
            Self::NelsonSiegelSvensson(_) => Svensson::NUM_PARAMS,
        }
    }

    /// Returns true for the Nelson-Siegel family.
    pub fn is_parametric(&self) -> bool {
        matches!(self, Self::NelsonSiegel(_) | Self::NelsonSiegelSvensson(_))
    }

    /// Model parameters for parametric methods.
    pub fn parameters(&self) -> Option<Vec<f64>> {
        match self {
            Self::NelsonSiegel(p) => Some(p.to_array().to_vec()),
            Self::NelsonSiegelSvensson(p) => Some(p.to_array().to_vec()),
            _ => None,
        }
    }

    /// Replaces the parameters of a parametric method.
    pub fn with_parameters(&self, params: &[f64]) -> CurveResult<Self> {
        match self {
            Self::NelsonSiegel(_) => Ok(Self::NelsonSiegel(NelsonSiegelParams::from_slice(params)?)),
            Self::NelsonSiegelSvensson(_) => Ok(Self::NelsonSiegelSvensson(
                SvenssonParams::from_slice(params)?,
            )),
            other => Err(CurveError::invalid_argument(format!(
                "{} takes no parameters",
                other.name()
            ))),
        }
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InterpolationKind {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// An unbound interpolation: method plus boundary behaviour.
///
/// # Example
///
/// ```rust
/// use ratecurve_core::Compounding;
/// use ratecurve_curves::interpolation::Interpolation;
///
/// let bound = Interpolation::linear()
///     .prepare(&[1.0, 2.0], &[0.02, 0.04], Compounding::Continuous)
///     .unwrap();
/// assert!((bound.evaluate(1.5) - 0.03).abs() < 1e-12);
/// assert!((bound.evaluate(3.0) - 0.06).abs() < 1e-12);
///
/// let held = Interpolation::linear()
///     .with_propagate(true)
///     .prepare(&[1.0, 2.0], &[0.02, 0.04], Compounding::Continuous)
///     .unwrap();
/// assert!((held.evaluate(3.0) - 0.04).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    kind: InterpolationKind,
    propagate: bool,
}

impl Interpolation {
    /// Creates an interpolation using the method's natural extension.
    #[must_use]
    pub fn new(kind: InterpolationKind) -> Self {
        Self {
            kind,
            propagate: false,
        }
    }

    /// Flat forward interpolation.
    #[must_use]
    pub fn flat_forward() -> Self {
        Self::new(InterpolationKind::FlatForward)
    }

    /// Linear interpolation.
    #[must_use]
    pub fn linear() -> Self {
        Self::new(InterpolationKind::Linear)
    }

    /// Log-linear interpolation.
    #[must_use]
    pub fn log_linear() -> Self {
        Self::new(InterpolationKind::LogLinear)
    }

    /// Natural cubic spline.
    #[must_use]
    pub fn natural_spline() -> Self {
        Self::new(InterpolationKind::NaturalSpline)
    }

    /// Hermite spline.
    #[must_use]
    pub fn hermite_spline() -> Self {
        Self::new(InterpolationKind::HermiteSpline)
    }

    /// Monotone spline.
    #[must_use]
    pub fn monotone_spline() -> Self {
        Self::new(InterpolationKind::MonotoneSpline)
    }

    /// Nelson-Siegel model with the given parameters.
    #[must_use]
    pub fn nelson_siegel(params: NelsonSiegelParams) -> Self {
        Self::new(InterpolationKind::NelsonSiegel(params))
    }

    /// Nelson-Siegel-Svensson model with the given parameters.
    #[must_use]
    pub fn nelson_siegel_svensson(params: SvenssonParams) -> Self {
        Self::new(InterpolationKind::NelsonSiegelSvensson(params))
    }

    /// Looks up a method by registered name.
    pub fn from_name(name: &str) -> CurveResult<Self> {
        Ok(Self::new(InterpolationKind::from_name(name)?))
    }

    /// Sets whether out-of-range queries hold the boundary rate flat.
    #[must_use]
    pub fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// Returns the method.
    pub fn kind(&self) -> &InterpolationKind {
        &self.kind
    }

    /// Returns the registered name of the method.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns true if out-of-range queries hold the boundary rate flat.
    pub fn propagate(&self) -> bool {
        self.propagate
    }

    /// Binds the method to samples.
    ///
    /// `terms` are in years, strictly increasing and finite; `rates` are
    /// annualized under `compounding`. Flat forward interpolates in that
    /// compounding; the other methods only use it for instantaneous
    /// forwards.
    pub fn prepare(
        &self,
        terms: &[f64],
        rates: &[f64],
        compounding: Compounding,
    ) -> CurveResult<BoundInterpolation> {
        validate_samples(terms, rates, self.kind.min_points())?;

        let xs = terms.to_vec();
        let ys = rates.to_vec();

        let engine = match self.kind {
            InterpolationKind::FlatForward => {
                // The origin knot is implicit; a sample at term 0 only sets
                // the rate returned there.
                let skip = usize::from(terms[0] <= 0.0);
                if terms.len() == skip {
                    return Err(CurveError::insufficient_data(2, 1));
                }
                let log_factors = terms[skip..]
                    .iter()
                    .zip(&rates[skip..])
                    .map(|(t, r)| compounding.compound(*t, *r).ln())
                    .collect();
                Engine::FlatForward {
                    curve: FlatForward::new(xs[skip..].to_vec(), log_factors)?
                        .with_extrapolation(),
                    first_rate: rates[0],
                }
            }
            InterpolationKind::Linear => {
                Engine::Rates(Arc::new(LinearInterpolator::new(xs, ys)?.with_extrapolation()))
            }
            InterpolationKind::LogLinear => Engine::Rates(Arc::new(
                LogLinearInterpolator::new(xs, ys)?.with_extrapolation(),
            )),
            InterpolationKind::NaturalSpline => {
                Engine::Rates(Arc::new(CubicSpline::new(xs, ys)?.with_extrapolation()))
            }
            InterpolationKind::HermiteSpline => {
                Engine::Rates(Arc::new(HermiteSpline::new(xs, ys)?.with_extrapolation()))
            }
            InterpolationKind::MonotoneSpline => {
                Engine::Rates(Arc::new(MonotoneSpline::new(xs, ys)?.with_extrapolation()))
            }
            InterpolationKind::NelsonSiegel(params) => Engine::Rates(Arc::new(params.model()?)),
            InterpolationKind::NelsonSiegelSvensson(params) => {
                Engine::Rates(Arc::new(params.model()?))
            }
        };

        Ok(BoundInterpolation {
            interpolation: *self,
            engine,
            compounding,
            min_term: terms[0],
            max_term: terms[terms.len() - 1],
        })
    }

    /// Estimates the parameters of a parametric method from samples.
    ///
    /// The current parameters are the initial guess. Parameters are found
    /// by Levenberg-Marquardt least squares on the rate residuals with the
    /// decay factors optimized in log space, which keeps them positive.
    /// Returns a copy carrying the fitted parameters.
    pub fn fit(&self, terms: &[f64], rates: &[f64], config: &FitConfig) -> CurveResult<Self> {
        let Some(initial) = self.kind.parameters() else {
            return Err(CurveError::invalid_argument(format!(
                "{} is not a parametric interpolation",
                self.name()
            )));
        };
        validate_samples(terms, rates, self.kind.min_points())?;
        config.check().map_err(|e| match e {
            CurveError::Config { message } => {
                CurveError::invalid_argument(format!("invalid fit settings: {message}"))
            }
            other => other,
        })?;

        // Decay factors are the trailing parameters of both models.
        let n_decay = match self.kind {
            InterpolationKind::NelsonSiegelSvensson(_) => 2,
            _ => 1,
        };
        let n = initial.len();
        let to_model = move |p: &[f64]| -> Vec<f64> {
            p.iter()
                .enumerate()
                .map(|(i, v)| if i >= n - n_decay { v.exp() } else { *v })
                .collect()
        };

        let start: Vec<f64> = initial
            .iter()
            .enumerate()
            .map(|(i, v)| if i >= n - n_decay { v.ln() } else { *v })
            .collect();

        let kind = self.kind;
        let residuals = |p: &[f64]| -> Vec<f64> {
            match model_rates(kind, &to_model(p), terms) {
                Some(model) => model.iter().zip(rates).map(|(m, r)| m - r).collect(),
                None => vec![f64::NAN; terms.len()],
            }
        };

        let result = levenberg_marquardt(residuals, &start, &config.to_optimization_config())
            .map_err(|e| CurveError::fit_error(0, f64::NAN, e.to_string()))?;

        if !result.converged {
            log::warn!(
                "{} fit did not converge after {} iterations (objective {:.3e})",
                self.name(),
                result.iterations,
                result.objective_value
            );
            return Err(CurveError::fit_error(
                result.iterations,
                result.objective_value,
                "optimizer did not converge",
            ));
        }

        let fitted = self.kind.with_parameters(&to_model(&result.parameters))?;
        log::debug!(
            "{} fit converged in {} iterations (objective {:.3e}): {:?}",
            self.name(),
            result.iterations,
            result.objective_value,
            fitted.parameters()
        );

        Ok(Self {
            kind: fitted,
            propagate: self.propagate,
        })
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.propagate {
            write!(f, "{} (propagate)", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

fn model_rates(kind: InterpolationKind, params: &[f64], terms: &[f64]) -> Option<Vec<f64>> {
    match kind {
        InterpolationKind::NelsonSiegel(_) => {
            let model = NelsonSiegel::from_parameters(params).ok()?;
            Some(terms.iter().map(|t| model.rate(*t)).collect())
        }
        InterpolationKind::NelsonSiegelSvensson(_) => {
            let model = Svensson::from_parameters(params).ok()?;
            Some(terms.iter().map(|t| model.rate(*t)).collect())
        }
        _ => None,
    }
}

fn validate_samples(terms: &[f64], rates: &[f64], min_points: usize) -> CurveResult<()> {
    if terms.len() != rates.len() {
        return Err(CurveError::invalid_argument(format!(
            "terms and rates must have same length: {} vs {}",
            terms.len(),
            rates.len()
        )));
    }
    if terms.len() < min_points {
        return Err(CurveError::insufficient_data(min_points, terms.len()));
    }
    if terms.iter().chain(rates).any(|v| !v.is_finite()) {
        return Err(CurveError::invalid_argument(
            "terms and rates must be finite",
        ));
    }
    if terms.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CurveError::invalid_argument(
            "terms must be strictly increasing",
        ));
    }
    Ok(())
}

#[derive(Clone)]
enum Engine {
    /// Log compounding factors, mapped back to rates on evaluation.
    FlatForward { curve: FlatForward, first_rate: f64 },
    /// Interpolates rates directly.
    Rates(Arc<dyn Interpolator>),
}

/// An interpolation prepared against a set of samples.
///
/// Only [`Interpolation::prepare`] creates one, so every bound value can be
/// evaluated.
#[derive(Clone)]
pub struct BoundInterpolation {
    interpolation: Interpolation,
    engine: Engine,
    compounding: Compounding,
    min_term: f64,
    max_term: f64,
}

impl fmt::Debug for BoundInterpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundInterpolation")
            .field("interpolation", &self.interpolation)
            .field("compounding", &self.compounding)
            .field("min_term", &self.min_term)
            .field("max_term", &self.max_term)
            .finish()
    }
}

impl BoundInterpolation {
    /// Rate at `term` years.
    ///
    /// With `propagate` set, terms outside the sample range take the rate
    /// at the nearest sample term. A NaN term yields NaN.
    pub fn evaluate(&self, term: f64) -> f64 {
        let t = if self.interpolation.propagate {
            term.clamp(self.min_term, self.max_term)
        } else {
            term
        };

        match &self.engine {
            Engine::FlatForward { curve, first_rate } => {
                if t <= 0.0 {
                    return *first_rate;
                }
                curve
                    .interpolate(t)
                    .map_or(f64::NAN, |log_cf| self.compounding.implied_rate(t, log_cf.exp()))
            }
            Engine::Rates(interp) => interp.interpolate(t).unwrap_or(f64::NAN),
        }
    }

    /// Continuously compounded instantaneous forward rate at `term` years,
    /// the slope of the log compounding factor implied by [`evaluate`].
    ///
    /// Where the rate is held constant (propagated terms, flat forward at or
    /// before the origin) only the time slope remains. A NaN term yields NaN.
    ///
    /// [`evaluate`]: Self::evaluate
    pub fn instantaneous_forward(&self, term: f64) -> f64 {
        let held = self.interpolation.propagate
            && (term < self.min_term || term > self.max_term);
        let rate = self.evaluate(term);

        let rate_slope = match &self.engine {
            _ if held => 0.0,
            Engine::FlatForward { .. } if term <= 0.0 => 0.0,
            Engine::FlatForward { curve, .. } => {
                return curve.derivative(term).unwrap_or(f64::NAN);
            }
            Engine::Rates(interp) => interp.derivative(term).unwrap_or(f64::NAN),
        };
        log_factor_slope(self.compounding, term, rate, rate_slope)
    }

    /// Instantaneous forward rates at every term.
    pub fn instantaneous_forwards(&self, terms: &[f64]) -> Vec<f64> {
        terms.iter().map(|t| self.instantaneous_forward(*t)).collect()
    }

    /// Compounding the sample rates were quoted in.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Rates at every term.
    pub fn evaluate_all(&self, terms: &[f64]) -> Vec<f64> {
        terms.iter().map(|t| self.evaluate(*t)).collect()
    }

    /// The interpolation this was prepared from, including fitted
    /// parameters.
    pub fn interpolation(&self) -> &Interpolation {
        &self.interpolation
    }

    /// Sample range in years.
    pub fn range(&self) -> (f64, f64) {
        (self.min_term, self.max_term)
    }
}

/// `d/dt ln(compound(t, r(t)))` given `r` and `dr/dt` at `t`.
fn log_factor_slope(compounding: Compounding, t: f64, rate: f64, rate_slope: f64) -> f64 {
    match compounding {
        Compounding::Continuous => rate + t * rate_slope,
        Compounding::Discrete => (1.0 + rate).ln() + t * rate_slope / (1.0 + rate),
        Compounding::Simple => (rate + t * rate_slope) / (1.0 + rate * t),
    }
}
