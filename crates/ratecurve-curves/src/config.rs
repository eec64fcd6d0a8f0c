//! Configuration for fitting and for building curves from files.
//!
//! Every field carries a serde default, so a configuration file only has to
//! name what differs. Configurations validate to a list of
//! [`ValidationError`]s before anything is built.
//!
//! ```rust
//! use ratecurve_curves::config::CurveConfig;
//!
//! let config = CurveConfig::from_toml_str(r#"
//!     refdate = "2025-01-02"
//!     terms = [1, 21, 42, 63, 126, 252]
//!     units = "day"
//!     rates = [0.1050, 0.1055, 0.1058, 0.1060, 0.1065, 0.1070]
//!     compounding = "discrete"
//!
//!     [interpolation]
//!     method = "flatforward"
//! "#).unwrap();
//!
//! let curve = config.build().unwrap();
//! assert!(curve.is_bound());
//! ```

use std::fmt;

use ratecurve_core::calendars::CalendarRegistry;
use ratecurve_core::{Compounding, Date, DayCountConvention, TermUnits};
use ratecurve_math::optimization::OptimizationConfig;
use serde::{Deserialize, Serialize};

use crate::curve::SpotRateCurve;
use crate::error::{CurveError, CurveResult};
use crate::interpolation::{Interpolation, InterpolationKind};
use crate::spot_rate::SpotRate;
use crate::term::Term;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for validating configuration.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn check(&self) -> CurveResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(CurveError::config(message))
    }
}

// =============================================================================
// FIT CONFIG
// =============================================================================

/// Settings for parametric least-squares fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Relative improvement in the objective below which a fit has converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Maximum optimizer iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Initial Levenberg-Marquardt damping.
    #[serde(default = "default_initial_damping")]
    pub initial_damping: f64,

    /// Damping adjustment factor.
    #[serde(default = "default_damping_factor")]
    pub damping_factor: f64,

    /// Relative step for the finite-difference Jacobian.
    #[serde(default = "default_jacobian_step")]
    pub jacobian_step: f64,
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> u32 {
    500
}

fn default_initial_damping() -> f64 {
    1e-3
}

fn default_damping_factor() -> f64 {
    10.0
}

fn default_jacobian_step() -> f64 {
    1e-6
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            initial_damping: default_initial_damping(),
            damping_factor: default_damping_factor(),
            jacobian_step: default_jacobian_step(),
        }
    }
}

impl FitConfig {
    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Optimizer settings for these fit settings.
    pub fn to_optimization_config(&self) -> OptimizationConfig {
        OptimizationConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            step_size: self.jacobian_step,
            initial_damping: self.initial_damping,
            damping_factor: self.damping_factor,
        }
    }
}

impl Validate for FitConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            errors.push(ValidationError::new("tolerance", "Tolerance must be positive"));
        }
        if self.max_iterations == 0 {
            errors.push(ValidationError::new(
                "max_iterations",
                "Max iterations must be at least 1",
            ));
        }
        if !(self.initial_damping > 0.0 && self.initial_damping.is_finite()) {
            errors.push(ValidationError::new(
                "initial_damping",
                "Initial damping must be positive",
            ));
        }
        if !(self.damping_factor > 1.0 && self.damping_factor.is_finite()) {
            errors.push(ValidationError::new(
                "damping_factor",
                "Damping factor must be greater than 1",
            ));
        }
        if !(self.jacobian_step > 0.0 && self.jacobian_step < 1.0) {
            errors.push(ValidationError::new(
                "jacobian_step",
                "Jacobian step must be in (0, 1)",
            ));
        }

        errors
    }
}

// =============================================================================
// INTERPOLATION CONFIG
// =============================================================================

/// Interpolation section of a curve file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Method name, as accepted by [`Interpolation::from_name`].
    pub method: String,

    /// Hold boundary rates constant outside the sample range.
    #[serde(default)]
    pub propagate: bool,

    /// Model parameters for parametric methods. Used as the initial guess
    /// when `fit` is set.
    #[serde(default)]
    pub parameters: Option<Vec<f64>>,

    /// Fit the parametric model to the curve's rates.
    #[serde(default)]
    pub fit: bool,
}

impl InterpolationConfig {
    /// Creates a configuration for `method` with defaults elsewhere.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            propagate: false,
            parameters: None,
            fit: false,
        }
    }

    /// The configured interpolation.
    pub fn to_interpolation(&self) -> CurveResult<Interpolation> {
        let mut kind = InterpolationKind::from_name(&self.method)?;
        if let Some(params) = &self.parameters {
            kind = kind.with_parameters(params)?;
        }
        Ok(Interpolation::new(kind).with_propagate(self.propagate))
    }
}

impl Validate for InterpolationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        match InterpolationKind::from_name(&self.method) {
            Ok(kind) => {
                if let Some(params) = &self.parameters {
                    if let Err(e) = kind.with_parameters(params) {
                        errors.push(ValidationError::new("parameters", e.to_string()));
                    }
                }
                if self.fit && !kind.is_parametric() {
                    errors.push(ValidationError::new(
                        "fit",
                        format!("{} cannot be fitted", kind.name()),
                    ));
                }
            }
            Err(_) => errors.push(ValidationError::new(
                "method",
                format!(
                    "Unknown method '{}', expected one of: {}",
                    self.method,
                    InterpolationKind::NAMES.join(", ")
                ),
            )),
        }

        errors
    }
}

// =============================================================================
// CURVE CONFIG
// =============================================================================

/// A spot-rate curve described in JSON or TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Reference date (YYYY-MM-DD).
    pub refdate: Date,

    /// Term values.
    pub terms: Vec<f64>,

    /// Term units.
    #[serde(default = "default_units")]
    pub units: TermUnits,

    /// Spot rates, one per term.
    pub rates: Vec<f64>,

    /// Compounding of the rates.
    #[serde(default)]
    pub compounding: Compounding,

    /// Day count convention of the rates.
    #[serde(default)]
    pub daycount: DayCountConvention,

    /// Calendar name, looked up in the global registry.
    #[serde(default = "default_calendar")]
    pub calendar: String,

    /// Interpolation to bind, if any.
    #[serde(default)]
    pub interpolation: Option<InterpolationConfig>,

    /// Fit settings used when the interpolation asks for a fit.
    #[serde(default)]
    pub fit: FitConfig,
}

fn default_units() -> TermUnits {
    TermUnits::Day
}

fn default_calendar() -> String {
    "actual".to_string()
}

impl CurveConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> CurveResult<Self> {
        serde_json::from_str(json).map_err(|e| CurveError::config(e.to_string()))
    }

    /// Parses a configuration from TOML.
    pub fn from_toml_str(toml: &str) -> CurveResult<Self> {
        toml::from_str(toml).map_err(|e| CurveError::config(e.to_string()))
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json_string(&self) -> CurveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CurveError::config(e.to_string()))
    }

    /// Validates the configuration and builds the curve it describes.
    pub fn build(&self) -> CurveResult<SpotRateCurve> {
        self.check()?;

        let rates = SpotRate::new(
            self.rates.clone(),
            self.compounding,
            self.daycount,
            self.calendar.clone(),
        );
        let mut curve = SpotRateCurve::new(
            Term::new(self.terms.clone(), self.units),
            rates,
            self.refdate,
        )?;

        if let Some(section) = &self.interpolation {
            let interpolation = section.to_interpolation()?;
            if section.fit {
                curve.fit_interpolation(&interpolation, &self.fit)?;
            } else {
                curve.set_interpolation(Some(interpolation))?;
            }
        }

        log::debug!(
            "built curve from config: {} points, {}",
            curve.len(),
            curve.rates().convention()
        );
        Ok(curve)
    }
}

impl Validate for CurveConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.terms.is_empty() {
            errors.push(ValidationError::new("terms", "Terms cannot be empty"));
        }
        if self.terms.len() != self.rates.len() {
            errors.push(ValidationError::new(
                "rates",
                format!(
                    "Expected {} rates, got {}",
                    self.terms.len(),
                    self.rates.len()
                ),
            ));
        }
        if self.terms.iter().any(|t| !t.is_finite()) {
            errors.push(ValidationError::new("terms", "Terms must be finite"));
        }
        if !CalendarRegistry::global().contains(&self.calendar) {
            errors.push(ValidationError::new(
                "calendar",
                format!("Unknown calendar '{}'", self.calendar),
            ));
        }
        if let Some(section) = &self.interpolation {
            errors.extend(section.validate().into_iter().map(|e| {
                ValidationError::new(format!("interpolation.{}", e.field), e.message)
            }));
        }
        errors.extend(
            self.fit
                .validate()
                .into_iter()
                .map(|e| ValidationError::new(format!("fit.{}", e.field), e.message)),
        );

        errors
    }
}
