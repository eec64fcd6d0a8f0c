//! # Ratecurve
//!
//! Spot-rate term structures with pluggable interpolation.
//!
//! This facade re-exports the workspace crates:
//!
//! - [`ratecurve_core`]: dates, compounding, day counts and business-day calendars
//! - [`ratecurve_math`]: interpolation engines, parametric models and least squares
//! - [`ratecurve_curves`]: terms, spot rates and spot-rate curves
//!
//! ```rust
//! use ratecurve::prelude::*;
//!
//! let curve = SpotRateCurve::new(
//!     "1 year, 2 years, 5 years".parse::<Term>().unwrap(),
//!     SpotRate::new(
//!         vec![0.040, 0.042, 0.045],
//!         Compounding::Continuous,
//!         DayCountConvention::Actual365,
//!         "actual",
//!     ),
//!     Date::from_ymd(2025, 1, 2).unwrap(),
//! )
//! .unwrap()
//! .with_interpolation(Some(Interpolation::monotone_spline()))
//! .unwrap();
//!
//! let rates = curve.interpolate(&[3.0]).unwrap();
//! assert!(rates.values()[0] > 0.042 && rates.values()[0] < 0.045);
//! ```

#![warn(missing_docs)]

pub use ratecurve_core;
pub use ratecurve_curves;
pub use ratecurve_math;

pub use ratecurve_core::{Compounding, Date, DayCountConvention, TermUnits};
pub use ratecurve_curves::{
    CurveConfig, CurveError, CurveResult, DateRangeTerm, FitConfig, ForwardRateCurve,
    Interpolation, InterpolationKind, RateConvention, SpotRate, SpotRateCurve, Term,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use ratecurve_curves::prelude::*;
}
