//! # Ratecurve Curves
//!
//! Spot-rate term structures for the Ratecurve library.
//!
//! This crate provides:
//!
//! - **Terms**: [`Term`] vectors in days, months or years, and
//!   [`DateRangeTerm`] derived from business-day counts between dates
//! - **Spot Rates**: [`SpotRate`] vectors bound to a compounding, day count
//!   and calendar convention, with compounding and discount factors
//! - **Interpolation**: flat forward, linear, log-linear, spline and
//!   Nelson-Siegel family methods, with least-squares fitting
//! - **Curves**: [`SpotRateCurve`] with term indexing, slicing and forward
//!   rates
//! - **Configuration**: curves described in JSON or TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use ratecurve_curves::prelude::*;
//!
//! let refdate = Date::from_ymd(2025, 1, 2).unwrap();
//! let rates = SpotRate::from_names(
//!     vec![0.1050, 0.1055, 0.1058, 0.1060, 0.1065, 0.1070],
//!     "discrete",
//!     "business/252",
//!     "actual",
//! )
//! .unwrap();
//! let terms = Term::days(vec![1.0, 21.0, 42.0, 63.0, 126.0, 252.0]);
//!
//! let curve = SpotRateCurve::new(terms, rates, refdate)
//!     .unwrap()
//!     .with_interpolation(Some(Interpolation::flat_forward()))
//!     .unwrap();
//!
//! // Rate at 30 business days
//! let rate = curve.lookup(&[30.0])[0].unwrap();
//! assert!(rate > 0.1055 && rate < 0.1058);
//!
//! // Forward rates between consecutive terms
//! let forwards = curve.forward_rates().unwrap();
//! assert_eq!(forwards.len(), 6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod curve;
pub mod error;
pub mod forward;
pub mod interpolation;
pub mod spot_rate;
pub mod term;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{CurveConfig, FitConfig, InterpolationConfig, Validate, ValidationError};
    pub use crate::curve::{InterpolationState, SpotRateCurve, TermQuery};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::forward::ForwardRateCurve;
    pub use crate::interpolation::{
        BoundInterpolation, Interpolation, InterpolationKind, NelsonSiegelParams, SvenssonParams,
    };
    pub use crate::spot_rate::{
        parse_spot_rates, Operand, ParsedSpotRates, RateConvention, SpotRate,
    };
    pub use crate::term::{DateRangeTerm, Term, TermOperand};
    pub use ratecurve_core::prelude::*;
}

pub use config::{CurveConfig, FitConfig};
pub use curve::SpotRateCurve;
pub use error::{CurveError, CurveResult};
pub use forward::ForwardRateCurve;
pub use interpolation::{Interpolation, InterpolationKind};
pub use spot_rate::{RateConvention, SpotRate};
pub use term::{DateRangeTerm, Term};
