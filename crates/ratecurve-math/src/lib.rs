//! # Ratecurve Math
//!
//! Numerical building blocks for the Ratecurve term structure library.
//!
//! This crate provides:
//!
//! - **Interpolation**: flat forward on log compounding factors, linear,
//!   log-linear, natural cubic, Hermite and monotone splines
//! - **Parametric Models**: Nelson-Siegel and Nelson-Siegel-Svensson
//! - **Optimization**: Levenberg-Marquardt nonlinear least squares
//! - **Linear Algebra**: tridiagonal and dense linear solves
//!
//! ## Example
//!
//! ```rust
//! use ratecurve_math::prelude::*;
//!
//! let spline = MonotoneSpline::new(vec![1.0, 2.0, 5.0], vec![0.02, 0.03, 0.035]).unwrap();
//! let y = spline.interpolate(3.0).unwrap();
//! assert!(y > 0.03 && y < 0.035);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicSpline, FlatForward, HermiteSpline, Interpolator, LinearInterpolator,
        LogLinearInterpolator, MonotoneSpline, NelsonSiegel, Svensson,
    };
    pub use crate::linear_algebra::{solve_linear_system, solve_tridiagonal};
    pub use crate::optimization::{levenberg_marquardt, OptimizationConfig, OptimizationResult};
}

pub use error::{MathError, MathResult};
