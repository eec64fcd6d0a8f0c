//! Error types for curve operations.
//!
//! Every fallible operation on terms, spot rates, interpolations and curves
//! reports through [`CurveError`]. Validation happens before a new value is
//! produced, so an error never leaves a half-built result behind.

use ratecurve_core::CoreError;
use ratecurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Bad constructor input: unknown names, malformed strings, mismatched
    /// lengths, out-of-range positions.
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of what's invalid.
        reason: String,
    },

    /// Two spot rates with different conventions were combined.
    #[error("Slot mismatch: expected {expected}, got {got}")]
    SlotMismatch {
        /// Convention of the receiver.
        expected: String,
        /// Convention of the operand.
        got: String,
    },

    /// Too few points to prepare an interpolation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// A parametric fit did not converge.
    #[error("Fit failed after {iterations} iterations (objective: {objective:.3e}): {reason}")]
    FitError {
        /// Number of optimizer iterations performed.
        iterations: u32,
        /// Final sum of squared residuals.
        objective: f64,
        /// Description of the failure.
        reason: String,
    },

    /// Operation not allowed in the current state or for these operands.
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is not allowed.
        reason: String,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}

impl CurveError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates a slot mismatch error.
    #[must_use]
    pub fn slot_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::SlotMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a fit error.
    #[must_use]
    pub fn fit_error(iterations: u32, objective: f64, reason: impl Into<String>) -> Self {
        Self::FitError {
            iterations,
            objective,
            reason: reason.into(),
        }
    }

    /// Creates an invalid operation error.
    #[must_use]
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CurveError {
    fn from(err: CoreError) -> Self {
        Self::invalid_argument(err.to_string())
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData { required, actual } => {
                Self::insufficient_data(required, actual)
            }
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::fit_error(iterations, residual, "optimizer did not converge"),
            other => Self::invalid_argument(other.to_string()),
        }
    }
}
