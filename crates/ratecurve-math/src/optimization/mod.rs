//! Optimization algorithms.
//!
//! Nonlinear least squares for parametric curve fitting.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::solve_linear_system;

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Relative step size for numerical Jacobians.
    pub step_size: f64,
    /// Initial Levenberg-Marquardt damping.
    pub initial_damping: f64,
    /// Factor by which damping is raised after a rejected step and lowered
    /// after an accepted one.
    pub damping_factor: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            step_size: 1e-6,
            initial_damping: 1e-3,
            damping_factor: 10.0,
        }
    }
}

impl OptimizationConfig {
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
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value (sum of squared residuals).
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
}

const MAX_DAMPING: f64 = 1e16;
const MIN_DAMPING: f64 = 1e-16;
const ZERO_OBJECTIVE: f64 = 1e-20;
/// Damping increases tried per iteration before giving up on descent.
const MAX_STEP_ATTEMPTS: usize = 64;

fn sum_of_squares(r: &[f64]) -> f64 {
    r.iter().map(|v| v * v).sum()
}

fn norm(v: &[f64]) -> f64 {
    sum_of_squares(v).sqrt()
}

/// Central-difference Jacobian of the residual function, one column per
/// parameter.
fn numerical_jacobian<F>(residuals: &F, params: &[f64], m: usize, step: f64) -> MathResult<DMatrix<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = params.len();
    let mut jacobian = DMatrix::zeros(m, n);

    for j in 0..n {
        let h = step * params[j].abs().max(1.0);
        let mut up = params.to_vec();
        let mut down = params.to_vec();
        up[j] += h;
        down[j] -= h;

        let r_up = residuals(&up);
        let r_down = residuals(&down);
        if r_up.len() != m || r_down.len() != m {
            return Err(MathError::DimensionMismatch {
                expected: m,
                actual: r_up.len().min(r_down.len()),
            });
        }

        for i in 0..m {
            jacobian[(i, j)] = (r_up[i] - r_down[i]) / (2.0 * h);
        }
    }

    Ok(jacobian)
}

/// Minimizes `sum(r_i(p)^2)` with the Levenberg-Marquardt algorithm.
///
/// The Jacobian is computed numerically. Each iteration solves the damped
/// normal equations `(JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr`; accepted steps lower
/// the damping, rejected steps raise it.
///
/// Convergence is declared when an accepted step lowers the objective by
/// less than `tolerance * sse`, when the step is smaller than
/// `tolerance * (|p| + tolerance)`, or when the objective vanishes.
/// Running out of iterations, or finding no descent step within a bounded
/// number of damping increases, returns `converged == false` with the
/// iterations actually performed. A non-finite objective at the starting
/// point or an invalid configuration is an error.
///
/// # Example
///
/// ```rust
/// use ratecurve_math::optimization::{levenberg_marquardt, OptimizationConfig};
///
/// // Fit y = a * exp(b * x)
/// let xs: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
/// let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (0.5 * x).exp()).collect();
/// let residuals = |p: &[f64]| -> Vec<f64> {
///     xs.iter().zip(&ys).map(|(x, y)| p[0] * (p[1] * x).exp() - y).collect()
/// };
///
/// let result = levenberg_marquardt(residuals, &[1.0, 0.1], &OptimizationConfig::default()).unwrap();
/// assert!(result.converged);
/// assert!((result.parameters[0] - 2.0).abs() < 1e-6);
/// assert!((result.parameters[1] - 0.5).abs() < 1e-6);
/// ```
pub fn levenberg_marquardt<F>(
    residuals: F,
    initial: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    validate_config(config)?;
    if initial.is_empty() {
        return Err(MathError::invalid_input("no parameters to optimize"));
    }

    let mut params = initial.to_vec();
    let mut r = residuals(&params);
    let m = r.len();
    let n = params.len();

    if m < n {
        return Err(MathError::insufficient_data(n, m));
    }

    let mut sse = sum_of_squares(&r);
    if !sse.is_finite() {
        return Err(MathError::invalid_input(
            "objective is not finite at the initial guess",
        ));
    }

    let mut damping = config.initial_damping;
    let mut iterations = 0;

    for iteration in 1..=config.max_iterations {
        if sse < ZERO_OBJECTIVE {
            return Ok(OptimizationResult {
                parameters: params,
                objective_value: sse,
                iterations: iteration - 1,
                converged: true,
            });
        }
        iterations = iteration;

        let jacobian = numerical_jacobian(&residuals, &params, m, config.step_size)?;
        let jtj = jacobian.transpose() * &jacobian;
        let jtr = jacobian.transpose() * DVector::from_column_slice(&r);

        // Raise damping until a step reduces the objective.
        let mut accepted = false;
        for _ in 0..MAX_STEP_ATTEMPTS {
            let mut damped = jtj.clone();
            for k in 0..n {
                damped[(k, k)] += damping * jtj[(k, k)].max(1e-12);
            }

            let delta = match solve_linear_system(&damped, &(-&jtr)) {
                Ok(delta) => delta,
                Err(MathError::SingularMatrix) => {
                    damping *= config.damping_factor;
                    if damping > MAX_DAMPING {
                        break;
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            let step_norm = delta.norm();
            let candidate: Vec<f64> = params.iter().zip(delta.iter()).map(|(p, d)| p + d).collect();
            let r_new = residuals(&candidate);
            let sse_new = sum_of_squares(&r_new);

            log::trace!(
                "LM iteration {iteration}: sse={sse:.3e} candidate={sse_new:.3e} damping={damping:.1e} step={step_norm:.3e}"
            );

            let small_step = step_norm <= config.tolerance * (norm(&params) + config.tolerance);

            if sse_new.is_finite() && sse_new < sse {
                let improvement = sse - sse_new;
                params = candidate;
                r = r_new;
                sse = sse_new;
                damping = (damping / config.damping_factor).max(MIN_DAMPING);

                if improvement <= config.tolerance * sse || small_step || sse < ZERO_OBJECTIVE {
                    return Ok(OptimizationResult {
                        parameters: params,
                        objective_value: sse,
                        iterations,
                        converged: true,
                    });
                }
                accepted = true;
                break;
            }

            if small_step {
                // No descent left at machine resolution: stationary point.
                return Ok(OptimizationResult {
                    parameters: params,
                    objective_value: sse,
                    iterations,
                    converged: true,
                });
            }

            damping *= config.damping_factor;
            if damping > MAX_DAMPING {
                break;
            }
        }

        if !accepted {
            log::trace!("LM iteration {iteration}: no descent step found, stopping");
            break;
        }
    }

    Ok(OptimizationResult {
        parameters: params,
        objective_value: sse,
        iterations,
        converged: false,
    })
}

fn validate_config(config: &OptimizationConfig) -> MathResult<()> {
    if !(config.tolerance > 0.0 && config.tolerance.is_finite()) {
        return Err(MathError::invalid_input("tolerance must be positive"));
    }
    if !(config.damping_factor > 1.0 && config.damping_factor.is_finite()) {
        return Err(MathError::invalid_input(
            "damping factor must be greater than 1",
        ));
    }
    if !(config.initial_damping > 0.0 && config.initial_damping.is_finite()) {
        return Err(MathError::invalid_input("initial damping must be positive"));
    }
    if !(config.step_size > 0.0 && config.step_size.is_finite()) {
        return Err(MathError::invalid_input("Jacobian step must be positive"));
    }
    Ok(())
}
