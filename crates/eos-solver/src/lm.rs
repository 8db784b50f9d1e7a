//! Levenberg–Marquardt least squares with Marquardt diagonal scaling.

use crate::error::SolverResult;
use crate::jacobian::central_difference_jacobian;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Levenberg–Marquardt configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LmConfig {
    /// Maximum number of Jacobian evaluations
    pub max_iterations: usize,
    /// Absolute tolerance on the residual norm
    pub abs_tol: f64,
    /// Relative tolerance on the cost reduction of an accepted step
    pub rel_tol: f64,
    /// Relative tolerance on the step length
    pub xtol: f64,
    /// Tolerance on the cosine between residual and Jacobian columns
    pub gtol: f64,
    /// Damping at the first iteration
    pub initial_lambda: f64,
    /// Damping divisor on accepted steps, multiplier on rejected ones
    pub lambda_factor: f64,
    /// Damping ceiling; reaching it ends the iteration
    pub lambda_max: f64,
    /// Relative finite-difference step for the Jacobian
    pub fd_epsilon: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            abs_tol: 1e-10,
            rel_tol: 1e-12,
            xtol: 1e-12,
            gtol: 1e-8,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            lambda_max: 1e16,
            fd_epsilon: 1e-6,
        }
    }
}

/// State of the iteration when it stopped.
#[derive(Clone, Debug, PartialEq)]
pub struct LmTrace {
    /// Final parameter vector
    pub x: DVector<f64>,
    /// Residuals at `x`
    pub residuals: DVector<f64>,
    /// Jacobian of the residuals at `x`, empty if never computed
    pub jacobian: DMatrix<f64>,
    /// Euclidean norm of `residuals`
    pub residual_norm: f64,
    /// Number of Jacobian evaluations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

impl LmTrace {
    /// Parameter covariance `(JᵀJ)⁻¹·s²`, with `s² = ‖r‖²/(m − n)`.
    ///
    /// `None` when there are no spare degrees of freedom or `JᵀJ` is
    /// singular.
    pub fn covariance(&self) -> Option<DMatrix<f64>> {
        let (m, n) = self.jacobian.shape();
        if n == 0 || m <= n {
            return None;
        }
        let s2 = self.residual_norm.powi(2) / (m - n) as f64;
        let jtj = self.jacobian.transpose() * &self.jacobian;
        jtj.try_inverse().map(|inv| inv * s2)
    }

    /// Square roots of the covariance diagonal.
    pub fn standard_errors(&self) -> Option<Vec<f64>> {
        self.covariance()
            .map(|cov| cov.diagonal().iter().map(|v| v.max(0.0).sqrt()).collect())
    }
}

enum Stop {
    Converged,
    Stalled,
}

/// Minimize `‖r(x)‖²` from `x0`.
///
/// Non-finite residuals are treated as an infinitely bad point: at the
/// start they end the iteration unconverged, during a trial step they
/// reject the step. Errors raised by `residual_fn` itself are propagated.
pub fn levenberg_marquardt<F>(
    x0: DVector<f64>,
    residual_fn: F,
    config: &LmConfig,
) -> SolverResult<LmTrace>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    if !all_finite(&r) {
        debug!("non-finite residuals at the initial guess");
        return Ok(finish(x, r, DMatrix::zeros(0, 0), 0, false));
    }

    let n = x.len();
    let m = r.len();
    let mut cost = r.norm_squared();
    let mut lambda = config.initial_lambda;

    for iter in 1..=config.max_iterations {
        if cost.sqrt() <= config.abs_tol {
            let jac = central_difference_jacobian(&x, m, &residual_fn, config.fd_epsilon)?;
            return Ok(finish(x, r, jac, iter - 1, true));
        }

        let jac = central_difference_jacobian(&x, m, &residual_fn, config.fd_epsilon)?;
        if !jac.iter().all(|v| v.is_finite()) {
            debug!(iter, "non-finite Jacobian");
            return Ok(finish(x, r, jac, iter, false));
        }
        let jtj = jac.transpose() * &jac;
        let grad = jac.transpose() * &r;
        let diag_floor = f64::EPSILON * jtj.diagonal().max();

        let stop = loop {
            let mut damped = jtj.clone();
            for j in 0..n {
                damped[(j, j)] += lambda * jtj[(j, j)].max(diag_floor);
            }
            let Some(step) = damped.cholesky().map(|c| c.solve(&(-&grad))) else {
                lambda *= config.lambda_factor;
                if lambda > config.lambda_max {
                    break stationary(&jac, &r, config.gtol);
                }
                continue;
            };

            if step.norm() <= config.xtol * (x.norm() + config.xtol) {
                break Some(Stop::Converged);
            }

            let x_new = &x + &step;
            let r_new = residual_fn(&x_new)?;
            let cost_new = r_new.norm_squared();
            if all_finite(&r_new) && cost_new < cost {
                let small_gain = cost - cost_new <= config.rel_tol * cost && lambda <= 1.0;
                debug!(iter, cost = cost_new, lambda, "accepted step");
                x = x_new;
                r = r_new;
                cost = cost_new;
                lambda = (lambda / config.lambda_factor).max(f64::MIN_POSITIVE);
                break small_gain.then_some(Stop::Converged);
            }

            lambda *= config.lambda_factor;
            if lambda > config.lambda_max {
                break stationary(&jac, &r, config.gtol);
            }
        };

        match stop {
            Some(Stop::Converged) => {
                let jac = central_difference_jacobian(&x, m, &residual_fn, config.fd_epsilon)?;
                return Ok(finish(x, r, jac, iter, true));
            }
            Some(Stop::Stalled) => return Ok(finish(x, r, jac, iter, false)),
            None => {}
        }
    }

    let jac = central_difference_jacobian(&x, m, &residual_fn, config.fd_epsilon)?;
    Ok(finish(x, r, jac, config.max_iterations, cost.sqrt() <= config.abs_tol))
}

fn finish(
    x: DVector<f64>,
    r: DVector<f64>,
    jacobian: DMatrix<f64>,
    iterations: usize,
    converged: bool,
) -> LmTrace {
    LmTrace {
        residual_norm: r.norm(),
        x,
        residuals: r,
        jacobian,
        iterations,
        converged,
    }
}

fn all_finite(v: &DVector<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Damping overflowed: accept the point only if the residual is
/// orthogonal to every Jacobian column. A NaN cosine counts as the worst.
fn stationary(jac: &DMatrix<f64>, r: &DVector<f64>, gtol: f64) -> Option<Stop> {
    let r_norm = r.norm();
    let worst = jac
        .column_iter()
        .map(|col| {
            let scale = col.norm() * r_norm;
            if scale == 0.0 { 0.0 } else { col.dot(r).abs() / scale }
        })
        .fold(0.0, |acc: f64, c| if c.is_nan() { f64::INFINITY } else { acc.max(c) });
    if worst <= gtol {
        Some(Stop::Converged)
    } else {
        Some(Stop::Stalled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exponential(t: &[f64], y: &[f64]) -> impl Fn(&DVector<f64>) -> SolverResult<DVector<f64>> {
        let (t, y) = (t.to_vec(), y.to_vec());
        move |x: &DVector<f64>| {
            Ok(DVector::from_iterator(
                t.len(),
                t.iter().zip(&y).map(|(t, y)| x[0] * (x[1] * t).exp() - y),
            ))
        }
    }

    #[test]
    fn fits_exact_exponential() {
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.3).collect();
        let y: Vec<f64> = t.iter().map(|t| 2.5 * (-0.7 * t).exp()).collect();
        let trace = levenberg_marquardt(
            DVector::from_vec(vec![1.0, 0.0]),
            exponential(&t, &y),
            &LmConfig::default(),
        )
        .unwrap();
        assert!(trace.converged);
        assert!((trace.x[0] - 2.5).abs() < 1e-8);
        assert!((trace.x[1] + 0.7).abs() < 1e-8);
    }

    #[test]
    fn noisy_fit_reports_errors() {
        let t: Vec<f64> = (0..12).map(|i| i as f64 * 0.25).collect();
        let noise = [0.01, -0.02, 0.015, 0.0, -0.01, 0.02, -0.015, 0.005, 0.01, -0.005, 0.0, 0.01];
        let y: Vec<f64> = t
            .iter()
            .zip(noise)
            .map(|(t, e)| 2.5 * (-0.7 * t).exp() + e)
            .collect();
        let trace = levenberg_marquardt(
            DVector::from_vec(vec![1.0, 0.0]),
            exponential(&t, &y),
            &LmConfig::default(),
        )
        .unwrap();
        assert!(trace.converged);
        assert!(trace.residual_norm > 0.0);
        let errors = trace.standard_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| *e > 0.0 && *e < 0.1));
    }

    #[test]
    fn non_finite_start_is_not_converged() {
        let f = |x: &DVector<f64>| Ok(DVector::from_element(3, x[0].sqrt()));
        let trace =
            levenberg_marquardt(DVector::from_vec(vec![-1.0]), f, &LmConfig::default()).unwrap();
        assert!(!trace.converged);
        assert_eq!(trace.iterations, 0);
        assert!(trace.covariance().is_none());
    }

    #[test]
    fn nan_jacobian_is_not_converged() {
        // the backward difference step leaves the domain of the square root
        let t = [1.0, 2.0, 3.0];
        let f = move |x: &DVector<f64>| {
            Ok(DVector::from_iterator(
                t.len(),
                t.iter().map(|t| (x[0] - 1.0).sqrt() * t - 2.0 * t),
            ))
        };
        let trace = levenberg_marquardt(DVector::from_vec(vec![1.0 + 1e-7]), f, &LmConfig::default())
            .unwrap();
        assert!(!trace.converged);
        assert!(trace.residual_norm > 1.0);
    }

    #[test]
    fn stationary_rejects_nan_columns() {
        let jac = DMatrix::from_column_slice(2, 2, &[1.0, 0.0, f64::NAN, 1.0]);
        let r = DVector::from_vec(vec![0.0, 1.0]);
        assert!(matches!(stationary(&jac, &r, 1e-8), Some(Stop::Stalled)));
    }

    #[test]
    fn iteration_cap_is_respected() {
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.3).collect();
        let y: Vec<f64> = t.iter().map(|t| 2.5 * (-0.7 * t).exp()).collect();
        let config = LmConfig {
            max_iterations: 1,
            ..LmConfig::default()
        };
        let trace =
            levenberg_marquardt(DVector::from_vec(vec![1.0, 0.0]), exponential(&t, &y), &config)
                .unwrap();
        assert!(!trace.converged);
        assert_eq!(trace.iterations, 1);
    }
}
