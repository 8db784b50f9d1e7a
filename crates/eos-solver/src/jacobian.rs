//! Finite difference Jacobians of vector residual functions.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Step for column `j`, relative to the size of `x[j]`.
fn step(x: f64, epsilon: f64) -> f64 {
    epsilon * x.abs().max(1.0)
}

/// Central differences: column `j` is `(f(x + h·e_j) − f(x − h·e_j))/2h`,
/// with `m` the number of residuals.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    m: usize,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let mut jac = DMatrix::zeros(m, x.len());
    for j in 0..x.len() {
        let h = step(x[j], epsilon);

        let mut x_plus = x.clone();
        x_plus[j] += h;
        let f_plus = f(&x_plus)?;

        let mut x_minus = x.clone();
        x_minus[j] -= h;
        let f_minus = f(&x_minus)?;

        jac.set_column(j, &((f_plus - f_minus) / (2.0 * h)));
    }
    Ok(jac)
}
