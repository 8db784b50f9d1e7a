//! Open methods: fast near a simple root, unconstrained elsewhere.

use super::RootConfig;
use crate::error::RootError;
use eos_core::Real;

fn finite(v: Real) -> Result<Real, RootError> {
    if v.is_finite() { Ok(v) } else { Err(RootError::NonFinite) }
}

/// Iterate `step` from `x` until the update or the objective is small.
///
/// `step` receives `(x, f(x))` and returns the next iterate.
fn iterate(
    f: &impl Fn(Real) -> Real,
    mut x: Real,
    config: &RootConfig,
    step: impl Fn(Real, Real) -> Result<Real, RootError>,
) -> Result<Real, RootError> {
    for _ in 0..config.max_iterations {
        let fx = finite(f(x))?;
        if fx.abs() <= config.fatol {
            return Ok(x);
        }
        let next = finite(step(x, fx)?)?;
        if (next - x).abs() <= config.x_tolerance(next) {
            return Ok(next);
        }
        x = next;
    }
    Err(RootError::Iterations)
}

pub(super) fn secant(
    f: impl Fn(Real) -> Real,
    mut x0: Real,
    mut x1: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    let mut f0 = finite(f(x0))?;
    let mut f1 = finite(f(x1))?;
    for _ in 0..config.max_iterations {
        if f1.abs() <= config.fatol {
            return Ok(x1);
        }
        if f1 == f0 {
            return Err(RootError::ZeroDerivative);
        }
        let x2 = finite(x1 - f1 * (x1 - x0) / (f1 - f0))?;
        if (x2 - x1).abs() <= config.x_tolerance(x2) {
            return Ok(x2);
        }
        (x0, f0) = (x1, f1);
        x1 = x2;
        f1 = finite(f(x1))?;
    }
    Err(RootError::Iterations)
}

/// Derivative-free, quadratically convergent: the slope is estimated from
/// `f(x + h)` with `h = f(x)`, floored at `√ε·max(|x|, 1)` in magnitude.
pub(super) fn steffensen(
    f: impl Fn(Real) -> Real,
    start: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    iterate(&f, start, config, |x, fx| {
        // below the floor the difference quotient is rounding noise
        let floor = Real::EPSILON.sqrt() * x.abs().max(1.0);
        let h = if fx.abs() < floor { floor.copysign(fx) } else { fx };
        let h = (x + h) - x;
        let slope = (finite(f(x + h))? - fx) / h;
        if slope == 0.0 {
            return Err(RootError::ZeroDerivative);
        }
        Ok(x - fx / slope)
    })
}

pub(super) fn newton(
    f: impl Fn(Real) -> Real,
    start: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    iterate(&f, start, config, |x, fx| {
        let h = 1e-6 * x.abs().max(1.0);
        let d = (finite(f(x + h))? - finite(f(x - h))?) / (2.0 * h);
        if d == 0.0 {
            return Err(RootError::ZeroDerivative);
        }
        Ok(x - fx / d)
    })
}

pub(super) fn halley(
    f: impl Fn(Real) -> Real,
    start: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    iterate(&f, start, config, |x, fx| {
        let h = 1e-4 * x.abs().max(1.0);
        let (fp, fm) = (finite(f(x + h))?, finite(f(x - h))?);
        let d1 = (fp - fm) / (2.0 * h);
        let d2 = (fp - 2.0 * fx + fm) / (h * h);
        let denom = 2.0 * d1 * d1 - fx * d2;
        if d1 == 0.0 || denom == 0.0 {
            return Err(RootError::ZeroDerivative);
        }
        Ok(x - 2.0 * fx * d1 / denom)
    })
}
