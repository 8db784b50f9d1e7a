//! Methods that keep the root inside a shrinking sign-change interval.

use super::RootConfig;
use crate::error::RootError;
use eos_core::Real;

/// Outcome of checking the interval ends before iterating.
enum Bracket {
    Root(Real),
    Valid { fa: Real, fb: Real },
}

fn check(f: &impl Fn(Real) -> Real, a: Real, b: Real, config: &RootConfig) -> Result<Bracket, RootError> {
    let fa = finite(f(a))?;
    let fb = finite(f(b))?;
    if fa.abs() <= config.fatol {
        return Ok(Bracket::Root(a));
    }
    if fb.abs() <= config.fatol {
        return Ok(Bracket::Root(b));
    }
    if fa.signum() == fb.signum() {
        return Err(RootError::NotBracketed);
    }
    Ok(Bracket::Valid { fa, fb })
}

fn finite(v: Real) -> Result<Real, RootError> {
    if v.is_finite() { Ok(v) } else { Err(RootError::NonFinite) }
}

pub(super) fn bisection(
    f: impl Fn(Real) -> Real,
    mut a: Real,
    mut b: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    let mut fa = match check(&f, a, b, config)? {
        Bracket::Root(x) => return Ok(x),
        Bracket::Valid { fa, .. } => fa,
    };
    for _ in 0..config.max_iterations {
        let m = 0.5 * (a + b);
        let fm = finite(f(m))?;
        if fm.abs() <= config.fatol || 0.5 * (b - a) <= config.x_tolerance(m) {
            return Ok(m);
        }
        if fm.signum() == fa.signum() {
            a = m;
            fa = fm;
        } else {
            b = m;
        }
    }
    Err(RootError::Iterations)
}

/// Regula falsi; an end retained twice in a row has its value halved
/// (Illinois) so the interval keeps shrinking from both sides.
pub(super) fn false_position(
    f: impl Fn(Real) -> Real,
    mut a: Real,
    mut b: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    let (mut fa, mut fb) = match check(&f, a, b, config)? {
        Bracket::Root(x) => return Ok(x),
        Bracket::Valid { fa, fb } => (fa, fb),
    };
    let mut retained = 0_i8;
    let mut prev = a;
    for _ in 0..config.max_iterations {
        let c = (a * fb - b * fa) / (fb - fa);
        let fc = finite(f(c))?;
        if fc.abs() <= config.fatol || (c - prev).abs() <= config.x_tolerance(c) {
            return Ok(c);
        }
        prev = c;
        if fc.signum() == fb.signum() {
            b = c;
            fb = fc;
            if retained == -1 {
                fa *= 0.5;
            }
            retained = -1;
        } else {
            a = c;
            fa = fc;
            if retained == 1 {
                fb *= 0.5;
            }
            retained = 1;
        }
        if (b - a).abs() <= config.x_tolerance(c) {
            return Ok(c);
        }
    }
    Err(RootError::Iterations)
}

pub(super) fn ridders(
    f: impl Fn(Real) -> Real,
    mut a: Real,
    mut b: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    let (mut fa, mut fb) = match check(&f, a, b, config)? {
        Bracket::Root(x) => return Ok(x),
        Bracket::Valid { fa, fb } => (fa, fb),
    };
    let mut prev = Real::NAN;
    for _ in 0..config.max_iterations {
        let m = 0.5 * (a + b);
        let fm = finite(f(m))?;
        let s = (fm * fm - fa * fb).sqrt();
        if s == 0.0 {
            return Ok(m);
        }
        let x = m + (m - a) * (fa - fb).signum() * fm / s;
        let fx = finite(f(x))?;
        if fx.abs() <= config.fatol || (x - prev).abs() <= config.x_tolerance(x) {
            return Ok(x);
        }
        prev = x;
        if fm.signum() != fx.signum() {
            (a, fa, b, fb) = if m < x { (m, fm, x, fx) } else { (x, fx, m, fm) };
        } else if fa.signum() != fx.signum() {
            b = x;
            fb = fx;
        } else {
            a = x;
            fa = fx;
        }
        if (b - a).abs() <= config.x_tolerance(x) {
            return Ok(x);
        }
    }
    Err(RootError::Iterations)
}

/// Brent–Dekker: inverse quadratic interpolation and secant steps,
/// falling back to bisection whenever they stop shrinking the interval.
pub(super) fn brent(
    f: impl Fn(Real) -> Real,
    mut a: Real,
    mut b: Real,
    config: &RootConfig,
) -> Result<Real, RootError> {
    let (mut fa, mut fb) = match check(&f, a, b, config)? {
        Bracket::Root(x) => return Ok(x),
        Bracket::Valid { fa, fb } => (fa, fb),
    };
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;
    for _ in 0..config.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            (a, b, c) = (b, c, b);
            (fa, fb, fc) = (fb, fc, fb);
        }
        let tol = 2.0 * Real::EPSILON * b.abs() + 0.5 * config.x_tolerance(b);
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb.abs() <= config.fatol {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = finite(f(b))?;
    }
    Err(RootError::Iterations)
}
