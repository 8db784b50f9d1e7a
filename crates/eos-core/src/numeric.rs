//! Real type, comparison tolerances and finiteness checks.

use crate::{EosError, EosResult};

/// Floating point type used for every canonical value.
pub type Real = f64;

/// Absolute and relative tolerance pair for comparing computed reals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Tolerances {
    /// Purely relative comparison.
    pub const fn relative(rel: Real) -> Self {
        Self { abs: 0.0, rel }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// `|a − b| ≤ max(abs, rel·max(|a|, |b|))`.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs.max(tol.rel * a.abs().max(b.abs()))
}

pub fn ensure_finite(v: Real, what: &'static str) -> EosResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EosError::NonFinite { what, value: v })
    }
}

/// Fails on the first non-finite entry of `values`.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> EosResult<()> {
    values
        .iter()
        .try_for_each(|&v| ensure_finite(v, what).map(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_floor_and_relative_band() {
        let tol = Tolerances::default();
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(nearly_equal(1e6, 1e6 * (1.0 + 1e-10), tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
        assert!(!nearly_equal(0.0, 1e-13, Tolerances::relative(1e-9)));
    }

    #[test]
    fn first_non_finite_entry_is_reported() {
        let err = ensure_all_finite(&[1.0, Real::INFINITY, Real::NAN], "energy").unwrap_err();
        assert_eq!(
            err,
            EosError::NonFinite {
                what: "energy",
                value: Real::INFINITY,
            }
        );
        assert!(err.to_string().contains("energy"));
        assert!(ensure_all_finite(&[1.0, -2.0], "energy").is_ok());
    }
}
