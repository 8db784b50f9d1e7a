//! Scalar root finders used to invert an EOS relation for volume.
//!
//! Methods come in two static categories. Bracketing methods need an
//! interval with a sign change and always stay inside it; non-bracketing
//! methods start from a point and may wander, including to non-physical
//! volumes. [`RootMethod::ALL`] is the fallback order.

mod bracketing;
mod nonbracketing;

use crate::error::RootError;
use eos_core::Real;
use std::fmt;

/// Root-finding algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RootMethod {
    /// Regula falsi with the Illinois modification.
    FalsePosition,
    Ridders,
    Brent,
    Bisection,
    Secant,
    Steffensen,
    /// Newton–Raphson with a central-difference derivative.
    Newton,
    /// Halley's method with finite-difference derivatives.
    Halley,
}

impl RootMethod {
    /// Bracketing methods, most preferred first.
    pub const BRACKETING: [RootMethod; 4] = [
        RootMethod::FalsePosition,
        RootMethod::Ridders,
        RootMethod::Brent,
        RootMethod::Bisection,
    ];

    /// Non-bracketing methods, most preferred first.
    pub const NON_BRACKETING: [RootMethod; 4] = [
        RootMethod::Secant,
        RootMethod::Steffensen,
        RootMethod::Newton,
        RootMethod::Halley,
    ];

    /// Fallback order: every bracketing method, then every non-bracketing one.
    pub const ALL: [RootMethod; 8] = [
        RootMethod::FalsePosition,
        RootMethod::Ridders,
        RootMethod::Brent,
        RootMethod::Bisection,
        RootMethod::Secant,
        RootMethod::Steffensen,
        RootMethod::Newton,
        RootMethod::Halley,
    ];

    pub fn is_bracketing(self) -> bool {
        Self::BRACKETING.contains(&self)
    }

    pub fn name(self) -> &'static str {
        match self {
            RootMethod::FalsePosition => "false_position",
            RootMethod::Ridders => "ridders",
            RootMethod::Brent => "brent",
            RootMethod::Bisection => "bisection",
            RootMethod::Secant => "secant",
            RootMethod::Steffensen => "steffensen",
            RootMethod::Newton => "newton",
            RootMethod::Halley => "halley",
        }
    }
}

impl fmt::Display for RootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Starting information for a root finder.
///
/// Bracketing methods need an interval (endpoints in either order) and
/// reject a point. Non-bracketing methods start from a point; given an
/// interval, the secant method uses both ends and the others its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seed<T> {
    Interval(T, T),
    Point(T),
}

impl<T> Seed<T> {
    pub fn try_map<U, E>(self, f: impl Fn(T) -> Result<U, E>) -> Result<Seed<U>, E> {
        Ok(match self {
            Seed::Interval(lo, hi) => Seed::Interval(f(lo)?, f(hi)?),
            Seed::Point(x) => Seed::Point(f(x)?),
        })
    }
}

/// Root finder configuration, shared by every method.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RootConfig {
    /// Maximum iterations per method
    pub max_iterations: usize,
    /// Absolute tolerance on the root
    pub xatol: Real,
    /// Relative tolerance on the root
    pub xrtol: Real,
    /// Absolute tolerance on the objective
    pub fatol: Real,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            xatol: 1e-12,
            xrtol: 1e-12,
            fatol: 1e-14,
        }
    }
}

impl RootConfig {
    fn x_tolerance(&self, x: Real) -> Real {
        self.xatol + self.xrtol * x.abs()
    }
}

/// Run one method on `f`.
///
/// `f` should return a non-finite value wherever it cannot be evaluated;
/// the method then fails with `RootError::NonFinite`.
pub fn solve(
    method: RootMethod,
    f: impl Fn(Real) -> Real,
    seed: Seed<Real>,
    config: &RootConfig,
) -> Result<Real, RootError> {
    if method.is_bracketing() {
        let Seed::Interval(a, b) = seed else {
            return Err(RootError::InvalidSeed);
        };
        let (lo, hi) = (a.min(b), a.max(b));
        match method {
            RootMethod::FalsePosition => bracketing::false_position(f, lo, hi, config),
            RootMethod::Ridders => bracketing::ridders(f, lo, hi, config),
            RootMethod::Brent => bracketing::brent(f, lo, hi, config),
            _ => bracketing::bisection(f, lo, hi, config),
        }
    } else {
        let start = match seed {
            Seed::Point(x) => x,
            Seed::Interval(a, b) => 0.5 * (a + b),
        };
        match (method, seed) {
            (RootMethod::Secant, Seed::Interval(a, b)) => nonbracketing::secant(f, a, b, config),
            (RootMethod::Secant, Seed::Point(x)) => {
                nonbracketing::secant(f, x, x + 1e-4 * x.abs().max(1.0), config)
            }
            (RootMethod::Steffensen, _) => nonbracketing::steffensen(f, start, config),
            (RootMethod::Newton, _) => nonbracketing::newton(f, start, config),
            _ => nonbracketing::halley(f, start, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wallis' cubic, root 2.0945514815423265
    fn wallis(x: f64) -> f64 {
        x * x * x - 2.0 * x - 5.0
    }
    const WALLIS_ROOT: f64 = 2.094_551_481_542_326_5;

    #[test]
    fn categories_partition_all() {
        assert_eq!(RootMethod::ALL[..4], RootMethod::BRACKETING);
        assert_eq!(RootMethod::ALL[4..], RootMethod::NON_BRACKETING);
        assert!(RootMethod::BRACKETING.iter().all(|m| m.is_bracketing()));
        assert!(RootMethod::NON_BRACKETING.iter().all(|m| !m.is_bracketing()));
    }

    #[test]
    fn every_method_finds_a_simple_root() {
        let config = RootConfig::default();
        for method in RootMethod::ALL {
            let seed = if method.is_bracketing() {
                Seed::Interval(3.0, 2.0)
            } else {
                Seed::Point(2.5)
            };
            let x = solve(method, wallis, seed, &config).unwrap();
            assert!((x - WALLIS_ROOT).abs() < 1e-10, "{method}: {x}");
        }
    }

    #[test]
    fn interval_seeds_non_bracketing_methods() {
        let config = RootConfig::default();
        for method in RootMethod::NON_BRACKETING {
            let x = solve(method, |x: f64| x.cos() - x, Seed::Interval(0.0, 1.0), &config).unwrap();
            assert!((x - 0.739_085_133_215_160_7).abs() < 1e-10, "{method}");
        }
    }

    #[test]
    fn bracketing_needs_an_interval() {
        let err = solve(RootMethod::Brent, wallis, Seed::Point(2.0), &RootConfig::default());
        assert_eq!(err, Err(RootError::InvalidSeed));
    }

    #[test]
    fn bracketing_needs_a_sign_change() {
        for method in RootMethod::BRACKETING {
            let err = solve(method, wallis, Seed::Interval(3.0, 4.0), &RootConfig::default());
            assert_eq!(err, Err(RootError::NotBracketed), "{method}");
        }
    }

    #[test]
    fn non_finite_objective_is_reported() {
        let f = |x: f64| x.ln() - 1.0;
        let err = solve(RootMethod::Bisection, f, Seed::Interval(-1.0, 5.0), &RootConfig::default());
        assert_eq!(err, Err(RootError::NonFinite));
    }

    #[test]
    fn flat_start_has_zero_derivative() {
        let f = |x: f64| x * x + 1.0;
        let err = solve(RootMethod::Newton, f, Seed::Point(0.0), &RootConfig::default());
        assert_eq!(err, Err(RootError::ZeroDerivative));
    }

    #[test]
    fn steffensen_survives_rounding_noise() {
        // shallow slope plus jitter at the level of accumulated rounding error
        let f = |x: f64| 0.005 * (x - 148.0) + 1e-13 * (1e7 * x).sin();
        let x = solve(RootMethod::Steffensen, f, Seed::Point(160.0), &RootConfig::default());
        assert!((x.unwrap() - 148.0).abs() < 1e-9);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let config = RootConfig {
            max_iterations: 3,
            ..RootConfig::default()
        };
        let err = solve(RootMethod::Bisection, wallis, Seed::Interval(0.0, 100.0), &config);
        assert_eq!(err, Err(RootError::Iterations));
    }

    #[test]
    fn endpoint_root_is_returned() {
        let x = solve(RootMethod::Ridders, wallis, Seed::Interval(WALLIS_ROOT, 3.0), &RootConfig {
            fatol: 1e-12,
            ..RootConfig::default()
        });
        assert!((x.unwrap() - WALLIS_ROOT).abs() < 1e-15);
    }
}
