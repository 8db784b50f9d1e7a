//! Error types for fitting and root finding.

use crate::roots::RootMethod;
use eos_core::EosError;
use eos_models::ModelError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while fitting or inverting an equation of state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    /// The least-squares iteration stopped without meeting a convergence
    /// criterion. `last` holds the final canonical parameter vector.
    #[error("Fit did not converge after {iterations} iterations (residual norm {residual_norm:e})")]
    DidNotConverge {
        iterations: usize,
        residual_norm: f64,
        last: Vec<f64>,
    },

    /// Every attempted root finder failed.
    #[error("No root found: {}", Attempts(.attempts))]
    NoRootFound { attempts: Vec<(RootMethod, RootError)> },

    #[error("Linear fit error: {what}")]
    LinearFit { what: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Unit error: {0}")]
    Core(#[from] EosError),
}

pub type SolverResult<T> = Result<T, SolverError>;

/// Why a single root finder gave up.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootError {
    #[error("seed does not suit the method")]
    InvalidSeed,

    #[error("interval does not bracket a sign change")]
    NotBracketed,

    #[error("iteration limit reached")]
    Iterations,

    #[error("objective returned a non-finite value")]
    NonFinite,

    #[error("derivative vanished")]
    ZeroDerivative,
}

struct Attempts<'a>(&'a [(RootMethod, RootError)]);

impl fmt::Display for Attempts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no method attempted");
        }
        for (i, (method, err)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{method}: {err}")?;
        }
        Ok(())
    }
}
