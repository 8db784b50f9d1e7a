//! Fitting and inversion of equations of state.
//!
//! This crate provides the numerical engines that operate on
//! `eos_models::EquationOfState`:
//! - a Levenberg–Marquardt least-squares fit of any family to energy,
//!   pressure or bulk-modulus data
//! - a cascade of scalar root finders that invert a relation for volume
//! - a linear least-squares fit of energy as a polynomial in finite strain
//!
//! Every engine strips its inputs to canonical reals, iterates on those and
//! restores the results into the caller's units.

pub mod error;
pub mod find;
pub mod fit;
pub mod jacobian;
pub mod linfit;
pub mod lm;
pub mod roots;

pub use error::{RootError, SolverError, SolverResult};
pub use find::{find_volume, find_volume_with, find_volumes};
pub use fit::{FitOptions, FitOutcome, fit};
pub use linfit::{LinearFit, LinearFitOptions, linear_fit};
pub use lm::{LmConfig, LmTrace};
pub use roots::{RootConfig, RootMethod, Seed};
