//! eos-core: shared foundation for eosfit.
//!
//! Contains:
//! - units (dimension algebra, uom-backed units, quantities, unit table)
//! - scalar (the plain-real / unit-bearing representation trait)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod scalar;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{EosError, EosResult};
pub use numeric::*;
pub use scalar::EosScalar;
pub use units::{Dimension, Quantity, Unit, UnitTable, parse_quantity};
