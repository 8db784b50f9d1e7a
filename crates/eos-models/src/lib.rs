//! eos-models: equation-of-state parameter records and closed-form relations.
//!
//! Provides:
//! - One immutable parameter record per EOS family (Murnaghan, Birch–Murnaghan,
//!   Poirier–Tarantola, Vinet, Anton–Schmidt, Breenan–Stacey, polynomial)
//! - `EquationOfState`, the tagged union the solvers operate over
//! - `Relation`, the per-family energy / pressure / bulk modulus formulas
//! - Finite-strain definitions used by polynomial fitting
//!
//! # Example
//!
//! ```
//! use eos_core::units::{angstrom3, kbar, unitless};
//! use eos_models::{BirchMurnaghan3rd, EquationOfState, Property, evaluate};
//!
//! let eos: EquationOfState<_> =
//!     BirchMurnaghan3rd::new(angstrom3(167.0), kbar(2600.0), unitless(4.0)).into();
//! let p = evaluate(Property::Pressure, &eos, angstrom3(156.14)).unwrap();
//! let p_gpa = p.value_in(eos_core::Unit::gigapascal()).unwrap();
//! assert!((p_gpa - 20.0).abs() < 0.05);
//! ```

pub mod collections;
pub mod eos;
pub mod error;
pub mod family;
pub mod params;
pub mod property;
pub mod relation;
pub mod strain;

// Re-exports for ergonomics
pub use eos::{EquationOfState, bind, evaluate, evaluate_many};
pub use error::{ModelError, ModelResult};
pub use family::Family;
pub use params::{
    AntonSchmidt, BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th, BreenanStacey,
    Murnaghan, PoirierTarantola2nd, PoirierTarantola3rd, PoirierTarantola4th, Polynomial, Vinet,
};
pub use property::Property;
pub use relation::Relation;
pub use strain::Strain;
