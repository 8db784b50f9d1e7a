//! Closed-form relations, one module per family.
//!
//! Strain variables used throughout:
//! - `f = ((v0/v)^(2/3) − 1)/2` (Eulerian, Birch–Murnaghan)
//! - `s = ln(v0/v)/3` (natural, Poirier–Tarantola)
//! - `y = (v/v0)^(1/3)` (Vinet)

mod anton_schmidt;
mod birch_murnaghan;
mod breenan_stacey;
mod murnaghan;
mod poirier_tarantola;
mod polynomial;
mod vinet;
