//! Core trait for closed-form EOS relations.

use crate::error::{ModelError, ModelResult};
use crate::family::Family;
use crate::property::Property;
use eos_core::Real;

/// Energy, pressure and bulk modulus of one family as functions of volume.
///
/// Implemented on the `f64` records only, with every value in canonical
/// units (Å³, eV, eV/Å³). Relations are pure; a non-positive volume is
/// not rejected here and may produce a non-finite value.
///
/// Default implementations return `UnsupportedRelation`, so a family only
/// implements the closed forms it actually has.
pub trait Relation: Send + Sync {
    fn family(&self) -> Family;

    fn energy(&self, _v: Real) -> ModelResult<Real> {
        Err(unsupported(self.family(), Property::Energy))
    }

    /// Pressure, `−dE/dV`.
    fn pressure(&self, _v: Real) -> ModelResult<Real> {
        Err(unsupported(self.family(), Property::Pressure))
    }

    /// Bulk modulus, `−V·dP/dV`.
    fn bulk_modulus(&self, _v: Real) -> ModelResult<Real> {
        Err(unsupported(self.family(), Property::BulkModulus))
    }

    fn evaluate(&self, property: Property, v: Real) -> ModelResult<Real> {
        match property {
            Property::Energy => self.energy(v),
            Property::Pressure => self.pressure(v),
            Property::BulkModulus => self.bulk_modulus(v),
        }
    }
}

fn unsupported(family: Family, property: Property) -> ModelError {
    ModelError::UnsupportedRelation { family, property }
}

/// Finite-difference checks shared by the collection tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    fn close(a: Real, b: Real, rel: Real) -> bool {
        (a - b).abs() <= rel * a.abs().max(b.abs()).max(1e-8)
    }

    /// `P = −dE/dV` (when an energy form exists) and `B = −V·dP/dV` at `v`.
    pub(crate) fn assert_consistent(relation: &dyn Relation, v: Real) {
        let h = 1e-5 * v;
        let p = relation.pressure(v).unwrap();
        if let Ok(e_plus) = relation.energy(v + h) {
            let e_minus = relation.energy(v - h).unwrap();
            let p_fd = -(e_plus - e_minus) / (2.0 * h);
            assert!(close(p, p_fd, 1e-6), "{}: P = {p}, -dE/dV = {p_fd}", relation.family());
        }
        let b = relation.bulk_modulus(v).unwrap();
        let b_fd = -v * (relation.pressure(v + h).unwrap() - relation.pressure(v - h).unwrap())
            / (2.0 * h);
        assert!(close(b, b_fd, 1e-6), "{}: B = {b}, -V dP/dV = {b_fd}", relation.family());
    }

    /// `dB/dP` at `v`, by central differences.
    pub(crate) fn pressure_derivative(relation: &dyn Relation, v: Real) -> Real {
        let h = 1e-4 * v;
        let db = relation.bulk_modulus(v + h).unwrap() - relation.bulk_modulus(v - h).unwrap();
        let dp = relation.pressure(v + h).unwrap() - relation.pressure(v - h).unwrap();
        db / dp
    }
}
