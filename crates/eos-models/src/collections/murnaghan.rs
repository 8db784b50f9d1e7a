use crate::error::ModelResult;
use crate::family::Family;
use crate::params::Murnaghan;
use crate::relation::Relation;
use eos_core::Real;

impl Relation for Murnaghan {
    fn family(&self) -> Family {
        Family::Murnaghan
    }

    fn energy(&self, v: Real) -> ModelResult<Real> {
        let Murnaghan { v0, b0, bp0, e0 } = *self;
        let x = bp0 - 1.0;
        let y = (v0 / v).powf(bp0);
        Ok(e0 + b0 / bp0 * v * (y / x + 1.0) - v0 * b0 / x)
    }

    fn pressure(&self, v: Real) -> ModelResult<Real> {
        let Murnaghan { v0, b0, bp0, .. } = *self;
        Ok(b0 / bp0 * ((v0 / v).powf(bp0) - 1.0))
    }

    fn bulk_modulus(&self, v: Real) -> ModelResult<Real> {
        let Murnaghan { v0, b0, bp0, .. } = *self;
        Ok(b0 * (v0 / v).powf(bp0))
    }
}
