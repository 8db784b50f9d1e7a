use crate::error::ModelResult;
use crate::family::Family;
use crate::params::BreenanStacey;
use crate::relation::Relation;
use eos_core::Real;

impl BreenanStacey {
    /// `(r^(−4/3), e^(2γ0(1 − r)))` with `r = v/v0`.
    fn terms(&self, v: Real) -> (Real, Real, Real) {
        let r = v / self.v0;
        (r, r.powf(-4.0 / 3.0), (2.0 * self.gamma0 * (1.0 - r)).exp())
    }
}

// No closed-form energy: `energy` keeps the unsupported default.
impl Relation for BreenanStacey {
    fn family(&self) -> Family {
        Family::BreenanStacey
    }

    fn pressure(&self, v: Real) -> ModelResult<Real> {
        let (_, w, e) = self.terms(v);
        Ok(self.b0 / (2.0 * self.gamma0) * w * (e - 1.0))
    }

    fn bulk_modulus(&self, v: Real) -> ModelResult<Real> {
        let (r, w, e) = self.terms(v);
        let g = self.gamma0;
        Ok(self.b0 / (2.0 * g) * w * (4.0 / 3.0 * (e - 1.0) + 2.0 * g * r * e))
    }
}
