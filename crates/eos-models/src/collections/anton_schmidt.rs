use crate::error::ModelResult;
use crate::family::Family;
use crate::params::AntonSchmidt;
use crate::relation::Relation;
use eos_core::Real;

impl Relation for AntonSchmidt {
    fn family(&self) -> Family {
        Family::AntonSchmidt
    }

    fn energy(&self, v: Real) -> ModelResult<Real> {
        let AntonSchmidt { v0, beta, n, e_inf } = *self;
        let r = v / v0;
        let m = n + 1.0;
        Ok(e_inf + beta * v0 / m * r.powf(m) * (r.ln() - 1.0 / m))
    }

    fn pressure(&self, v: Real) -> ModelResult<Real> {
        let r = v / self.v0;
        Ok(-self.beta * r.powf(self.n) * r.ln())
    }

    fn bulk_modulus(&self, v: Real) -> ModelResult<Real> {
        let r = v / self.v0;
        Ok(self.beta * r.powf(self.n) * (1.0 + self.n * r.ln()))
    }
}
