use crate::error::ModelResult;
use crate::family::Family;
use crate::params::Vinet;
use crate::relation::Relation;
use eos_core::Real;

impl Vinet {
    /// `(y, η)` with `y = (v/v0)^(1/3)` and `η = 3/2·(b′0 − 1)`.
    fn strain(&self, v: Real) -> (Real, Real) {
        ((v / self.v0).cbrt(), 1.5 * (self.bp0 - 1.0))
    }
}

impl Relation for Vinet {
    fn family(&self) -> Family {
        Family::Vinet
    }

    fn energy(&self, v: Real) -> ModelResult<Real> {
        let Vinet { v0, b0, bp0, e0 } = *self;
        let (y, eta) = self.strain(v);
        let scale = 2.0 * b0 * v0 / (bp0 - 1.0).powi(2);
        let tail = (5.0 + 3.0 * bp0 * (y - 1.0) - 3.0 * y) * (-eta * (y - 1.0)).exp();
        Ok(e0 + scale * (2.0 - tail))
    }

    fn pressure(&self, v: Real) -> ModelResult<Real> {
        let (y, eta) = self.strain(v);
        Ok(3.0 * self.b0 * (1.0 - y) / (y * y) * (eta * (1.0 - y)).exp())
    }

    fn bulk_modulus(&self, v: Real) -> ModelResult<Real> {
        let (y, eta) = self.strain(v);
        let poly = 1.0 + (1.0 - y) * (eta * y + 1.0);
        Ok(self.b0 / (y * y) * (eta * (1.0 - y)).exp() * poly)
    }
}
