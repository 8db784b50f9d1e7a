use crate::error::ModelResult;
use crate::family::Family;
use crate::params::Polynomial;
use crate::relation::Relation;
use eos_core::Real;

impl Polynomial {
    /// Σ k(k−1)…(k−m+1)·c_k·(v − v0)^(k−m), the m-th derivative of E − e0.
    fn derivative(&self, v: Real, m: usize) -> Real {
        let dv = v - self.v0;
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| (Self::order(i), c))
            .filter(|(k, _)| *k >= m)
            .map(|(k, c)| {
                let falling: Real = (0..m).map(|j| (k - j) as Real).product();
                falling * c * dv.powi((k - m) as i32)
            })
            .sum()
    }
}

impl Relation for Polynomial {
    fn family(&self) -> Family {
        Family::Polynomial
    }

    fn energy(&self, v: Real) -> ModelResult<Real> {
        Ok(self.e0 + self.derivative(v, 0))
    }

    fn pressure(&self, v: Real) -> ModelResult<Real> {
        Ok(-self.derivative(v, 1))
    }

    fn bulk_modulus(&self, v: Real) -> ModelResult<Real> {
        Ok(v * self.derivative(v, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::testing::assert_consistent;

    #[test]
    fn quadratic_well() {
        let eos = Polynomial::new(40.0, vec![0.01]).with_e0(-10.0);
        assert_eq!(eos.energy(40.0).unwrap(), -10.0);
        assert_eq!(eos.energy(42.0).unwrap(), -10.0 + 0.04);
        assert_eq!(eos.pressure(40.0).unwrap(), 0.0);
        assert!((eos.bulk_modulus(40.0).unwrap() - 0.8).abs() < 1e-14);
    }

    #[test]
    fn derivatives_agree() {
        let eos = Polynomial::new(40.0, vec![0.01, -4e-4, 1e-5]).with_e0(-10.0);
        for v in [30.0, 35.0, 47.0] {
            assert_consistent(&eos, v);
        }
    }
}
