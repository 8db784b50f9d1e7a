//! Numeric representation shared by every field of a parameter record.
//!
//! A record is either all plain reals or all unit-bearing quantities. Solvers
//! never see either directly: they strip values to canonical `f64`, iterate,
//! and restore results through this trait.

use crate::units::{Dimension, Quantity, Unit};
use crate::{EosResult, Real};
use std::fmt;

pub trait EosScalar: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Strip to a bare real in the canonical unit of `dimension`.
    ///
    /// Plain reals are taken to be canonical already.
    fn to_canonical(&self, dimension: Dimension) -> EosResult<Real>;

    /// Rebuild from a canonical real, in `unit` when one is given.
    fn from_canonical(value: Real, dimension: Dimension, unit: Option<Unit>) -> EosResult<Self>;

    fn unit(&self) -> Option<Unit>;

    fn zero(dimension: Dimension) -> Self;
}

impl EosScalar for f64 {
    #[inline]
    fn to_canonical(&self, _dimension: Dimension) -> EosResult<Real> {
        Ok(*self)
    }

    #[inline]
    fn from_canonical(value: Real, _dimension: Dimension, _unit: Option<Unit>) -> EosResult<Self> {
        Ok(value)
    }

    fn unit(&self) -> Option<Unit> {
        None
    }

    fn zero(_dimension: Dimension) -> Self {
        0.0
    }
}

impl EosScalar for Quantity {
    fn to_canonical(&self, dimension: Dimension) -> EosResult<Real> {
        self.ensure_dimension(dimension)?;
        Ok(Quantity::to_canonical(self))
    }

    fn from_canonical(value: Real, dimension: Dimension, unit: Option<Unit>) -> EosResult<Self> {
        let unit = unit.unwrap_or_else(|| Unit::canonical(dimension));
        let q = Quantity::from_canonical(value, unit);
        q.ensure_dimension(dimension)?;
        Ok(q)
    }

    fn unit(&self) -> Option<Unit> {
        Some(self.unit)
    }

    fn zero(dimension: Dimension) -> Self {
        Quantity::new(0.0, Unit::canonical(dimension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EosError;
    use crate::units::{gpa, kbar};

    #[test]
    fn quantity_strip_and_restore() {
        let b0 = kbar(2600.0);
        let bare = EosScalar::to_canonical(&b0, Dimension::PRESSURE).unwrap();
        let back = <Quantity as EosScalar>::from_canonical(bare, Dimension::PRESSURE, b0.unit()).unwrap();
        assert_eq!(back.unit, b0.unit);
        assert!((back.value - 2600.0).abs() < 1e-9);
    }

    #[test]
    fn quantity_strip_checks_dimension() {
        let err = EosScalar::to_canonical(&gpa(1.0), Dimension::VOLUME).unwrap_err();
        assert!(matches!(err, EosError::UnitMismatch { .. }));
    }

    #[test]
    fn restore_without_hint_uses_canonical_unit() {
        let q = <Quantity as EosScalar>::from_canonical(2.0, Dimension::ENERGY, None).unwrap();
        assert_eq!(q.unit, Unit::electronvolt());
    }

    #[test]
    fn reals_pass_through() {
        assert_eq!(EosScalar::to_canonical(&3.5_f64, Dimension::VOLUME).unwrap(), 3.5);
        assert_eq!(<f64 as EosScalar>::zero(Dimension::ENERGY), 0.0);
    }
}
