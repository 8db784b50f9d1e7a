//! The tagged union over families, plus the generic evaluation entry points.
//!
//! Evaluation follows a strip / compute / restore protocol: every field of
//! the record and the volume are reduced to canonical reals, the family's
//! [`Relation`] runs on those, and the result is rebuilt in the unit of the
//! record field it naturally corresponds to.

use crate::error::{ModelError, ModelResult};
use crate::family::Family;
use crate::params::{
    AntonSchmidt, BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th, BreenanStacey,
    Murnaghan, PoirierTarantola2nd, PoirierTarantola3rd, PoirierTarantola4th, Polynomial, Vinet,
};
use crate::property::Property;
use crate::relation::Relation;
use eos_core::{Dimension, EosScalar, Real, Unit};
use rayon::prelude::*;
use std::fmt;

/// One EOS family with its parameters, in plain reals (`T = f64`) or
/// unit-bearing quantities.
#[derive(Clone, Debug, PartialEq)]
pub enum EquationOfState<T = f64> {
    Murnaghan(Murnaghan<T>),
    BirchMurnaghan2nd(BirchMurnaghan2nd<T>),
    BirchMurnaghan3rd(BirchMurnaghan3rd<T>),
    BirchMurnaghan4th(BirchMurnaghan4th<T>),
    PoirierTarantola2nd(PoirierTarantola2nd<T>),
    PoirierTarantola3rd(PoirierTarantola3rd<T>),
    PoirierTarantola4th(PoirierTarantola4th<T>),
    Vinet(Vinet<T>),
    AntonSchmidt(AntonSchmidt<T>),
    BreenanStacey(BreenanStacey<T>),
    Polynomial(Polynomial<T>),
}

macro_rules! dispatch {
    (@list $eos:expr, $p:ident => $body:expr; $($family:ident),+) => {
        match $eos {
            $( EquationOfState::$family($p) => $body, )+
        }
    };
    ($eos:expr, $p:ident => $body:expr) => {
        dispatch!(@list $eos, $p => $body;
            Murnaghan, BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th,
            PoirierTarantola2nd, PoirierTarantola3rd, PoirierTarantola4th,
            Vinet, AntonSchmidt, BreenanStacey, Polynomial)
    };
}

macro_rules! rebuild {
    ($eos:expr, $values:expr; $($family:ident),+) => {
        match $eos {
            $( EquationOfState::$family(_) => {
                $family::from_vector($values).map(EquationOfState::$family)
            } )+
        }
    };
}

impl<T: EosScalar> EquationOfState<T> {
    pub fn family(&self) -> Family {
        match self {
            EquationOfState::Murnaghan(_) => Family::Murnaghan,
            EquationOfState::BirchMurnaghan2nd(_) => Family::BirchMurnaghan2nd,
            EquationOfState::BirchMurnaghan3rd(_) => Family::BirchMurnaghan3rd,
            EquationOfState::BirchMurnaghan4th(_) => Family::BirchMurnaghan4th,
            EquationOfState::PoirierTarantola2nd(_) => Family::PoirierTarantola2nd,
            EquationOfState::PoirierTarantola3rd(_) => Family::PoirierTarantola3rd,
            EquationOfState::PoirierTarantola4th(_) => Family::PoirierTarantola4th,
            EquationOfState::Vinet(_) => Family::Vinet,
            EquationOfState::AntonSchmidt(_) => Family::AntonSchmidt,
            EquationOfState::BreenanStacey(_) => Family::BreenanStacey,
            EquationOfState::Polynomial(_) => Family::Polynomial,
        }
    }

    /// Reference volume; every family carries one as its first field.
    pub fn v0(&self) -> T {
        dispatch!(self, p => p.v0)
    }

    pub fn to_vector(&self) -> Vec<T> {
        dispatch!(self, p => p.to_vector())
    }

    pub fn dimensions(&self) -> Vec<Dimension> {
        dispatch!(self, p => p.dimensions())
    }

    pub fn field_names(&self) -> Vec<String> {
        dispatch!(self, p => p.field_names())
    }

    /// Number of parameters, i.e. the length of [`Self::to_vector`].
    pub fn len(&self) -> usize {
        self.dimensions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild a record of this family and shape from `values`.
    pub fn from_vector_like(&self, values: &[T]) -> ModelResult<Self> {
        self.rebuild(values)
    }

    fn rebuild<U: EosScalar>(&self, values: &[U]) -> ModelResult<EquationOfState<U>> {
        if values.len() != self.len() {
            return Err(ModelError::Shape {
                family: self.family(),
                expected: self.len(),
                found: values.len(),
            });
        }
        rebuild!(self, values;
            Murnaghan, BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th,
            PoirierTarantola2nd, PoirierTarantola3rd, PoirierTarantola4th,
            Vinet, AntonSchmidt, BreenanStacey, Polynomial)
    }

    /// Strip every field to its canonical unit.
    ///
    /// Fails with a unit mismatch when a field's dimension disagrees with
    /// the one the family declares for it.
    pub fn to_canonical(&self) -> ModelResult<EquationOfState<Real>> {
        let bare = self
            .to_vector()
            .iter()
            .zip(self.dimensions())
            .map(|(value, dim)| value.to_canonical(dim))
            .collect::<Result<Vec<_>, _>>()?;
        self.rebuild(&bare)
    }

    /// Rebuild from canonical `values`, each in the unit of the matching
    /// field of `self`.
    pub fn restore(&self, values: &[Real]) -> ModelResult<Self> {
        if values.len() != self.len() {
            return Err(ModelError::Shape {
                family: self.family(),
                expected: self.len(),
                found: values.len(),
            });
        }
        let restored = values
            .iter()
            .zip(self.to_vector())
            .zip(self.dimensions())
            .map(|((&value, template), dim)| T::from_canonical(value, dim, template.unit()))
            .collect::<Result<Vec<_>, _>>()?;
        self.rebuild(&restored)
    }

    /// Restore a canonical record into the units of `template`.
    pub fn restore_like(bare: &EquationOfState<Real>, template: &Self) -> ModelResult<Self> {
        if bare.family() != template.family() {
            return Err(ModelError::FamilyMismatch {
                expected: template.family(),
                found: bare.family(),
            });
        }
        template.restore(&bare.to_vector())
    }

    /// Unit results of `property` are reported in: the energy field's unit
    /// for energies, the bulk-modulus-like field's unit otherwise.
    ///
    /// `None` for plain reals. Polynomials have no pressure field, so their
    /// pressures come out in energy unit per volume unit.
    pub fn output_unit(&self, property: Property) -> Option<Unit> {
        let fields = self.to_vector();
        let energy = fields.last()?.unit();
        match (property, self) {
            (Property::Energy, _) => energy,
            (_, EquationOfState::Polynomial(p)) => Some(energy? / p.v0.unit()?),
            _ => fields.get(1)?.unit(),
        }
    }
}

impl EquationOfState<Real> {
    pub fn relation(&self) -> &dyn Relation {
        dispatch!(self, p => p as &dyn Relation)
    }
}

impl<T: EosScalar + fmt::Display> fmt::Display for EquationOfState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.family())?;
        for (i, (name, value)) in self.field_names().iter().zip(self.to_vector()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        write!(f, ")")
    }
}

/// Evaluate `property` of `eos` at `volume`.
///
/// The result is expressed in [`EquationOfState::output_unit`]. A volume of
/// the wrong dimension fails with a unit mismatch; non-positive volumes are
/// passed through and may yield non-finite values.
pub fn evaluate<T: EosScalar>(
    property: Property,
    eos: &EquationOfState<T>,
    volume: T,
) -> ModelResult<T> {
    bind(property, eos)(volume)
}

/// `evaluate` with the record and property fixed, stripping the record once.
pub fn bind<T: EosScalar>(
    property: Property,
    eos: &EquationOfState<T>,
) -> impl Fn(T) -> ModelResult<T> + Send + Sync + use<T> {
    let bare = eos.to_canonical();
    let unit = eos.output_unit(property);
    move |volume| {
        let bare = bare.as_ref().map_err(Clone::clone)?;
        let v = volume.to_canonical(Dimension::VOLUME)?;
        let value = bare.relation().evaluate(property, v)?;
        Ok(T::from_canonical(value, property.dimension(), unit)?)
    }
}

/// Evaluate over many volumes in parallel; output order matches input.
pub fn evaluate_many<T: EosScalar>(
    property: Property,
    eos: &EquationOfState<T>,
    volumes: &[T],
) -> ModelResult<Vec<T>> {
    let f = bind(property, eos);
    volumes.par_iter().map(|&v| f(v)).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pressure_vanishes_at_v0(
            v0 in 10.0..100.0_f64,
            b0 in 0.1..2.0_f64,
            bp0 in 3.0..6.0_f64,
            e0 in -20.0..0.0_f64,
        ) {
            let families: [EquationOfState; 4] = [
                Murnaghan::new(v0, b0, bp0).with_e0(e0).into(),
                BirchMurnaghan3rd::new(v0, b0, bp0).with_e0(e0).into(),
                PoirierTarantola3rd::new(v0, b0, bp0).with_e0(e0).into(),
                Vinet::new(v0, b0, bp0).with_e0(e0).into(),
            ];
            for eos in families {
                let e = evaluate(Property::Energy, &eos, v0).unwrap();
                prop_assert!((e - e0).abs() <= 1e-12 * e0.abs().max(1.0));
                let p = evaluate(Property::Pressure, &eos, v0).unwrap();
                prop_assert!(p.abs() <= 1e-12 * b0);
                let b = evaluate(Property::BulkModulus, &eos, v0).unwrap();
                prop_assert!((b - b0).abs() <= 1e-12 * b0);
            }
        }
    }
}
