//! Parameter records, one immutable value type per EOS family.
//!
//! Every record is generic over its numeric representation (`f64` or
//! `Quantity`) and declares its field order explicitly: `to_vector` and
//! `from_vector` are the contract between a record and the solvers.

use crate::error::{ModelError, ModelResult};
use crate::family::Family;
use eos_core::{Dimension, EosScalar};

macro_rules! parameter_record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $dim:ident ),+ ;
            $(#[$emeta:meta])* $energy:ident
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq)]
        pub struct $name<T = f64> {
            $( $(#[$fmeta])* pub $field: T, )+
            $(#[$emeta])*
            pub $energy: T,
        }

        impl<T: EosScalar> $name<T> {
            /// Field names and dimensions, in parameter-vector order.
            pub const FIELDS: &'static [(&'static str, Dimension)] = &[
                $( (stringify!($field), Dimension::$dim), )+
                (stringify!($energy), Dimension::ENERGY),
            ];

            /// Build a record whose reference energy is zero.
            pub fn new($( $field: T ),+) -> Self {
                Self {
                    $( $field, )+
                    $energy: T::zero(Dimension::ENERGY),
                }
            }

            pub fn with_e0(self, $energy: T) -> Self {
                Self { $energy, ..self }
            }

            pub fn dimensions(&self) -> Vec<Dimension> {
                Self::FIELDS.iter().map(|(_, dim)| *dim).collect()
            }

            pub fn field_names(&self) -> Vec<String> {
                Self::FIELDS.iter().map(|(name, _)| name.to_string()).collect()
            }

            pub fn to_vector(&self) -> Vec<T> {
                vec![$( self.$field, )+ self.$energy]
            }

            pub fn from_vector(values: &[T]) -> ModelResult<Self> {
                if values.len() != Self::FIELDS.len() {
                    return Err(ModelError::Shape {
                        family: Family::$name,
                        expected: Self::FIELDS.len(),
                        found: values.len(),
                    });
                }
                let mut i = 0;
                $(
                    let $field = values[i];
                    i += 1;
                )+
                let $energy = values[i];
                Ok(Self { $( $field, )+ $energy })
            }
        }

        impl $name<f64> {
            /// Build from any real-valued inputs, promoted to `f64`.
            pub fn from_reals($( $field: impl Into<f64>, )+ $energy: impl Into<f64>) -> Self {
                Self {
                    $( $field: $field.into(), )+
                    $energy: $energy.into(),
                }
            }
        }

        impl<T: EosScalar> From<$name<T>> for crate::eos::EquationOfState<T> {
            fn from(params: $name<T>) -> Self {
                crate::eos::EquationOfState::$name(params)
            }
        }
    };
}

parameter_record! {
    /// Murnaghan: bulk modulus linear in pressure.
    Murnaghan {
        v0: VOLUME,
        b0: PRESSURE,
        bp0: DIMENSIONLESS;
        e0
    }
}

parameter_record! {
    /// Birch–Murnaghan, second order in Eulerian strain (b′0 fixed at 4).
    BirchMurnaghan2nd {
        v0: VOLUME,
        b0: PRESSURE;
        e0
    }
}

parameter_record! {
    /// Birch–Murnaghan, third order in Eulerian strain.
    BirchMurnaghan3rd {
        v0: VOLUME,
        b0: PRESSURE,
        bp0: DIMENSIONLESS;
        e0
    }
}

parameter_record! {
    /// Birch–Murnaghan, fourth order in Eulerian strain.
    BirchMurnaghan4th {
        v0: VOLUME,
        b0: PRESSURE,
        bp0: DIMENSIONLESS,
        /// Second pressure derivative of the bulk modulus.
        bpp0: INVERSE_PRESSURE;
        e0
    }
}

parameter_record! {
    /// Poirier–Tarantola, second order in natural strain (b′0 fixed at 2).
    PoirierTarantola2nd {
        v0: VOLUME,
        b0: PRESSURE;
        e0
    }
}

parameter_record! {
    /// Poirier–Tarantola, third order in natural strain.
    PoirierTarantola3rd {
        v0: VOLUME,
        b0: PRESSURE,
        bp0: DIMENSIONLESS;
        e0
    }
}

parameter_record! {
    /// Poirier–Tarantola, fourth order in natural strain.
    PoirierTarantola4th {
        v0: VOLUME,
        b0: PRESSURE,
        bp0: DIMENSIONLESS,
        bpp0: INVERSE_PRESSURE;
        e0
    }
}

parameter_record! {
    /// Vinet (universal) equation of state.
    Vinet {
        v0: VOLUME,
        b0: PRESSURE,
        bp0: DIMENSIONLESS;
        e0
    }
}

parameter_record! {
    /// Anton–Schmidt. `e_inf` is the energy at infinite separation, not the
    /// energy at `v0`.
    AntonSchmidt {
        v0: VOLUME,
        beta: PRESSURE,
        n: DIMENSIONLESS;
        e_inf
    }
}

parameter_record! {
    /// Breenan–Stacey. Only pressure and bulk modulus have closed forms.
    BreenanStacey {
        v0: VOLUME,
        b0: PRESSURE,
        /// Grüneisen parameter at the reference volume.
        gamma0: DIMENSIONLESS;
        e0
    }
}

/// Energy polynomial in `(v − v0)`, starting at the quadratic term so that
/// `v0` stays the equilibrium volume.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<T = f64> {
    pub v0: T,
    /// Coefficients of `(v − v0)²`, `(v − v0)³`, …
    pub coefficients: Vec<T>,
    pub e0: T,
}

impl<T: EosScalar> Polynomial<T> {
    pub fn new(v0: T, coefficients: Vec<T>) -> Self {
        Self {
            v0,
            coefficients,
            e0: T::zero(Dimension::ENERGY),
        }
    }

    pub fn with_e0(self, e0: T) -> Self {
        Self { e0, ..self }
    }

    /// Power of `(v − v0)` multiplying `coefficients[index]`.
    pub fn order(index: usize) -> usize {
        index + 2
    }

    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut dims = Vec::with_capacity(self.coefficients.len() + 2);
        dims.push(Dimension::VOLUME);
        for i in 0..self.coefficients.len() {
            let order = i8::try_from(Self::order(i)).unwrap_or(i8::MAX);
            dims.push(Dimension::ENERGY.div(Dimension::VOLUME.powi(order)));
        }
        dims.push(Dimension::ENERGY);
        dims
    }

    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.coefficients.len() + 2);
        names.push("v0".to_string());
        names.extend((0..self.coefficients.len()).map(|i| format!("c{}", Self::order(i))));
        names.push("e0".to_string());
        names
    }

    pub fn to_vector(&self) -> Vec<T> {
        let mut values = Vec::with_capacity(self.coefficients.len() + 2);
        values.push(self.v0);
        values.extend(self.coefficients.iter().copied());
        values.push(self.e0);
        values
    }

    /// Inverse of [`Polynomial::to_vector`]; the coefficient count is
    /// whatever lies between `v0` and `e0`.
    pub fn from_vector(values: &[T]) -> ModelResult<Self> {
        match values {
            [v0, coefficients @ .., e0] => Ok(Self {
                v0: *v0,
                coefficients: coefficients.to_vec(),
                e0: *e0,
            }),
            _ => Err(ModelError::Shape {
                family: Family::Polynomial,
                expected: 2,
                found: values.len(),
            }),
        }
    }
}

impl<T: EosScalar> From<Polynomial<T>> for crate::eos::EquationOfState<T> {
    fn from(params: Polynomial<T>) -> Self {
        crate::eos::EquationOfState::Polynomial(params)
    }
}
