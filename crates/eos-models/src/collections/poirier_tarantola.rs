use crate::error::ModelResult;
use crate::family::Family;
use crate::params::{PoirierTarantola2nd, PoirierTarantola3rd, PoirierTarantola4th};
use crate::relation::Relation;
use eos_core::Real;

/// Natural-strain expansion `E − e0 = 9/2·b0·v0·s²(1 + c·s + d·s²)`.
///
/// `c = b′0 − 2` and `d = 3/4(b0·b′′0 + b′0² − 3b′0 + 3)`; lower orders
/// pin `d = 0` and then `c = 0`.
#[derive(Clone, Copy)]
struct Expansion {
    v0: Real,
    b0: Real,
    c: Real,
    d: Real,
    e0: Real,
}

impl Expansion {
    fn strain(&self, v: Real) -> Real {
        (self.v0 / v).ln() / 3.0
    }

    fn energy(&self, v: Real) -> Real {
        let s = self.strain(v);
        self.e0 + 4.5 * self.b0 * self.v0 * s * s * (1.0 + self.c * s + self.d * s * s)
    }

    fn pressure(&self, v: Real) -> Real {
        let s = self.strain(v);
        let (c, d) = (self.c, self.d);
        self.b0 * (self.v0 / v) * (3.0 * s + 4.5 * c * s * s + 6.0 * d * s.powi(3))
    }

    fn bulk_modulus(&self, v: Real) -> Real {
        let s = self.strain(v);
        let (c, d) = (self.c, self.d);
        let poly = 1.0 + 3.0 * (1.0 + c) * s + (4.5 * c + 6.0 * d) * s * s + 6.0 * d * s.powi(3);
        self.b0 * (self.v0 / v) * poly
    }
}

impl PoirierTarantola2nd {
    fn expansion(&self) -> Expansion {
        Expansion {
            v0: self.v0,
            b0: self.b0,
            c: 0.0,
            d: 0.0,
            e0: self.e0,
        }
    }
}

impl PoirierTarantola3rd {
    fn expansion(&self) -> Expansion {
        Expansion {
            v0: self.v0,
            b0: self.b0,
            c: self.bp0 - 2.0,
            d: 0.0,
            e0: self.e0,
        }
    }
}

impl PoirierTarantola4th {
    fn expansion(&self) -> Expansion {
        let bp0 = self.bp0;
        Expansion {
            v0: self.v0,
            b0: self.b0,
            c: bp0 - 2.0,
            d: 0.75 * (self.b0 * self.bpp0 + bp0 * bp0 - 3.0 * bp0 + 3.0),
            e0: self.e0,
        }
    }
}

macro_rules! tarantola_relation {
    ($($record:ident),+) => {
        $(
            impl Relation for $record {
                fn family(&self) -> Family {
                    Family::$record
                }

                fn energy(&self, v: Real) -> ModelResult<Real> {
                    Ok(self.expansion().energy(v))
                }

                fn pressure(&self, v: Real) -> ModelResult<Real> {
                    Ok(self.expansion().pressure(v))
                }

                fn bulk_modulus(&self, v: Real) -> ModelResult<Real> {
                    Ok(self.expansion().bulk_modulus(v))
                }
            }
        )+
    };
}

tarantola_relation!(PoirierTarantola2nd, PoirierTarantola3rd, PoirierTarantola4th);
