use crate::error::ModelResult;
use crate::family::Family;
use crate::params::{BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th};
use crate::relation::Relation;
use eos_core::Real;

/// The Birch–Murnaghan ladder written once: every order is the fourth-order
/// expansion with its higher coefficients pinned.
///
/// `E − e0 = 3/8·v0·b0·f²·(12 + 12(b′0 − 4)f + c4·f²)`; the third order has
/// `c4 = 0`, the second additionally `b′0 = 4`.
#[derive(Clone, Copy)]
struct Expansion {
    v0: Real,
    b0: Real,
    bp0: Real,
    c4: Real,
    e0: Real,
}

impl Expansion {
    fn strain(&self, v: Real) -> Real {
        ((self.v0 / v).powf(2.0 / 3.0) - 1.0) / 2.0
    }

    fn energy(&self, v: Real) -> Real {
        let f = self.strain(v);
        let poly = 12.0 + 12.0 * (self.bp0 - 4.0) * f + self.c4 * f * f;
        self.e0 + 3.0 / 8.0 * self.v0 * self.b0 * f * f * poly
    }

    /// `g(f)` and `g′(f)` with `P = b0/2·(1 + 2f)^(5/2)·g(f)`.
    fn g(&self, f: Real) -> (Real, Real) {
        let a = 9.0 * (self.bp0 - 4.0);
        let g = 6.0 * f + a * f * f + self.c4 * f.powi(3);
        let dg = 6.0 + 2.0 * a * f + 3.0 * self.c4 * f * f;
        (g, dg)
    }

    fn pressure(&self, v: Real) -> Real {
        let f = self.strain(v);
        let (g, _) = self.g(f);
        self.b0 / 2.0 * (1.0 + 2.0 * f).powf(2.5) * g
    }

    fn bulk_modulus(&self, v: Real) -> Real {
        let f = self.strain(v);
        let (g, dg) = self.g(f);
        let w = 1.0 + 2.0 * f;
        self.b0 / 6.0 * w.powf(2.5) * (5.0 * g + w * dg)
    }
}

impl BirchMurnaghan2nd {
    fn expansion(&self) -> Expansion {
        Expansion {
            v0: self.v0,
            b0: self.b0,
            bp0: 4.0,
            c4: 0.0,
            e0: self.e0,
        }
    }
}

impl BirchMurnaghan3rd {
    fn expansion(&self) -> Expansion {
        Expansion {
            v0: self.v0,
            b0: self.b0,
            bp0: self.bp0,
            c4: 0.0,
            e0: self.e0,
        }
    }
}

impl BirchMurnaghan4th {
    fn expansion(&self) -> Expansion {
        let h = self.b0 * self.bpp0 + self.bp0 * self.bp0;
        Expansion {
            v0: self.v0,
            b0: self.b0,
            bp0: self.bp0,
            c4: 9.0 * h - 63.0 * self.bp0 + 143.0,
            e0: self.e0,
        }
    }
}

macro_rules! birch_relation {
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

birch_relation!(BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th);
