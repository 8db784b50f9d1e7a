//! Finite-strain measures for polynomial fitting.

use eos_core::Real;
use std::fmt;

/// Strain measure relative to a reference volume `v_ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strain {
    /// `((v_ref/v)^(2/3) − 1)/2`, the Birch–Murnaghan strain.
    #[default]
    Eulerian,
    /// `((v/v_ref)^(2/3) − 1)/2`.
    Lagrangian,
    /// `ln(v/v_ref)/3`.
    Natural,
    /// `1 − (v_ref/v)^(1/3)`.
    Infinitesimal,
}

impl Strain {
    pub const ALL: [Strain; 4] = [
        Strain::Eulerian,
        Strain::Lagrangian,
        Strain::Natural,
        Strain::Infinitesimal,
    ];

    pub fn strain(self, v: Real, v_ref: Real) -> Real {
        match self {
            Strain::Eulerian => ((v_ref / v).powf(2.0 / 3.0) - 1.0) / 2.0,
            Strain::Lagrangian => ((v / v_ref).powf(2.0 / 3.0) - 1.0) / 2.0,
            Strain::Natural => (v / v_ref).ln() / 3.0,
            Strain::Infinitesimal => 1.0 - (v_ref / v).cbrt(),
        }
    }

    /// Inverse of [`Strain::strain`].
    pub fn volume(self, f: Real, v_ref: Real) -> Real {
        match self {
            Strain::Eulerian => v_ref * (1.0 + 2.0 * f).powf(-1.5),
            Strain::Lagrangian => v_ref * (1.0 + 2.0 * f).powf(1.5),
            Strain::Natural => v_ref * (3.0 * f).exp(),
            Strain::Infinitesimal => v_ref * (1.0 - f).powi(-3),
        }
    }

    /// `[df/dv, d²f/dv², d³f/dv³, d⁴f/dv⁴]` at `v`.
    pub fn derivatives(self, v: Real, v_ref: Real) -> [Real; 4] {
        // Every measure except the natural one is `c·v^k` plus a constant.
        let (c, k) = match self {
            Strain::Eulerian => (v_ref.powf(2.0 / 3.0) / 2.0, -2.0 / 3.0),
            Strain::Lagrangian => (v_ref.powf(-2.0 / 3.0) / 2.0, 2.0 / 3.0),
            Strain::Infinitesimal => (-v_ref.cbrt(), -1.0 / 3.0),
            Strain::Natural => {
                return [
                    1.0 / (3.0 * v),
                    -1.0 / (3.0 * v * v),
                    2.0 / (3.0 * v.powi(3)),
                    -2.0 / v.powi(4),
                ];
            }
        };
        let mut out = [0.0; 4];
        let mut factor = c;
        for (m, slot) in out.iter_mut().enumerate() {
            factor *= k - m as Real;
            *slot = factor * v.powf(k - (m + 1) as Real);
        }
        out
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strain::Eulerian => "eulerian",
            Strain::Lagrangian => "lagrangian",
            Strain::Natural => "natural",
            Strain::Infinitesimal => "infinitesimal",
        };
        f.write_str(name)
    }
}
