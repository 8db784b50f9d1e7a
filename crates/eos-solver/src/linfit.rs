//! Linear least-squares fit of energy as a polynomial in finite strain.
//!
//! The minimum of the fitted polynomial gives the equilibrium volume and
//! energy; its derivatives, carried back to volume by the chain rule, give
//! the bulk modulus and its first two pressure derivatives.

use crate::error::{SolverError, SolverResult};
use eos_core::{Real, ensure_all_finite};
use eos_models::{BirchMurnaghan3rd, BirchMurnaghan4th, Strain};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Linear fit configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinearFitOptions {
    pub strain: Strain,
    /// Polynomial degree, at least 2
    pub degree: usize,
    /// Volume the strain is measured from; the lowest-energy sample if unset
    pub reference_volume: Option<Real>,
}

impl Default for LinearFitOptions {
    fn default() -> Self {
        Self {
            strain: Strain::Eulerian,
            degree: 3,
            reference_volume: None,
        }
    }
}

/// Equilibrium properties of a polynomial-in-strain fit, in canonical units.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearFit {
    pub v0: Real,
    pub e0: Real,
    pub b0: Real,
    pub bp0: Real,
    pub bpp0: Real,
    /// Polynomial coefficients in ascending powers of strain
    pub coefficients: Vec<Real>,
    pub strain: Strain,
    pub reference_volume: Real,
    /// Norm of the energy residuals
    pub residual_norm: Real,
}

impl LinearFit {
    /// Energy of the fitted polynomial at volume `v`.
    pub fn energy(&self, v: Real) -> Real {
        polyval(&self.coefficients, self.strain.strain(v, self.reference_volume))
    }

    pub fn to_birch_murnaghan3rd(&self) -> BirchMurnaghan3rd {
        BirchMurnaghan3rd::new(self.v0, self.b0, self.bp0).with_e0(self.e0)
    }

    pub fn to_birch_murnaghan4th(&self) -> BirchMurnaghan4th {
        BirchMurnaghan4th::new(self.v0, self.b0, self.bp0, self.bpp0).with_e0(self.e0)
    }
}

/// Fit `energies` at `volumes` with a polynomial in `options.strain`.
///
/// # Errors
///
/// `ProblemSetup` for mismatched or too short arrays, non-positive volumes
/// or a degree below 2. `LinearFit` when the least-squares problem cannot
/// be solved or the polynomial has no real local minimum at a positive
/// volume.
pub fn linear_fit(
    volumes: &[Real],
    energies: &[Real],
    options: &LinearFitOptions,
) -> SolverResult<LinearFit> {
    let degree = options.degree;
    if degree < 2 {
        return Err(SolverError::ProblemSetup {
            what: format!("polynomial degree {degree} has no curvature"),
        });
    }
    if volumes.len() != energies.len() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "{} volumes but {} energies",
                volumes.len(),
                energies.len()
            ),
        });
    }
    if volumes.len() <= degree {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "{} data points cannot determine a degree {degree} polynomial",
                volumes.len()
            ),
        });
    }
    if volumes.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        return Err(SolverError::ProblemSetup {
            what: "volumes must be positive and finite".to_string(),
        });
    }
    ensure_all_finite(energies, "energy")?;

    let v_ref = match options.reference_volume {
        Some(v) => v,
        None => lowest_energy_volume(volumes, energies),
    };
    let strain = options.strain;
    let x: Vec<Real> = volumes.iter().map(|v| strain.strain(*v, v_ref)).collect();

    let vandermonde = DMatrix::from_fn(x.len(), degree + 1, |i, k| x[i].powi(k as i32));
    let rhs = DVector::from_column_slice(energies);
    let coefficients = vandermonde
        .clone()
        .svd(true, true)
        .solve(&rhs, Real::EPSILON)
        .map_err(|what| SolverError::LinearFit {
            what: what.to_string(),
        })?;
    let residual_norm = (&vandermonde * &coefficients - &rhs).norm();
    let coefficients: Vec<Real> = coefficients.iter().copied().collect();

    let d1 = derivative(&coefficients);
    let d2 = derivative(&d1);
    let x0 = real_roots(&d1)
        .into_iter()
        .map(|x| polish(&d1, &d2, x))
        .filter(|x| polyval(&d2, *x) > 0.0)
        .filter(|x| {
            let v = strain.volume(*x, v_ref);
            v.is_finite() && v > 0.0
        })
        .min_by(|a, b| polyval(&coefficients, *a).total_cmp(&polyval(&coefficients, *b)))
        .ok_or_else(|| SolverError::LinearFit {
            what: "polynomial has no real local minimum".to_string(),
        })?;

    let v0 = strain.volume(x0, v_ref);
    let e0 = polyval(&coefficients, x0);
    let [e2, e3, e4] = volume_derivatives(&coefficients, x0, strain.derivatives(v0, v_ref));
    let b0 = v0 * e2;
    let bp0 = -1.0 - v0 * e3 / e2;
    let bpp0 = (e3 * e2 + v0 * e4 * e2 - v0 * e3 * e3) / e2.powi(3);

    debug!(%strain, degree, v0, e0, b0, bp0, "linear fit");
    Ok(LinearFit {
        v0,
        e0,
        b0,
        bp0,
        bpp0,
        coefficients,
        strain,
        reference_volume: v_ref,
        residual_norm,
    })
}

fn lowest_energy_volume(volumes: &[Real], energies: &[Real]) -> Real {
    volumes
        .iter()
        .zip(energies)
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map_or(Real::NAN, |(v, _)| *v)
}

/// Horner evaluation, coefficients in ascending powers.
fn polyval(coefficients: &[Real], x: Real) -> Real {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

fn derivative(coefficients: &[Real]) -> Vec<Real> {
    coefficients
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| k as Real * c)
        .collect()
}

/// Real roots of a polynomial from the eigenvalues of its companion matrix.
fn real_roots(coefficients: &[Real]) -> Vec<Real> {
    let scale = coefficients.iter().fold(0.0_f64, |m, c| m.max(c.abs()));
    let mut coefficients = coefficients.to_vec();
    while coefficients
        .last()
        .is_some_and(|c| c.abs() <= 1e-14 * scale)
    {
        coefficients.pop();
    }
    let Some((&lead, lower)) = coefficients.split_last() else {
        return Vec::new();
    };
    let m = lower.len();
    if m == 0 {
        return Vec::new();
    }
    let mut companion = DMatrix::zeros(m, m);
    for i in 1..m {
        companion[(i, i - 1)] = 1.0;
    }
    for (i, c) in lower.iter().enumerate() {
        companion[(i, m - 1)] = -c / lead;
    }
    companion
        .complex_eigenvalues()
        .iter()
        .filter(|z| z.im.abs() <= 1e-8 * z.re.abs().max(1.0))
        .map(|z| z.re)
        .collect()
}

/// A few Newton steps on `p` to clean up eigenvalue round-off.
fn polish(p: &[Real], dp: &[Real], mut x: Real) -> Real {
    for _ in 0..8 {
        let slope = polyval(dp, x);
        if slope == 0.0 {
            break;
        }
        let step = polyval(p, x) / slope;
        x -= step;
        if step.abs() <= Real::EPSILON * x.abs().max(1.0) {
            break;
        }
    }
    x
}

/// `[d²E/dV², d³E/dV³, d⁴E/dV⁴]` at a critical point `x` of `E(f)`, given
/// the strain derivatives `[f′, f″, f‴, f⁗]` with respect to volume.
fn volume_derivatives(coefficients: &[Real], x: Real, f: [Real; 4]) -> [Real; 3] {
    let d1 = derivative(coefficients);
    let d2 = derivative(&d1);
    let d3 = derivative(&d2);
    let d4 = derivative(&d3);
    let (p1, p2, p3, p4) = (
        polyval(&d1, x),
        polyval(&d2, x),
        polyval(&d3, x),
        polyval(&d4, x),
    );
    let [f1, f2, f3, f4] = f;
    [
        p2 * f1 * f1 + p1 * f2,
        p3 * f1.powi(3) + 3.0 * p2 * f1 * f2 + p1 * f3,
        p4 * f1.powi(4)
            + 6.0 * p3 * f1 * f1 * f2
            + p2 * (3.0 * f2 * f2 + 4.0 * f1 * f3)
            + p1 * f4,
    ]
}
