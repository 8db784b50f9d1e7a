//! Nonlinear least-squares fitting of an EOS record to observations.

use crate::error::{SolverError, SolverResult};
use crate::lm::{LmConfig, LmTrace, levenberg_marquardt};
use eos_core::{Dimension, EosScalar, Real, ensure_all_finite};
use eos_models::{EquationOfState, Property};
use nalgebra::DVector;
use tracing::{debug, warn};

/// Fit configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FitOptions {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub solver: LmConfig,
    /// Return the raw solver trace instead of a fitted record.
    pub debug: bool,
}

impl FitOptions {
    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }
}

/// Result of [`fit`].
#[derive(Clone, Debug, PartialEq)]
pub enum FitOutcome<T> {
    /// Converged record, in the units of the trial record.
    Fitted(EquationOfState<T>),
    /// Solver state in canonical units, converged or not.
    Trace(LmTrace),
}

impl<T> FitOutcome<T> {
    pub fn fitted(self) -> Option<EquationOfState<T>> {
        match self {
            FitOutcome::Fitted(eos) => Some(eos),
            FitOutcome::Trace(_) => None,
        }
    }

    pub fn trace(&self) -> Option<&LmTrace> {
        match self {
            FitOutcome::Fitted(_) => None,
            FitOutcome::Trace(trace) => Some(trace),
        }
    }
}

/// Refine `trial` so that `property` best matches `observed` at `volumes`.
///
/// Every parameter of the record is free. Volumes and observations are
/// stripped to canonical units; the fitted parameters are restored into the
/// units of the matching trial fields. `trial` is only read.
///
/// # Errors
///
/// - `ProblemSetup` when the arrays differ in length or hold fewer points
///   than the record has parameters.
/// - `Core` when a value's dimension does not match its role.
/// - `Model` when the family lacks `property` or the record is malformed.
/// - `DidNotConverge` when the iteration stops without converging, unless
///   `options.debug` asks for the trace.
pub fn fit<T: EosScalar>(
    property: Property,
    trial: &EquationOfState<T>,
    volumes: &[T],
    observed: &[T],
    options: &FitOptions,
) -> SolverResult<FitOutcome<T>> {
    if volumes.len() != observed.len() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "{} volumes but {} observations",
                volumes.len(),
                observed.len()
            ),
        });
    }
    if volumes.len() < trial.len() {
        return Err(SolverError::ProblemSetup {
            what: format!(
                "{} data points cannot determine {} parameters",
                volumes.len(),
                trial.len()
            ),
        });
    }

    let v = strip(volumes, Dimension::VOLUME)?;
    let y = strip(observed, property.dimension())?;
    ensure_all_finite(&v, "volume")?;
    ensure_all_finite(&y, "observation")?;
    let bare = trial.to_canonical()?;

    let residual_fn = |x: &DVector<Real>| -> SolverResult<DVector<Real>> {
        let eos = bare.from_vector_like(x.as_slice())?;
        let relation = eos.relation();
        let mut r = DVector::zeros(v.len());
        for (i, (vi, yi)) in v.iter().zip(&y).enumerate() {
            r[i] = relation.evaluate(property, *vi)? - yi;
        }
        Ok(r)
    };

    debug!(
        family = %trial.family(),
        %property,
        points = v.len(),
        "starting fit"
    );
    let x0 = DVector::from_vec(bare.to_vector());
    let trace = levenberg_marquardt(x0, residual_fn, &options.solver)?;

    if !trace.converged {
        warn!(
            family = %trial.family(),
            iterations = trace.iterations,
            residual_norm = trace.residual_norm,
            "fit did not converge"
        );
    } else {
        debug!(
            iterations = trace.iterations,
            residual_norm = trace.residual_norm,
            "fit converged"
        );
    }

    if options.debug {
        return Ok(FitOutcome::Trace(trace));
    }
    if !trace.converged {
        return Err(SolverError::DidNotConverge {
            iterations: trace.iterations,
            residual_norm: trace.residual_norm,
            last: trace.x.iter().copied().collect(),
        });
    }
    Ok(FitOutcome::Fitted(trial.restore(trace.x.as_slice())?))
}

fn strip<T: EosScalar>(values: &[T], dimension: Dimension) -> SolverResult<Vec<Real>> {
    values
        .iter()
        .map(|v| v.to_canonical(dimension).map_err(SolverError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eos_core::units::{angstrom3, ev, gpa, unitless};
    use eos_core::{EosError, Quantity};
    use eos_models::{BirchMurnaghan3rd, BreenanStacey, ModelError, Murnaghan, Vinet, bind};

    fn synthetic(eos: &EquationOfState, property: Property) -> (Vec<f64>, Vec<f64>) {
        let f = bind(property, eos);
        let volumes: Vec<f64> = (0..15).map(|i| 32.0 + i as f64).collect();
        let values = volumes.iter().map(|v| f(*v).unwrap()).collect();
        (volumes, values)
    }

    #[test]
    fn recovers_generating_parameters() {
        let truth: EquationOfState = Vinet::new(40.0, 0.55, 4.4).with_e0(-10.8).into();
        let (v, e) = synthetic(&truth, Property::Energy);
        let trial: EquationOfState = Vinet::new(38.0, 0.4, 4.0).into();
        let fitted = fit(Property::Energy, &trial, &v, &e, &FitOptions::default())
            .unwrap()
            .fitted()
            .unwrap();
        for (a, b) in fitted.to_vector().iter().zip(truth.to_vector()) {
            assert!((a - b).abs() < 1e-6 * b.abs(), "{a} vs {b}");
        }
    }

    #[test]
    fn fits_pressure_data() {
        let truth: EquationOfState = BirchMurnaghan3rd::new(40.0, 0.55, 4.4).into();
        let (v, p) = synthetic(&truth, Property::Pressure);
        let trial: EquationOfState = BirchMurnaghan3rd::new(42.0, 0.3, 4.0).into();
        let fitted = fit(Property::Pressure, &trial, &v, &p, &FitOptions::default())
            .unwrap()
            .fitted()
            .unwrap();
        assert!((fitted.v0() - 40.0).abs() < 1e-6);
    }

    #[test]
    fn restores_trial_units() {
        let truth: EquationOfState = Murnaghan::new(40.0, 0.55, 4.4).with_e0(-10.8).into();
        let (v, e) = synthetic(&truth, Property::Energy);
        let trial: EquationOfState<Quantity> =
            Murnaghan::new(angstrom3(41.0), gpa(80.0), unitless(4.0)).with_e0(ev(-10.0)).into();
        let volumes: Vec<Quantity> = v.iter().map(|v| angstrom3(*v)).collect();
        let energies: Vec<Quantity> = e.iter().map(|e| ev(*e)).collect();
        let fitted = fit(Property::Energy, &trial, &volumes, &energies, &FitOptions::default())
            .unwrap()
            .fitted()
            .unwrap();
        let b0 = fitted.to_vector()[1];
        assert_eq!(b0.unit, eos_core::Unit::gigapascal());
        let expected = Quantity::new(0.55, eos_core::Unit::ev_per_cubic_angstrom());
        assert!((b0.value - expected.value_in(eos_core::Unit::gigapascal()).unwrap()).abs() < 1e-4);
    }

    #[test]
    fn rejects_bad_shapes() {
        let trial: EquationOfState = Vinet::new(40.0, 0.5, 4.0).into();
        let err = fit(Property::Energy, &trial, &[1.0, 2.0], &[1.0], &FitOptions::default());
        assert!(matches!(err, Err(SolverError::ProblemSetup { .. })));
        let (v, e) = ([30.0, 40.0, 50.0], [1.0, 0.0, 1.0]);
        let err = fit(Property::Energy, &trial, &v, &e, &FitOptions::default());
        assert!(matches!(err, Err(SolverError::ProblemSetup { .. })));
    }

    #[test]
    fn rejects_non_finite_observations() {
        let trial: EquationOfState = Vinet::new(40.0, 0.5, 4.0).into();
        let v = [36.0, 38.0, 40.0, 42.0, 44.0];
        let e = [1.0, 0.5, f64::NAN, 0.5, 1.0];
        let err = fit(Property::Energy, &trial, &v, &e, &FitOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            SolverError::Core(EosError::NonFinite { what: "observation", .. })
        ));
    }

    #[test]
    fn rejects_mismatched_units() {
        let trial: EquationOfState<Quantity> =
            Vinet::new(angstrom3(40.0), gpa(80.0), unitless(4.0)).into();
        let volumes: Vec<Quantity> = (0..5).map(|i| angstrom3(36.0 + i as f64)).collect();
        let observed: Vec<Quantity> = (0..5).map(|_| gpa(1.0)).collect();
        let err = fit(Property::Energy, &trial, &volumes, &observed, &FitOptions::default());
        assert_eq!(
            err.unwrap_err(),
            SolverError::Core(EosError::UnitMismatch {
                expected: Dimension::ENERGY,
                found: Dimension::PRESSURE,
            })
        );
    }

    #[test]
    fn unsupported_property_is_surfaced() {
        let trial: EquationOfState = BreenanStacey::new(40.0, 0.5, 1.5).into();
        let v: Vec<f64> = (0..6).map(|i| 36.0 + i as f64).collect();
        let err = fit(Property::Energy, &trial, &v, &v, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::Model(ModelError::UnsupportedRelation { .. })));
    }

    #[test]
    fn debug_returns_trace() {
        let truth: EquationOfState = Vinet::new(40.0, 0.55, 4.4).with_e0(-10.8).into();
        let (v, e) = synthetic(&truth, Property::Energy);
        let outcome = fit(Property::Energy, &truth, &v, &e, &FitOptions::debug()).unwrap();
        let trace = outcome.trace().unwrap();
        assert!(trace.converged);
        assert_eq!(trace.jacobian.shape(), (15, 4));
        assert!(outcome.fitted().is_none());
    }
}
