//! Volume inversion: find `v` such that a relation of the EOS hits a target.

use crate::error::{SolverError, SolverResult};
use crate::roots::{self, RootConfig, RootMethod, Seed};
use eos_core::{Dimension, EosScalar, Real};
use eos_models::{EquationOfState, Property};
use tracing::{debug, warn};

/// [`find_volume_with`] under the default [`RootConfig`].
pub fn find_volume<T: EosScalar>(
    property: Property,
    eos: &EquationOfState<T>,
    target: T,
    seed: Seed<T>,
    method: Option<RootMethod>,
) -> SolverResult<T> {
    find_volume_with(property, eos, target, seed, method, &RootConfig::default())
}

/// Solve `property(v) = target` for `v`.
///
/// With an explicit `method` only that method runs. Otherwise every method
/// in [`RootMethod::ALL`] is tried in order and the first root found is
/// returned; methods whose seed requirements are not met simply fail and
/// the cascade moves on. When the seed interval contains several roots the
/// one returned is whichever the succeeding method reaches.
///
/// The volume is returned in the unit of the record's `v0`. A negative
/// volume is returned as found, with a warning.
///
/// # Errors
///
/// - `Core` when the target or a seed has the wrong dimension.
/// - `Model(UnsupportedRelation)` up front when the family lacks `property`.
/// - `NoRootFound` listing each attempted method and why it failed.
pub fn find_volume_with<T: EosScalar>(
    property: Property,
    eos: &EquationOfState<T>,
    target: T,
    seed: Seed<T>,
    method: Option<RootMethod>,
    config: &RootConfig,
) -> SolverResult<T> {
    let target = target.to_canonical(property.dimension())?;
    let seed = seed.try_map(|v| v.to_canonical(Dimension::VOLUME))?;
    let bare = eos.to_canonical()?;
    let relation = bare.relation();
    relation.evaluate(property, bare.v0())?;

    let objective = |v: Real| {
        relation
            .evaluate(property, v)
            .map_or(Real::NAN, |value| value - target)
    };

    let methods = match method {
        Some(m) => vec![m],
        None => RootMethod::ALL.to_vec(),
    };
    let mut attempts = Vec::with_capacity(methods.len());
    for m in methods {
        match roots::solve(m, &objective, seed, config) {
            Ok(volume) => {
                debug!(method = %m, volume, "root found");
                if volume < 0.0 {
                    warn!(method = %m, volume, "negative volume found");
                }
                return Ok(T::from_canonical(volume, Dimension::VOLUME, eos.v0().unit())?);
            }
            Err(err) => {
                debug!(method = %m, error = %err, "root finder failed");
                attempts.push((m, err));
            }
        }
    }
    Err(SolverError::NoRootFound { attempts })
}

/// [`find_volume`] for each target in turn, with a shared seed.
pub fn find_volumes<T: EosScalar>(
    property: Property,
    eos: &EquationOfState<T>,
    targets: &[T],
    seed: Seed<T>,
    method: Option<RootMethod>,
) -> SolverResult<Vec<T>> {
    targets
        .iter()
        .map(|&target| find_volume(property, eos, target, seed, method))
        .collect()
}
