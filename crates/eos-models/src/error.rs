//! Model errors.

use crate::family::Family;
use crate::property::Property;
use eos_core::EosError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or evaluating an equation of state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The family has no closed form for the requested property.
    #[error("Unsupported relation: {family} has no closed form for {property}")]
    UnsupportedRelation { family: Family, property: Property },

    /// A parameter vector does not match the record it should rebuild.
    #[error("{family} expects {expected} parameters, got {found}")]
    Shape {
        family: Family,
        expected: usize,
        found: usize,
    },

    /// A record was asked to restore values belonging to another family.
    #[error("Expected a {expected} record, got {found}")]
    FamilyMismatch { expected: Family, found: Family },

    #[error("Unit error: {0}")]
    Core(#[from] EosError),
}
