use crate::units::Dimension;
use thiserror::Error;

pub type EosResult<T> = Result<T, EosError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unit mismatch: expected {expected}, found {found}")]
    UnitMismatch {
        expected: Dimension,
        found: Dimension,
    },

    #[error("Unknown unit '{symbol}'")]
    UnknownUnit { symbol: String },

    #[error("Cannot parse quantity from '{text}'")]
    Parse { text: String },
}
