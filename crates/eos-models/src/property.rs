//! Physical-property selector.

use eos_core::Dimension;
use std::fmt;

/// Which closed-form relation to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Property {
    Energy,
    Pressure,
    BulkModulus,
}

impl Property {
    pub const ALL: [Property; 3] = [Property::Energy, Property::Pressure, Property::BulkModulus];

    /// Dimension of the values this relation returns.
    pub fn dimension(self) -> Dimension {
        match self {
            Property::Energy => Dimension::ENERGY,
            Property::Pressure | Property::BulkModulus => Dimension::PRESSURE,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Energy => write!(f, "energy"),
            Property::Pressure => write!(f, "pressure"),
            Property::BulkModulus => write!(f, "bulk modulus"),
        }
    }
}
