//! EOS family tags.

use std::fmt;

/// Closed set of supported equation-of-state families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Family {
    Murnaghan,
    BirchMurnaghan2nd,
    BirchMurnaghan3rd,
    BirchMurnaghan4th,
    PoirierTarantola2nd,
    PoirierTarantola3rd,
    PoirierTarantola4th,
    Vinet,
    AntonSchmidt,
    BreenanStacey,
    Polynomial,
}

impl Family {
    pub const ALL: [Family; 11] = [
        Family::Murnaghan,
        Family::BirchMurnaghan2nd,
        Family::BirchMurnaghan3rd,
        Family::BirchMurnaghan4th,
        Family::PoirierTarantola2nd,
        Family::PoirierTarantola3rd,
        Family::PoirierTarantola4th,
        Family::Vinet,
        Family::AntonSchmidt,
        Family::BreenanStacey,
        Family::Polynomial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Murnaghan => "Murnaghan",
            Family::BirchMurnaghan2nd => "Birch–Murnaghan 2nd",
            Family::BirchMurnaghan3rd => "Birch–Murnaghan 3rd",
            Family::BirchMurnaghan4th => "Birch–Murnaghan 4th",
            Family::PoirierTarantola2nd => "Poirier–Tarantola 2nd",
            Family::PoirierTarantola3rd => "Poirier–Tarantola 3rd",
            Family::PoirierTarantola4th => "Poirier–Tarantola 4th",
            Family::Vinet => "Vinet",
            Family::AntonSchmidt => "Anton–Schmidt",
            Family::BreenanStacey => "Breenan–Stacey",
            Family::Polynomial => "polynomial",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
