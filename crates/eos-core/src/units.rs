// eos-core/src/units.rs

//! Dimension algebra, units and quantities.
//!
//! Every physical value handled by eosfit lives in an algebra generated by
//! two base dimensions: volume (length³) and energy. Pressure is energy per
//! volume, the second pressure derivative of a bulk modulus is volume per
//! energy, and polynomial coefficients are energy per volumeⁿ.
//!
//! The canonical unit of a dimension `(a, b)` is `(Å³)ᵃ·eVᵇ`, so pressures
//! are canonically expressed in eV/Å³. Conversion factors for the other
//! units are taken from `uom`.

use crate::{EosError, EosResult};
use std::fmt;
use std::ops::{Div, Mul};
use uom::si::f64::{
    Energy as UomEnergy, Length as UomLength, Pressure as UomPressure, Volume as UomVolume,
};

// Public typed quantities (SI, f64)
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Volume = UomVolume;

/// Exponents over the (volume, energy) base dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub volume: i8,
    pub energy: i8,
}

impl Dimension {
    pub const DIMENSIONLESS: Self = Self::new(0, 0);
    pub const VOLUME: Self = Self::new(1, 0);
    pub const ENERGY: Self = Self::new(0, 1);
    pub const PRESSURE: Self = Self::new(-1, 1);
    pub const INVERSE_PRESSURE: Self = Self::new(1, -1);

    pub const fn new(volume: i8, energy: i8) -> Self {
        Self { volume, energy }
    }

    pub const fn mul(self, other: Self) -> Self {
        Self::new(self.volume + other.volume, self.energy + other.energy)
    }

    pub const fn div(self, other: Self) -> Self {
        Self::new(self.volume - other.volume, self.energy - other.energy)
    }

    pub const fn powi(self, n: i8) -> Self {
        Self::new(self.volume * n, self.energy * n)
    }

    pub const fn is_dimensionless(self) -> bool {
        self.volume == 0 && self.energy == 0
    }

    /// Symbol of the canonical unit for this dimension.
    pub fn canonical_symbol(self) -> String {
        match self {
            Self::DIMENSIONLESS => "1".to_string(),
            Self::VOLUME => "Å³".to_string(),
            Self::ENERGY => "eV".to_string(),
            Self::PRESSURE => "eV/Å³".to_string(),
            Self::INVERSE_PRESSURE => "Å³/eV".to_string(),
            _ => {
                let mut parts = Vec::new();
                if self.energy == 1 {
                    parts.push("eV".to_string());
                } else if self.energy != 0 {
                    parts.push(format!("eV^{}", self.energy));
                }
                if self.volume != 0 {
                    parts.push(format!("Å^{}", 3 * i32::from(self.volume)));
                }
                parts.join("·")
            }
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DIMENSIONLESS => write!(f, "dimensionless"),
            Self::VOLUME => write!(f, "volume"),
            Self::ENERGY => write!(f, "energy"),
            Self::PRESSURE => write!(f, "pressure"),
            Self::INVERSE_PRESSURE => write!(f, "inverse pressure"),
            other => write!(f, "volume^{}·energy^{}", other.volume, other.energy),
        }
    }
}

/// SI magnitudes of the canonical base units.
mod si {
    use super::{Energy, Length, Volume};
    use uom::si::energy::{electronvolt as ev_unit, joule};
    use uom::si::length::angstrom;
    use uom::si::volume::cubic_meter;

    pub(super) fn cubic_angstrom() -> f64 {
        let l = Length::new::<angstrom>(1.0);
        let v: Volume = l * l * l;
        v.get::<cubic_meter>()
    }

    pub(super) fn electronvolt() -> f64 {
        Energy::new::<ev_unit>(1.0).get::<joule>()
    }

    pub(super) fn ev_per_cubic_angstrom() -> f64 {
        electronvolt() / cubic_angstrom()
    }
}

/// A unit of measurement: a dimension and the magnitude of one unit
/// expressed in the canonical unit of that dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Unit {
    symbol: Option<&'static str>,
    dimension: Dimension,
    scale: f64,
}

impl Unit {
    pub const fn new(symbol: &'static str, dimension: Dimension, scale: f64) -> Self {
        Self {
            symbol: Some(symbol),
            dimension,
            scale,
        }
    }

    /// Unit without a registered symbol, typically the result of unit algebra.
    pub const fn derived(dimension: Dimension, scale: f64) -> Self {
        Self {
            symbol: None,
            dimension,
            scale,
        }
    }

    pub fn canonical(dimension: Dimension) -> Self {
        match dimension {
            Dimension::DIMENSIONLESS => Self::one(),
            Dimension::VOLUME => Self::cubic_angstrom(),
            Dimension::ENERGY => Self::electronvolt(),
            Dimension::PRESSURE => Self::ev_per_cubic_angstrom(),
            Dimension::INVERSE_PRESSURE => Self::new("Å³/eV", dimension, 1.0),
            other => Self::derived(other, 1.0),
        }
    }

    pub fn symbol(&self) -> Option<&'static str> {
        self.symbol
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Magnitude of one of this unit in canonical units.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Same dimension and same scale, whatever the symbol.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
            && (self.scale - other.scale).abs() <= 1e-12 * self.scale.abs().max(other.scale.abs())
    }

    pub fn powi(self, n: i8) -> Self {
        Self::derived(self.dimension.powi(n), self.scale.powi(i32::from(n)))
    }

    pub fn inv(self) -> Self {
        self.powi(-1)
    }

    pub fn one() -> Self {
        Self::new("1", Dimension::DIMENSIONLESS, 1.0)
    }

    pub fn cubic_angstrom() -> Self {
        Self::new("Å³", Dimension::VOLUME, 1.0)
    }

    pub fn cubic_bohr() -> Self {
        use uom::si::length::bohr_radius;
        Self::new("bohr³", Dimension::VOLUME, cubic_length::<bohr_radius>())
    }

    pub fn cubic_nanometer() -> Self {
        use uom::si::length::nanometer;
        Self::new("nm³", Dimension::VOLUME, cubic_length::<nanometer>())
    }

    pub fn cubic_centimeter() -> Self {
        use uom::si::length::centimeter;
        Self::new("cm³", Dimension::VOLUME, cubic_length::<centimeter>())
    }

    pub fn cubic_meter() -> Self {
        use uom::si::length::meter;
        Self::new("m³", Dimension::VOLUME, cubic_length::<meter>())
    }

    pub fn electronvolt() -> Self {
        Self::new("eV", Dimension::ENERGY, 1.0)
    }

    pub fn millielectronvolt() -> Self {
        Self::new("meV", Dimension::ENERGY, 1e-3)
    }

    pub fn hartree() -> Self {
        use uom::si::energy::{hartree, joule};
        let ha = Energy::new::<hartree>(1.0).get::<joule>();
        Self::new("Ha", Dimension::ENERGY, ha / si::electronvolt())
    }

    pub fn rydberg() -> Self {
        Self::new("Ry", Dimension::ENERGY, Self::hartree().scale / 2.0)
    }

    pub fn joule() -> Self {
        Self::new("J", Dimension::ENERGY, 1.0 / si::electronvolt())
    }

    pub fn ev_per_cubic_angstrom() -> Self {
        Self::new("eV/Å³", Dimension::PRESSURE, 1.0)
    }

    pub fn pascal() -> Self {
        use uom::si::pressure::pascal;
        Self::new("Pa", Dimension::PRESSURE, pressure_scale::<pascal>())
    }

    pub fn gigapascal() -> Self {
        use uom::si::pressure::gigapascal;
        Self::new("GPa", Dimension::PRESSURE, pressure_scale::<gigapascal>())
    }

    pub fn bar() -> Self {
        use uom::si::pressure::bar;
        Self::new("bar", Dimension::PRESSURE, pressure_scale::<bar>())
    }

    pub fn kilobar() -> Self {
        Self::new("kbar", Dimension::PRESSURE, 1e3 * Self::bar().scale)
    }

    pub fn megabar() -> Self {
        Self::new("Mbar", Dimension::PRESSURE, 1e6 * Self::bar().scale)
    }

    pub fn rydberg_per_cubic_bohr() -> Self {
        let scale = Self::rydberg().scale / Self::cubic_bohr().scale;
        Self::new("Ry/bohr³", Dimension::PRESSURE, scale)
    }

    pub fn hartree_per_cubic_bohr() -> Self {
        let scale = Self::hartree().scale / Self::cubic_bohr().scale;
        Self::new("Ha/bohr³", Dimension::PRESSURE, scale)
    }

    pub fn per_gigapascal() -> Self {
        Self::new("1/GPa", Dimension::INVERSE_PRESSURE, 1.0 / Self::gigapascal().scale)
    }
}

fn cubic_length<U>() -> f64
where
    U: uom::si::length::Unit + uom::Conversion<f64, T = f64>,
{
    use uom::si::volume::cubic_meter;
    let l = Length::new::<U>(1.0);
    let v: Volume = l * l * l;
    v.get::<cubic_meter>() / si::cubic_angstrom()
}

fn pressure_scale<U>() -> f64
where
    U: uom::si::pressure::Unit + uom::Conversion<f64, T = f64>,
{
    use uom::si::pressure::pascal;
    Pressure::new::<U>(1.0).get::<pascal>() / si::ev_per_cubic_angstrom()
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        Unit::derived(self.dimension.mul(rhs.dimension), self.scale * rhs.scale)
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        Unit::derived(self.dimension.div(rhs.dimension), self.scale / rhs.scale)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol {
            Some(symbol) => write!(f, "{symbol}"),
            None if self.scale == 1.0 => write!(f, "{}", self.dimension.canonical_symbol()),
            None => write!(f, "{}·{}", self.scale, self.dimension.canonical_symbol()),
        }
    }
}

/// A magnitude tagged with its unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    /// Magnitude in the canonical unit of the quantity's dimension.
    pub fn to_canonical(&self) -> f64 {
        self.value * self.unit.scale
    }

    /// Build a quantity in `unit` from a magnitude given in canonical units.
    pub fn from_canonical(canonical: f64, unit: Unit) -> Self {
        Self::new(canonical / unit.scale, unit)
    }

    pub fn ensure_dimension(&self, expected: Dimension) -> EosResult<()> {
        if self.unit.dimension == expected {
            Ok(())
        } else {
            Err(EosError::UnitMismatch {
                expected,
                found: self.unit.dimension,
            })
        }
    }

    pub fn convert(&self, unit: Unit) -> EosResult<Quantity> {
        self.ensure_dimension(unit.dimension)?;
        Ok(Self::from_canonical(self.to_canonical(), unit))
    }

    pub fn value_in(&self, unit: Unit) -> EosResult<f64> {
        Ok(self.convert(unit)?.value)
    }

    pub fn from_volume(v: Volume) -> Self {
        use uom::si::volume::cubic_meter;
        Self::from_canonical(v.get::<cubic_meter>() / si::cubic_angstrom(), Unit::cubic_angstrom())
    }

    pub fn from_energy(e: Energy) -> Self {
        use uom::si::energy::joule;
        Self::from_canonical(e.get::<joule>() / si::electronvolt(), Unit::electronvolt())
    }

    pub fn from_pressure(p: Pressure) -> Self {
        use uom::si::pressure::pascal;
        Self::from_canonical(
            p.get::<pascal>() / si::ev_per_cubic_angstrom(),
            Unit::ev_per_cubic_angstrom(),
        )
    }

    pub fn to_volume(&self) -> EosResult<Volume> {
        use uom::si::volume::cubic_meter;
        self.ensure_dimension(Dimension::VOLUME)?;
        Ok(Volume::new::<cubic_meter>(
            self.to_canonical() * si::cubic_angstrom(),
        ))
    }

    pub fn to_energy(&self) -> EosResult<Energy> {
        use uom::si::energy::joule;
        self.ensure_dimension(Dimension::ENERGY)?;
        Ok(Energy::new::<joule>(self.to_canonical() * si::electronvolt()))
    }

    pub fn to_pressure(&self) -> EosResult<Pressure> {
        use uom::si::pressure::pascal;
        self.ensure_dimension(Dimension::PRESSURE)?;
        Ok(Pressure::new::<pascal>(
            self.to_canonical() * si::ev_per_cubic_angstrom(),
        ))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.dimension.is_dimensionless() && self.unit.scale == 1.0 {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

#[inline]
pub fn angstrom3(v: f64) -> Quantity {
    Quantity::new(v, Unit::cubic_angstrom())
}

#[inline]
pub fn bohr3(v: f64) -> Quantity {
    Quantity::new(v, Unit::cubic_bohr())
}

#[inline]
pub fn ev(v: f64) -> Quantity {
    Quantity::new(v, Unit::electronvolt())
}

#[inline]
pub fn ry(v: f64) -> Quantity {
    Quantity::new(v, Unit::rydberg())
}

#[inline]
pub fn gpa(v: f64) -> Quantity {
    Quantity::new(v, Unit::gigapascal())
}

#[inline]
pub fn kbar(v: f64) -> Quantity {
    Quantity::new(v, Unit::kilobar())
}

#[inline]
pub fn unitless(v: f64) -> Quantity {
    Quantity::new(v, Unit::one())
}

/// Read-only symbol table of the units eosfit understands.
///
/// Built once with [`UnitTable::standard`] and handed to whatever parses
/// unit strings. The canonical unit of each dimension is fixed (see the
/// module docs); the table only resolves names.
#[derive(Debug, Clone)]
pub struct UnitTable {
    entries: Vec<(&'static str, Unit)>,
}

impl UnitTable {
    pub fn standard() -> Self {
        let entries = vec![
            ("1", Unit::one()),
            ("Å^3", Unit::cubic_angstrom()),
            ("A^3", Unit::cubic_angstrom()),
            ("angstrom^3", Unit::cubic_angstrom()),
            ("bohr^3", Unit::cubic_bohr()),
            ("a0^3", Unit::cubic_bohr()),
            ("nm^3", Unit::cubic_nanometer()),
            ("cm^3", Unit::cubic_centimeter()),
            ("m^3", Unit::cubic_meter()),
            ("eV", Unit::electronvolt()),
            ("meV", Unit::millielectronvolt()),
            ("Ry", Unit::rydberg()),
            ("Ha", Unit::hartree()),
            ("hartree", Unit::hartree()),
            ("J", Unit::joule()),
            ("eV/Å^3", Unit::ev_per_cubic_angstrom()),
            ("eV/A^3", Unit::ev_per_cubic_angstrom()),
            ("Pa", Unit::pascal()),
            ("GPa", Unit::gigapascal()),
            ("bar", Unit::bar()),
            ("kbar", Unit::kilobar()),
            ("Mbar", Unit::megabar()),
            ("Ry/bohr^3", Unit::rydberg_per_cubic_bohr()),
            ("Ha/bohr^3", Unit::hartree_per_cubic_bohr()),
            ("1/GPa", Unit::per_gigapascal()),
            ("GPa^-1", Unit::per_gigapascal()),
            ("Å^3/eV", Unit::canonical(Dimension::INVERSE_PRESSURE)),
            ("A^3/eV", Unit::canonical(Dimension::INVERSE_PRESSURE)),
        ];
        Self { entries }
    }

    pub fn lookup(&self, symbol: &str) -> EosResult<Unit> {
        let key = normalize_symbol(symbol);
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, unit)| *unit)
            .ok_or_else(|| EosError::UnknownUnit {
                symbol: symbol.to_string(),
            })
    }

    pub fn canonical(&self, dimension: Dimension) -> Unit {
        Unit::canonical(dimension)
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .replace('³', "^3")
        .replace("**", "^")
        .replace(' ', "")
}

/// Parse `"<number> [unit]"`, e.g. `"2600 kbar"`, `"167Å³"` or `"4.0"`.
///
/// A bare number is returned as a dimensionless quantity.
pub fn parse_quantity(text: &str, table: &UnitTable) -> EosResult<Quantity> {
    let trimmed = text.trim();
    let parse_err = || EosError::Parse {
        text: text.to_string(),
    };

    // Longest prefix that reads as a number; keeps "10eV" from eating the 'e'.
    let split = trimmed
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .filter(|&end| trimmed[..end].trim().parse::<f64>().is_ok())
        .last()
        .ok_or_else(parse_err)?;

    let value: f64 = trimmed[..split].trim().parse().map_err(|_| parse_err())?;
    let unit_text = trimmed[split..].trim();
    if unit_text.is_empty() {
        return Ok(unitless(value));
    }
    Ok(Quantity::new(value, table.lookup(unit_text)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    const TOL: Tolerances = Tolerances {
        abs: 1e-12,
        rel: 1e-9,
    };

    #[test]
    fn electronvolt_in_joules() {
        assert!(nearly_equal(si::electronvolt(), 1.602_176_634e-19, TOL));
        assert!(nearly_equal(si::cubic_angstrom(), 1e-30, TOL));
    }

    #[test]
    fn gigapascal_in_canonical_units() {
        // 1 eV/Å³ = 160.21766 GPa
        let p = gpa(160.217_663_4);
        assert!(nearly_equal(p.to_canonical(), 1.0, TOL));
    }

    #[test]
    fn kilobar_is_a_tenth_of_a_gigapascal() {
        let p = kbar(2600.0).convert(Unit::gigapascal()).unwrap();
        assert!(nearly_equal(p.value, 260.0, TOL));
    }

    #[test]
    fn bohr_and_rydberg_factors() {
        assert!(nearly_equal(Unit::cubic_bohr().scale(), 0.148_184_711_4, Tolerances { abs: 0.0, rel: 1e-8 }));
        assert!(nearly_equal(Unit::rydberg().scale(), 13.605_693_12, Tolerances { abs: 0.0, rel: 1e-8 }));
    }

    #[test]
    fn convert_rejects_other_dimension() {
        let err = angstrom3(1.0).convert(Unit::electronvolt()).unwrap_err();
        assert_eq!(
            err,
            EosError::UnitMismatch {
                expected: Dimension::ENERGY,
                found: Dimension::VOLUME,
            }
        );
    }

    #[test]
    fn unit_algebra_builds_pressure() {
        let p = Unit::rydberg() / Unit::cubic_bohr();
        assert_eq!(p.dimension(), Dimension::PRESSURE);
        assert!(p.is_equivalent(&Unit::rydberg_per_cubic_bohr()));
        assert_eq!(Unit::gigapascal().inv().dimension(), Dimension::INVERSE_PRESSURE);
    }

    #[test]
    fn uom_bridges() {
        let v = angstrom3(10.0).to_volume().unwrap();
        let back = Quantity::from_volume(v);
        assert!(nearly_equal(back.value, 10.0, TOL));
        assert!(ev(1.0).to_pressure().is_err());
    }

    #[test]
    fn parse_with_and_without_units() {
        let table = UnitTable::standard();
        let p = parse_quantity("2600 kbar", &table).unwrap();
        assert_eq!(p.unit, Unit::kilobar());
        assert_eq!(p.value, 2600.0);

        let v = parse_quantity("167Å³", &table).unwrap();
        assert_eq!(v.dimension(), Dimension::VOLUME);
        assert_eq!(v.value, 167.0);

        let e = parse_quantity("-10.8eV", &table).unwrap();
        assert_eq!(e.unit, Unit::electronvolt());
        assert_eq!(e.value, -10.8);

        let x = parse_quantity(" 4 ", &table).unwrap();
        assert!(x.dimension().is_dimensionless());

        assert!(matches!(
            parse_quantity("12 furlongs", &table),
            Err(EosError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_quantity("GPa", &table),
            Err(EosError::Parse { .. })
        ));
    }

    #[test]
    fn derived_dimension_symbol() {
        let d = Dimension::ENERGY.div(Dimension::VOLUME.powi(3));
        assert_eq!(d.canonical_symbol(), "eV·Å^-9");
    }
}
