//! Job files: one EOS, one property and the data a command needs.
//!
//! Physical values are written either as strings carrying a unit
//! (`"2600 kbar"`, `"40.9 Å^3"`) or as bare numbers, which are read in the
//! canonical unit of the field (Å³, eV, eV/Å³).
//!
//! ```yaml
//! eos:
//!   family: birch_murnaghan3rd
//!   parameters: { v0: "167 Å^3", b0: "2600 kbar", bp0: 4 }
//! property: pressure
//! targets: ["0 GPa", "20 GPa"]
//! seed: { interval: ["0.167 Å^3", "217.1 Å^3"] }
//! ```

use crate::error::{AppError, AppResult};
use eos_core::{Dimension, EosScalar, Quantity, Unit, UnitTable, parse_quantity};
use eos_models::{
    AntonSchmidt, BirchMurnaghan2nd, BirchMurnaghan3rd, BirchMurnaghan4th, BreenanStacey,
    EquationOfState, Family, Murnaghan, PoirierTarantola2nd, PoirierTarantola3rd,
    PoirierTarantola4th, Polynomial, Property, Vinet,
};
use eos_solver::{FitOptions, LinearFitOptions, RootMethod, Seed};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub eos: Option<EosSection>,
    #[serde(default = "default_property")]
    pub property: Property,
    #[serde(default)]
    pub volumes: Vec<Value>,
    #[serde(default)]
    pub observed: Vec<Value>,
    #[serde(default)]
    pub targets: Vec<Value>,
    pub seed: Option<SeedSection>,
    pub method: Option<RootMethod>,
    #[serde(default)]
    pub fit: FitOptions,
    #[serde(default)]
    pub linear: LinearFitOptions,
}

fn default_property() -> Property {
    Property::Energy
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EosSection {
    pub family: Family,
    pub parameters: BTreeMap<String, Value>,
}

/// Exactly one of `interval: [lo, hi]` or `point: x`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSection {
    pub interval: Option<(Value, Value)>,
    pub point: Option<Value>,
}

/// A number in canonical units, or a string with its own unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn quantity(&self, dimension: Dimension, table: &UnitTable) -> AppResult<Quantity> {
        let q = match self {
            Value::Number(v) => Quantity::new(*v, Unit::canonical(dimension)),
            Value::Text(text) => parse_quantity(text, table)?,
        };
        // a bare number inside a string is canonical too
        if q.unit == Unit::one() && !dimension.is_dimensionless() {
            return Ok(Quantity::new(q.value, Unit::canonical(dimension)));
        }
        Ok(q)
    }
}

impl Job {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::JobFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Ok(serde_yaml::from_str(&content)?),
        }
    }

    pub fn equation_of_state(&self, table: &UnitTable) -> AppResult<EquationOfState<Quantity>> {
        let section = self
            .eos
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("job has no `eos` section".to_string()))?;
        section.build(table)
    }

    pub fn volumes(&self, table: &UnitTable) -> AppResult<Vec<Quantity>> {
        quantities(&self.volumes, Dimension::VOLUME, table)
    }

    pub fn observed(&self, table: &UnitTable) -> AppResult<Vec<Quantity>> {
        quantities(&self.observed, self.property.dimension(), table)
    }

    pub fn targets(&self, table: &UnitTable) -> AppResult<Vec<Quantity>> {
        quantities(&self.targets, self.property.dimension(), table)
    }

    /// The job's seed, or `[v0/2, 2·v0]` when none is given.
    pub fn seed(&self, v0: Quantity, table: &UnitTable) -> AppResult<Seed<Quantity>> {
        let Some(section) = &self.seed else {
            return Ok(Seed::Interval(
                Quantity::new(0.5 * v0.value, v0.unit),
                Quantity::new(2.0 * v0.value, v0.unit),
            ));
        };
        match (&section.interval, &section.point) {
            (Some((lo, hi)), None) => Ok(Seed::Interval(
                lo.quantity(Dimension::VOLUME, table)?,
                hi.quantity(Dimension::VOLUME, table)?,
            )),
            (None, Some(x)) => Ok(Seed::Point(x.quantity(Dimension::VOLUME, table)?)),
            _ => Err(AppError::InvalidInput(
                "seed needs exactly one of `interval` or `point`".to_string(),
            )),
        }
    }
}

fn quantities(values: &[Value], dimension: Dimension, table: &UnitTable) -> AppResult<Vec<Quantity>> {
    values.iter().map(|v| v.quantity(dimension, table)).collect()
}

impl EosSection {
    pub fn build(&self, table: &UnitTable) -> AppResult<EquationOfState<Quantity>> {
        let template = template(self.family, self.polynomial_order());
        let names = template.field_names();
        if let Some(unknown) = self.parameters.keys().find(|k| !names.contains(k)) {
            return Err(AppError::InvalidInput(format!(
                "{} has no parameter `{unknown}` (expected {})",
                self.family,
                names.join(", ")
            )));
        }

        let energy_field = names.len() - 1;
        let mut values = Vec::with_capacity(names.len());
        for (i, (name, dim)) in names.iter().zip(template.dimensions()).enumerate() {
            let value = match self.parameters.get(name) {
                Some(v) => v.quantity(dim, table)?,
                None if i == energy_field => Quantity::zero(dim),
                None => {
                    return Err(AppError::InvalidInput(format!(
                        "{} needs parameter `{name}`",
                        self.family
                    )));
                }
            };
            values.push(value);
        }
        Ok(template.from_vector_like(&values)?)
    }

    /// Highest `cN` coefficient named in a polynomial job.
    fn polynomial_order(&self) -> usize {
        self.parameters
            .keys()
            .filter_map(|k| k.strip_prefix('c')?.parse::<usize>().ok())
            .max()
            .unwrap_or(2)
    }
}

fn template(family: Family, order: usize) -> EquationOfState<Quantity> {
    let v = Quantity::zero(Dimension::VOLUME);
    let p = Quantity::zero(Dimension::PRESSURE);
    let one = Quantity::zero(Dimension::DIMENSIONLESS);
    let inv = Quantity::zero(Dimension::INVERSE_PRESSURE);
    match family {
        Family::Murnaghan => Murnaghan::new(v, p, one).into(),
        Family::BirchMurnaghan2nd => BirchMurnaghan2nd::new(v, p).into(),
        Family::BirchMurnaghan3rd => BirchMurnaghan3rd::new(v, p, one).into(),
        Family::BirchMurnaghan4th => BirchMurnaghan4th::new(v, p, one, inv).into(),
        Family::PoirierTarantola2nd => PoirierTarantola2nd::new(v, p).into(),
        Family::PoirierTarantola3rd => PoirierTarantola3rd::new(v, p, one).into(),
        Family::PoirierTarantola4th => PoirierTarantola4th::new(v, p, one, inv).into(),
        Family::Vinet => Vinet::new(v, p, one).into(),
        Family::AntonSchmidt => AntonSchmidt::new(v, p, one).into(),
        Family::BreenanStacey => BreenanStacey::new(v, p, one).into(),
        Family::Polynomial => {
            let coefficients = (2..=order.max(2))
                .map(|k| {
                    let k = i8::try_from(k).unwrap_or(i8::MAX);
                    Quantity::zero(Dimension::ENERGY.div(Dimension::VOLUME.powi(k)))
                })
                .collect();
            Polynomial::new(v, coefficients).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Job {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn builds_unitful_record() {
        let job = parse(
            r#"
eos:
  family: birch_murnaghan3rd
  parameters: { v0: "167 Å^3", b0: "2600 kbar", bp0: 4 }
property: pressure
targets: ["20 GPa", 0.1]
"#,
        );
        let table = UnitTable::standard();
        let eos = job.equation_of_state(&table).unwrap();
        let fields = eos.to_vector();
        assert_eq!(fields[1].unit, Unit::kilobar());
        assert_eq!(fields[3], Quantity::zero(Dimension::ENERGY));

        let targets = job.targets(&table).unwrap();
        assert_eq!(targets[0].unit, Unit::gigapascal());
        assert_eq!(targets[1].unit, Unit::ev_per_cubic_angstrom());
        assert!(matches!(job.seed(eos.v0(), &table).unwrap(), Seed::Interval(..)));
    }

    #[test]
    fn rejects_unknown_and_missing_parameters() {
        let table = UnitTable::standard();
        let job = parse("eos: { family: vinet, parameters: { v0: 40, b0: 0.5, bq0: 4 } }");
        assert!(matches!(job.equation_of_state(&table), Err(AppError::InvalidInput(_))));
        let job = parse("eos: { family: vinet, parameters: { v0: 40, b0: 0.5 } }");
        assert!(matches!(job.equation_of_state(&table), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn polynomial_coefficients_from_names() {
        let table = UnitTable::standard();
        let job = parse("eos: { family: polynomial, parameters: { v0: 40, c2: 0.01, c4: 1e-5, e0: -3 } }");
        let err = job.equation_of_state(&table).unwrap_err();
        assert!(err.to_string().contains("c3"));
        let job = parse(
            "eos: { family: polynomial, parameters: { v0: 40, c2: 0.01, c3: 0.0, c4: 1e-5, e0: -3 } }",
        );
        let eos = job.equation_of_state(&table).unwrap();
        assert_eq!(eos.len(), 5);
    }

    #[test]
    fn seed_forms() {
        let table = UnitTable::standard();
        let v0 = Quantity::new(167.0, Unit::cubic_angstrom());

        let job = parse(r#"seed: { interval: ["0.167 Å^3", 217.1] }"#);
        let Seed::Interval(lo, hi) = job.seed(v0, &table).unwrap() else {
            panic!("expected an interval seed");
        };
        assert_eq!(lo, Quantity::new(0.167, Unit::cubic_angstrom()));
        assert_eq!(hi.value, 217.1);

        let job = parse(r#"seed: { point: "160 Å^3" }"#);
        assert_eq!(
            job.seed(v0, &table).unwrap(),
            Seed::Point(Quantity::new(160.0, Unit::cubic_angstrom()))
        );

        let job = parse("seed: { interval: [100, 200], point: 150 }");
        assert!(matches!(job.seed(v0, &table), Err(AppError::InvalidInput(_))));
        let job = parse("seed: {}");
        assert!(matches!(job.seed(v0, &table), Err(AppError::InvalidInput(_))));
        assert!(serde_yaml::from_str::<Job>("seed: { bracket: [1, 2] }").is_err());
    }
    #[test]
    fn shipped_jobs_parse() {
        let table = UnitTable::standard();
        for text in [
            include_str!("../jobs/bm3_compression.yaml"),
            include_str!("../jobs/fit_energy.yaml"),
        ] {
            let job = parse(text);
            job.volumes(&table).unwrap();
            job.observed(&table).unwrap();
            job.targets(&table).unwrap();
            let eos = job.equation_of_state(&table).unwrap();
            job.seed(eos.v0(), &table).unwrap();
        }
        let job: Job = serde_json::from_str(include_str!("../jobs/linfit.json")).unwrap();
        assert_eq!(job.linear.degree, 4);
        assert_eq!(job.volumes.len(), job.observed.len());
    }
}
