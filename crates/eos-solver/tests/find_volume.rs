//! Volume inversion through the public API.

use eos_core::units::{angstrom3, gpa, kbar, unitless};
use eos_core::{Quantity, Unit};
use eos_models::{BirchMurnaghan3rd, EquationOfState, Polynomial, Property, evaluate};
use eos_solver::{RootError, RootMethod, Seed, SolverError, find_volume, find_volumes};

const EXPECTED: [f64; 11] = [
    167.0,
    156.14036211,
    147.99803636,
    141.51093714,
    136.13864616,
    131.56784032,
    127.60046279,
    124.10332447,
    120.98257681,
    118.16962836,
    115.61284839,
];

fn reference() -> EquationOfState<Quantity> {
    BirchMurnaghan3rd::new(angstrom3(167.0), kbar(2600.0), unitless(4.0)).into()
}

#[test]
fn compression_sequence() {
    let eos = reference();
    let seed = Seed::Interval(angstrom3(0.167), angstrom3(217.1));
    let targets: Vec<Quantity> = (0..11).map(|i| gpa(20.0 * i as f64)).collect();
    let volumes = find_volumes(Property::Pressure, &eos, &targets, seed, None).unwrap();
    for (v, expected) in volumes.iter().zip(EXPECTED) {
        assert_eq!(v.unit, Unit::cubic_angstrom());
        assert!((v.value - expected).abs() < 1e-6, "{} vs {expected}", v.value);
    }
}

#[test]
fn every_method_agrees_when_it_succeeds() {
    let eos = reference();
    for method in RootMethod::ALL {
        let seed = if method.is_bracketing() {
            Seed::Interval(angstrom3(100.0), angstrom3(217.1))
        } else {
            Seed::Point(angstrom3(160.0))
        };
        let v = find_volume(Property::Pressure, &eos, gpa(40.0), seed, Some(method)).unwrap();
        assert!((v.value - EXPECTED[2]).abs() < 1e-6, "{method}: {}", v.value);
    }
}

#[test]
fn bracketing_rescues_a_far_midpoint() {
    // the midpoint sits where the pressure curve is nearly flat
    let eos = reference();
    let seed = Seed::Interval(angstrom3(0.167), angstrom3(2000.0));
    let newton = find_volume(Property::Pressure, &eos, gpa(40.0), seed, Some(RootMethod::Newton));
    let Err(SolverError::NoRootFound { attempts }) = newton else {
        panic!("Newton should fail from the midpoint, got {newton:?}");
    };
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].0, RootMethod::Newton);

    let v = find_volume(Property::Pressure, &eos, gpa(40.0), seed, None).unwrap();
    assert!((v.value - EXPECTED[2]).abs() < 1e-6, "{}", v.value);
}

#[test]
fn cascade_accepts_a_point_seed() {
    let eos = reference();
    let v = find_volume(Property::Pressure, &eos, gpa(40.0), Seed::Point(angstrom3(160.0)), None)
        .unwrap();
    assert!((v.value - EXPECTED[2]).abs() < 1e-6, "{}", v.value);
}

#[test]
fn energy_root_in_an_interval_spanning_zero() {
    // E = −1 + v²/2 + v³ has a single real root near 0.858
    let eos: EquationOfState<f64> = Polynomial::new(0.0, vec![0.5, 1.0]).with_e0(-1.0).into();
    let v = find_volume(Property::Energy, &eos, 0.0, Seed::Interval(-1.0, 1.0), None).unwrap();
    assert!((v - 0.858_094_329_496_575_6).abs() < 1e-9);
    assert!(evaluate(Property::Energy, &eos, v).unwrap().abs() < 1e-10);
}

#[test]
fn inverse_of_evaluate() {
    let eos = reference();
    let seed = Seed::Interval(angstrom3(50.0), angstrom3(217.1));
    for p in [1.0, 7.5, 55.0, 130.0] {
        let v = find_volume(Property::Pressure, &eos, gpa(p), seed, None).unwrap();
        let back = evaluate(Property::Pressure, &eos, v).unwrap();
        assert!((back.value_in(Unit::gigapascal()).unwrap() - p).abs() < 1e-8);
    }
}

#[test]
fn fallback_is_exhaustive() {
    // far below the most negative pressure this EOS reaches
    let eos = reference();
    let seed = Seed::Interval(angstrom3(100.0), angstrom3(217.1));
    let err = find_volume(Property::Pressure, &eos, gpa(-1.0e4), seed, None).unwrap_err();
    let SolverError::NoRootFound { attempts } = err else {
        panic!("unexpected error {err}");
    };
    assert_eq!(attempts.len(), RootMethod::ALL.len());
    for ((method, error), expected) in attempts.iter().zip(RootMethod::ALL) {
        assert_eq!(*method, expected);
        if method.is_bracketing() {
            assert_eq!(*error, RootError::NotBracketed);
        }
    }
}

#[test]
fn record_is_left_untouched() {
    let eos = reference();
    let before = eos.clone();
    let seed = Seed::Interval(angstrom3(100.0), angstrom3(217.1));
    let _ = find_volume(Property::Pressure, &eos, gpa(10.0), seed, None).unwrap();
    assert_eq!(eos, before);
}
