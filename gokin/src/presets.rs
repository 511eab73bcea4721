//! Named targets and melts of common aluminium casting practice.

use crate::{AlloyError, Composition, InitialComposition, Result, TargetSpec};

/// Names accepted by [`target`].
pub const TARGETS: &[&str] = &["LM2", "A380", "A356"];

/// Names accepted by [`initial`].
pub const INITIALS: &[&str] = &["2ORD", "23FAR", "AL91"];

const LM2: &[(&str, (f64, f64))] = &[
    ("Al", (82.0, 89.3)),
    ("Si", (9.5, 11.5)),
    ("Cu", (0.7, 2.5)),
    ("Zn", (0.0, 2.0)),
    ("Fe", (0.0, 1.0)),
    ("Mn", (0.0, 0.5)),
    ("Ni", (0.0, 0.5)),
    ("Mg", (0.0, 0.3)),
    ("Pb", (0.0, 0.3)),
    ("Sn", (0.0, 0.2)),
    ("Ti", (0.0, 0.2)),
];

const A380: &[(&str, (f64, f64))] = &[
    ("Al", (80.0, 90.0)),
    ("Si", (7.5, 9.5)),
    ("Cu", (3.3, 4.0)),
    ("Fe", (0.0, 1.3)),
    ("Zn", (0.0, 3.0)),
    ("Mn", (0.0, 0.5)),
    ("Mg", (0.0, 0.1)),
    ("Ni", (0.0, 0.5)),
    ("Sn", (0.0, 0.35)),
    ("Pb", (0.0, 0.15)),
];

const A356: &[(&str, (f64, f64))] = &[
    ("Al", (90.0, 94.0)),
    ("Si", (6.5, 7.5)),
    ("Mg", (0.2, 0.4)),
    ("Fe", (0.0, 0.2)),
    ("Cu", (0.0, 0.1)),
    ("Mn", (0.0, 0.1)),
    ("Zn", (0.0, 0.1)),
    ("Pb", (0.0, 0.05)),
];

const COMP_2ORD: &[(&str, f64)] = &[
    ("Si", 3.84),
    ("Fe", 0.49),
    ("Cu", 0.64),
    ("Mn", 0.06),
    ("Mg", 0.004),
    ("Cr", 0.005),
    ("Ni", 0.01),
    ("Zn", 0.07),
    ("Ti", 0.016),
    ("Pb", 0.13),
    ("Sn", 0.006),
    ("V", 0.01),
    ("Na", 0.002),
    ("Co", 0.01),
    ("Ga", 0.01),
    ("Al", 94.70),
];

const COMP_23FAR: &[(&str, f64)] = &[
    ("Al", 95.40),
    ("Si", 3.22),
    ("Fe", 0.49),
    ("Cu", 0.54),
    ("Zn", 0.07),
    ("Pb", 0.14),
    ("Mn", 0.05),
    ("Ti", 0.029),
    ("Ni", 0.01),
    ("Ga", 0.01),
    ("Co", 0.01),
    ("V", 0.007),
    ("Bi", 0.007),
    ("Na", 0.002),
    ("Mg", 0.006),
    ("Cr", 0.004),
    ("Sn", 0.005),
    ("B", 0.001),
];

const COMP_AL91: &[(&str, f64)] = &[
    ("Al", 90.17),
    ("Si", 7.33),
    ("Fe", 0.855),
    ("Cu", 1.2),
    ("Pb", 0.218),
];

/// Looks up a target by case-insensitive name.
pub fn target(name: &str) -> Result<TargetSpec>
{
    let (canon, windows) = match name.to_ascii_uppercase().as_str() {
        "LM2" => ("LM2", LM2),
        "A380" => ("A380", A380),
        "A356" => ("A356", A356),
        _ => return Err(AlloyError::UnknownPreset(name.to_string())),
    };

    TargetSpec::from_percent(canon, windows.iter().copied())
}

/// Looks up a melt composition by case-insensitive name.
pub fn composition(name: &str) -> Result<Composition>
{
    let percents = match name.to_ascii_uppercase().as_str() {
        "2ORD" => COMP_2ORD,
        "23FAR" => COMP_23FAR,
        "AL91" => COMP_AL91,
        _ => return Err(AlloyError::UnknownPreset(name.to_string())),
    };

    Composition::from_percent(percents.iter().copied())
}

/// Looks up a melt by case-insensitive name and gives it `mass` kg.
pub fn initial(name: &str, mass: f64) -> Result<InitialComposition>
{
    InitialComposition::new(name.to_ascii_uppercase(), composition(name)?, mass)
}
