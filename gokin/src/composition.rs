use std::borrow::Borrow;
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::{AlloyError, Result};

//

/// Chemical element symbol such as `"Fe"` or `"Cu"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Element(String);

impl Element
{
    pub fn new(symbol: impl Into<String>) -> Self
    {
        Element(symbol.into())
    }

    pub fn as_str(&self) -> &str
    {
        &self.0
    }
}

impl Borrow<str> for Element
{
    fn borrow(&self) -> &str
    {
        &self.0
    }
}

impl From<&str> for Element
{
    fn from(s: &str) -> Self
    {
        Element(s.to_string())
    }
}

impl From<String> for Element
{
    fn from(s: String) -> Self
    {
        Element(s)
    }
}

impl core::fmt::Display for Element
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        f.pad(&self.0)
    }
}

//

/// Elemental composition by weight fraction.
///
/// Every fraction is finite and within `[0, 1]`.
/// Nothing forces the fractions to sum to one: trace elements are often left out.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Composition
{
    fractions: BTreeMap<Element, f64>,
}

impl Composition
{
    /// Creates a composition from weight fractions.
    ///
    /// Returns [`AlloyError::InvalidComposition`] if a fraction is negative, above one or non-finite,
    /// or if an element appears twice.
    /// * `fractions` iterates pairs of an element and its fraction in `[0, 1]`.
    pub fn new<I, E>(fractions: I) -> Result<Self>
    where I: IntoIterator<Item=(E, f64)>, E: Into<Element>
    {
        let mut map = BTreeMap::new();

        for (e, v) in fractions {
            let e = e.into();
            if !v.is_finite() || v < 0. || v > 1. {
                return Err(AlloyError::InvalidComposition(
                    format!("fraction of {} must be within [0, 1], got {}", e, v)
                ));
            }
            if map.insert(e.clone(), v).is_some() {
                return Err(AlloyError::InvalidComposition(format!("{} given twice", e)));
            }
        }

        Ok(Composition { fractions: map })
    }

    /// Creates a composition from weight percentages.
    ///
    /// Same as [`Composition::new`] with every value divided by 100.
    pub fn from_percent<I, E>(percents: I) -> Result<Self>
    where I: IntoIterator<Item=(E, f64)>, E: Into<Element>
    {
        Self::new(percents.into_iter().map(|(e, p)| (e, p / 100.)))
    }

    /// Computed compositions such as mixtures, already known to be valid.
    pub(crate) fn from_fractions(fractions: BTreeMap<Element, f64>) -> Self
    {
        Composition { fractions }
    }

    /// Returns the fraction of `e`, zero if absent.
    pub fn fraction(&self, e: &str) -> f64
    {
        self.fractions.get(e).copied().unwrap_or(0.)
    }

    /// Returns the percentage of `e`, zero if absent.
    pub fn percent(&self, e: &str) -> f64
    {
        self.fraction(e) * 100.
    }

    /// Checks if `e` is listed, even with zero fraction.
    pub fn contains(&self, e: &str) -> bool
    {
        self.fractions.contains_key(e)
    }

    pub fn iter(&self) -> impl Iterator<Item=(&Element, f64)>
    {
        self.fractions.iter().map(|(e, v)| (e, *v))
    }

    pub fn elements(&self) -> impl Iterator<Item=&Element>
    {
        self.fractions.keys()
    }

    pub fn len(&self) -> usize
    {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.fractions.is_empty()
    }

    /// Returns the sum of all fractions.
    pub fn total(&self) -> f64
    {
        self.fractions.values().sum()
    }

    /// Lets `balance` absorb the remainder.
    ///
    /// Returns a copy whose fraction of `balance` is one minus the sum of the other fractions.
    /// Returns [`AlloyError::InvalidComposition`] if the others already exceed one.
    pub fn with_balance(&self, balance: &Element) -> Result<Self>
    {
        let others: f64 = self.iter()
            .filter(|(e, _)| *e != balance)
            .map(|(_, v)| v)
            .sum();
        let rest = 1. - others;

        if rest < -1e-9 {
            return Err(AlloyError::InvalidComposition(
                format!("no room for balance {}: other elements sum to {:.4}%", balance, others * 100.)
            ));
        }

        let mut fractions = self.fractions.clone();
        fractions.insert(balance.clone(), rest.max(0.));

        Ok(Composition { fractions })
    }
}

impl core::fmt::Display for Composition
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        let mut first = true;
        for (e, v) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} {:.4}%", e, v * 100.)?;
            first = false;
        }
        Ok(())
    }
}

//

/// Melt before any addition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialComposition
{
    name: String,
    composition: Composition,
    mass: f64,
}

impl InitialComposition
{
    /// Creates an instance.
    ///
    /// Returns [`AlloyError::InvalidComposition`] unless `mass` is finite and positive.
    pub fn new(name: impl Into<String>, composition: Composition, mass: f64) -> Result<Self>
    {
        let name = name.into();

        if !mass.is_finite() || mass <= 0. {
            return Err(AlloyError::InvalidComposition(
                format!("mass of {} must be positive, got {}", name, mass)
            ));
        }

        Ok(InitialComposition { name, composition, mass })
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn composition(&self) -> &Composition
    {
        &self.composition
    }

    /// Mass in kg.
    pub fn mass(&self) -> f64
    {
        self.mass
    }

    pub(crate) fn with_composition(&self, composition: Composition) -> Self
    {
        InitialComposition {
            name: self.name.clone(),
            composition,
            mass: self.mass,
        }
    }
}

//

#[test]
fn test_composition1()
{
    use float_eq::assert_float_eq;

    let c = Composition::from_percent([("Si", 10.), ("Cu", 2.)]).unwrap();
    assert_float_eq!(c.fraction("Si"), 0.1, abs <= 1e-12);
    assert_float_eq!(c.percent("Cu"), 2., abs <= 1e-12);
    assert_float_eq!(c.fraction("Fe"), 0., abs <= 1e-12);

    let b = c.with_balance(&Element::from("Al")).unwrap();
    assert_float_eq!(b.fraction("Al"), 0.88, abs <= 1e-12);
    assert_float_eq!(b.total(), 1., abs <= 1e-12);

    assert!(Composition::new([("Si", -0.1)]).is_err());
    assert!(Composition::new([("Si", 1.5)]).is_err());
    assert!(Composition::new([("Si", f64::NAN)]).is_err());
    assert!(Composition::new([("Si", 0.1), ("Si", 0.2)]).is_err());

    let over = Composition::new([("Si", 0.7), ("Cu", 0.5)]).unwrap();
    assert!(over.with_balance(&Element::from("Al")).is_err());
}
