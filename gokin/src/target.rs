use std::collections::BTreeMap;
use serde::Serialize;
use crate::{AlloyError, Composition, Element, Result};

/// Window of a weight fraction, `0 <= lower <= upper <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound
{
    pub lower: f64,
    pub upper: f64,
}

impl Bound
{
    /// Creates a window in fractions.
    ///
    /// Returns [`AlloyError::InvalidTarget`] unless `0 <= lower <= upper <= 1`.
    pub fn new(lower: f64, upper: f64) -> Result<Self>
    {
        if !lower.is_finite() || !upper.is_finite() || lower < 0. || upper > 1. || lower > upper {
            return Err(AlloyError::InvalidTarget(
                format!("window [{}, {}] must satisfy 0 <= lower <= upper <= 1", lower, upper)
            ));
        }
        Ok(Bound { lower, upper })
    }

    /// Creates a window in wt%.
    pub fn from_percent(lower: f64, upper: f64) -> Result<Self>
    {
        Self::new(lower / 100., upper / 100.)
    }

    pub fn contains(&self, v: f64, tol: f64) -> bool
    {
        v >= self.lower - tol && v <= self.upper + tol
    }

    /// Lower side can be violated.
    pub fn binds_lower(&self) -> bool
    {
        self.lower > 0.
    }

    /// Upper side can be violated.
    pub fn binds_upper(&self) -> bool
    {
        self.upper < 1.
    }
}

impl core::fmt::Display for Bound
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "[{:.4}%, {:.4}%]", self.lower * 100., self.upper * 100.)
    }
}

//

/// Element bound left unmet by a composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation
{
    pub element: Element,
    pub actual: f64,
    pub bound: Bound,
}

impl Violation
{
    /// Signed distance outside the window: negative below, positive above.
    pub fn excess(&self) -> f64
    {
        if self.actual < self.bound.lower {
            self.actual - self.bound.lower
        }
        else {
            self.actual - self.bound.upper
        }
    }
}

impl core::fmt::Display for Violation
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        let side = if self.actual < self.bound.lower { "below" } else { "above" };
        write!(f, "{} {:.4}% {} {}", self.element, self.actual * 100., side, self.bound)
    }
}

//

/// Acceptance window of a final composition.
///
/// Elements without a bound are unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetSpec
{
    name: String,
    bounds: BTreeMap<Element, Bound>,
}

impl TargetSpec
{
    /// Creates a target without any bound.
    pub fn new(name: impl Into<String>) -> Self
    {
        TargetSpec {
            name: name.into(),
            bounds: BTreeMap::new(),
        }
    }

    /// Creates a target from windows in wt%.
    pub fn from_percent<I, E>(name: impl Into<String>, windows: I) -> Result<Self>
    where I: IntoIterator<Item=(E, (f64, f64))>, E: Into<Element>
    {
        let mut t = Self::new(name);
        for (e, (lo, hi)) in windows {
            t = t.with_bound(e, Bound::from_percent(lo, hi)?);
        }
        Ok(t)
    }

    /// Adds or replaces the window of `e`.
    pub fn with_bound(mut self, e: impl Into<Element>, bound: Bound) -> Self
    {
        self.bounds.insert(e.into(), bound);
        self
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn bound(&self, e: &str) -> Option<&Bound>
    {
        self.bounds.get(e)
    }

    pub fn iter(&self) -> impl Iterator<Item=(&Element, &Bound)>
    {
        self.bounds.iter()
    }

    pub fn len(&self) -> usize
    {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.bounds.is_empty()
    }

    /// Every bound `comp` misses by more than `tol`.
    pub fn violations(&self, comp: &Composition, tol: f64) -> Vec<Violation>
    {
        self.bounds.iter()
            .filter_map(|(e, b)| {
                let v = comp.fraction(e.as_str());
                if b.contains(v, tol) {
                    None
                }
                else {
                    Some(Violation { element: e.clone(), actual: v, bound: *b })
                }
            })
            .collect()
    }

    pub fn is_satisfied_by(&self, comp: &Composition, tol: f64) -> bool
    {
        self.bounds.iter().all(|(e, b)| b.contains(comp.fraction(e.as_str()), tol))
    }
}
