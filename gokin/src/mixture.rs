use std::collections::BTreeSet;
use crate::{AdditionPlan, AlloyError, AlloyRegistry, Composition, Element, InitialComposition, MasterAlloy, Result};

/// Composition and total mass after adding master alloys to a melt.
///
/// Returns a tuple of the resulting composition and the total mass,
/// [`AlloyError::UnknownAlloy`] if `plan` names an unregistered alloy
/// or [`AlloyError::InvalidMass`] for a negative or non-finite added mass.
pub fn mix(initial: &InitialComposition, plan: &AdditionPlan, registry: &AlloyRegistry) -> Result<(Composition, f64)>
{
    let mut alloys = Vec::with_capacity(plan.len());
    let mut masses = Vec::with_capacity(plan.len());

    for (name, mass) in plan.iter() {
        let alloy = registry.get(name)
            .ok_or_else(|| AlloyError::UnknownAlloy(name.to_string()))?;
        alloys.push(alloy);
        masses.push(mass);
    }

    mix_with(initial, &alloys, &masses)
}

/// Same as [`mix`] for resolved master alloys and masses given in the same order.
pub fn mix_with(initial: &InitialComposition, alloys: &[&MasterAlloy], masses: &[f64]) -> Result<(Composition, f64)>
{
    assert_eq!(alloys.len(), masses.len());

    for (a, m) in alloys.iter().zip(masses) {
        if !m.is_finite() || *m < 0. {
            return Err(AlloyError::InvalidMass(format!("{} kg of {}", m, a.name())));
        }
    }

    let mixture = Mixture::new(initial, alloys);
    let total = mixture.total_mass(masses);

    if !(total > 0.) {
        return Err(AlloyError::InvalidMass(format!("total mass {} kg", total)));
    }

    Ok((mixture.composition(masses), total))
}

//

/// Mixture evaluator
///
/// Holds element masses of the melt and element fractions of each master alloy,
/// so fractions of the mixture are evaluated for any added masses \\(x\\) without allocation.
#[derive(Debug, Clone)]
pub struct Mixture
{
    elements: Vec<Element>,
    base: Vec<f64>,
    base_mass: f64,
    // row-major: alloy, element
    content: Vec<f64>,
    n_alloys: usize,
}

impl Mixture
{
    /// Creates an evaluator.
    ///
    /// Elements are those listed by the melt or by any master alloy.
    pub fn new(initial: &InitialComposition, alloys: &[&MasterAlloy]) -> Self
    {
        let mut set: BTreeSet<&Element> = BTreeSet::new();
        for e in initial.composition().elements() {
            set.insert(e);
        }
        for a in alloys {
            for e in a.composition().elements() {
                set.insert(e);
            }
        }
        let elements: Vec<Element> = set.into_iter().cloned().collect();

        let base_mass = initial.mass();
        let base = elements.iter()
            .map(|e| base_mass * initial.composition().fraction(e.as_str()))
            .collect();

        let mut content = Vec::with_capacity(alloys.len() * elements.len());
        for a in alloys {
            for e in elements.iter() {
                content.push(a.composition().fraction(e.as_str()));
            }
        }

        Mixture {
            elements,
            base,
            base_mass,
            content,
            n_alloys: alloys.len(),
        }
    }

    pub fn elements(&self) -> &[Element]
    {
        &self.elements
    }

    pub fn index_of(&self, e: &str) -> Option<usize>
    {
        self.elements.binary_search_by(|v| v.as_str().cmp(e)).ok()
    }

    pub fn n_alloys(&self) -> usize
    {
        self.n_alloys
    }

    /// Fraction of the `k`-th element in the `i`-th master alloy.
    pub fn content(&self, i: usize, k: usize) -> f64
    {
        self.content[i * self.elements.len() + k]
    }

    pub fn base_mass(&self) -> f64
    {
        self.base_mass
    }

    /// Returns the melt mass plus the sum of `x`.
    pub fn total_mass(&self, x: &[f64]) -> f64
    {
        assert_eq!(x.len(), self.n_alloys);

        self.base_mass + x.iter().sum::<f64>()
    }

    /// Mass of the `k`-th element.
    pub fn element_mass(&self, k: usize, x: &[f64]) -> f64
    {
        assert_eq!(x.len(), self.n_alloys);

        let mut m = self.base[k];
        for (i, xi) in x.iter().enumerate() {
            m += self.content(i, k) * xi;
        }
        m
    }

    /// Fraction of the `k`-th element.
    pub fn fraction(&self, k: usize, x: &[f64]) -> f64
    {
        self.element_mass(k, x) / self.total_mass(x)
    }

    /// Fraction of an optional element, zero when no material contains it.
    pub fn fraction_of(&self, k: Option<usize>, x: &[f64]) -> f64
    {
        k.map_or(0., |k| self.fraction(k, x))
    }

    pub fn composition(&self, x: &[f64]) -> Composition
    {
        let total = self.total_mass(x);

        let map = self.elements.iter().enumerate()
            .map(|(k, e)| (e.clone(), (self.element_mass(k, x) / total).clamp(0., 1.)))
            .collect();

        Composition::from_fractions(map)
    }
}
