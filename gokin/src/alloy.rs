use std::collections::BTreeMap;
use serde::Serialize;
use crate::{AlloyError, Composition, Result};

/// Master alloy
///
/// Pre-manufactured additive of fixed composition, optionally priced per kg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterAlloy
{
    name: String,
    composition: Composition,
    unit_cost: Option<f64>,
}

impl MasterAlloy
{
    /// Creates an unpriced master alloy.
    pub fn new(name: impl Into<String>, composition: Composition) -> Self
    {
        MasterAlloy {
            name: name.into(),
            composition,
            unit_cost: None,
        }
    }

    /// Sets the cost per kg.
    ///
    /// Returns [`AlloyError::InvalidCost`] unless `cost` is finite and non-negative.
    pub fn with_cost(mut self, cost: f64) -> Result<Self>
    {
        if !cost.is_finite() || cost < 0. {
            return Err(AlloyError::InvalidCost(format!("{} ({})", self.name, cost)));
        }
        self.unit_cost = Some(cost);
        Ok(self)
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn composition(&self) -> &Composition
    {
        &self.composition
    }

    pub fn unit_cost(&self) -> Option<f64>
    {
        self.unit_cost
    }
}

//

/// Registry of master alloys keyed by unique name, kept in insertion order.
///
/// Read-only while solving, so one registry can serve requests on several threads.
#[derive(Debug, Clone, Default)]
pub struct AlloyRegistry
{
    alloys: Vec<MasterAlloy>,
    index: BTreeMap<String, usize>,
}

impl AlloyRegistry
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Registers a master alloy.
    ///
    /// Returns [`AlloyError::DuplicateAlloy`] if the name is already taken.
    pub fn register(&mut self, alloy: MasterAlloy) -> Result<()>
    {
        if self.index.contains_key(alloy.name()) {
            return Err(AlloyError::DuplicateAlloy(alloy.name().to_string()));
        }

        log::debug!("register {}: {}", alloy.name(), alloy.composition());
        self.index.insert(alloy.name().to_string(), self.alloys.len());
        self.alloys.push(alloy);
        Ok(())
    }

    /// Registers every master alloy in order, stopping at the first duplicate.
    pub fn register_all<I>(&mut self, alloys: I) -> Result<()>
    where I: IntoIterator<Item=MasterAlloy>
    {
        for a in alloys {
            self.register(a)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MasterAlloy>
    {
        self.index.get(name).map(|&i| &self.alloys[i])
    }

    pub fn contains(&self, name: &str) -> bool
    {
        self.index.contains_key(name)
    }

    /// Removes a master alloy.
    ///
    /// Returns the removed alloy, or [`AlloyError::UnknownAlloy`].
    pub fn remove(&mut self, name: &str) -> Result<MasterAlloy>
    {
        let i = self.index.remove(name)
            .ok_or_else(|| AlloyError::UnknownAlloy(name.to_string()))?;

        let alloy = self.alloys.remove(i);
        for v in self.index.values_mut() {
            if *v > i {
                *v -= 1;
            }
        }
        Ok(alloy)
    }

    pub fn clear(&mut self)
    {
        self.alloys.clear();
        self.index.clear();
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item=&str>
    {
        self.alloys.iter().map(|a| a.name())
    }

    /// Master alloys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item=&MasterAlloy>
    {
        self.alloys.iter()
    }

    pub fn len(&self) -> usize
    {
        self.alloys.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.alloys.is_empty()
    }

    /// Looks up candidates of a request.
    ///
    /// Returns the master alloys in the given order,
    /// [`AlloyError::UnknownAlloy`] for an unregistered name
    /// or [`AlloyError::DuplicateCandidate`] for a name given twice.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&MasterAlloy>>
    {
        let mut out: Vec<&MasterAlloy> = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            let alloy = self.get(name)
                .ok_or_else(|| AlloyError::UnknownAlloy(name.to_string()))?;

            if out.iter().any(|a| a.name() == name) {
                return Err(AlloyError::DuplicateCandidate(name.to_string()));
            }
            out.push(alloy);
        }

        Ok(out)
    }
}
