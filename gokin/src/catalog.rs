use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::{AlloyError, Composition, Element, MasterAlloy, Result};

/// Catalog record of a master alloy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry
{
    pub composition: Composition,
    pub unit_cost: Option<f64>,
}

/// Lookup table from master alloy names to compositions and costs.
///
/// Names missing from the table still resolve when they follow the naming convention
/// (see [`parse_alloy_name`]).
#[derive(Debug, Clone, Default)]
pub struct Catalog
{
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog
{
    /// Creates an empty catalog.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Creates a catalog of common aluminium master alloys with typical prices per kg.
    pub fn builtin() -> Self
    {
        let table: &[(&str, &[(&str, f64)], f64)] = &[
            ("Si-Al 50%", &[("Si", 50.), ("Al", 50.)], 3.0),
            ("Cu-Al 50%", &[("Cu", 50.), ("Al", 50.)], 5.0),
            ("Mg-Al 50%", &[("Mg", 50.), ("Al", 50.)], 4.5),
            ("Mn-Al 25%", &[("Mn", 25.), ("Al", 75.)], 3.8),
            ("Pure Al",   &[("Al", 100.)],             2.2),
        ];

        let mut cat = Catalog::new();
        for (name, percents, cost) in table {
            let entry = CatalogEntry {
                composition: Composition::from_fractions(
                    percents.iter().map(|(e, p)| (Element::from(*e), p / 100.)).collect()
                ),
                unit_cost: Some(*cost),
            };
            cat.entries.insert(name.to_string(), entry);
        }
        cat
    }

    /// Adds or replaces an entry.
    ///
    /// Returns [`AlloyError::InvalidCost`] for a negative or non-finite cost.
    pub fn insert(&mut self, name: impl Into<String>, composition: Composition, unit_cost: Option<f64>) -> Result<()>
    {
        let name = name.into();

        if let Some(c) = unit_cost {
            if !c.is_finite() || c < 0. {
                return Err(AlloyError::InvalidCost(format!("{} ({})", name, c)));
            }
        }

        if self.entries.insert(name.clone(), CatalogEntry { composition, unit_cost }).is_some() {
            log::debug!("catalog entry {} replaced", name);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry>
    {
        self.entries.get(name)
    }

    /// Looks up `name`, falling back to [`parse_alloy_name`].
    pub fn resolve(&self, name: &str) -> Result<CatalogEntry>
    {
        if let Some(e) = self.entries.get(name) {
            return Ok(e.clone());
        }

        Ok(CatalogEntry {
            composition: parse_alloy_name(name)?,
            unit_cost: None,
        })
    }

    /// Builds a [`MasterAlloy`] ready to be registered.
    pub fn master_alloy(&self, name: &str) -> Result<MasterAlloy>
    {
        let entry = self.resolve(name)?;
        let alloy = MasterAlloy::new(name, entry.composition);

        match entry.unit_cost {
            Some(c) => alloy.with_cost(c),
            None => Ok(alloy),
        }
    }

    /// Entries of `other` are added, replacing those of the same name.
    pub fn merge(&mut self, other: Catalog)
    {
        self.entries.extend(other.entries);
    }

    pub fn names(&self) -> impl Iterator<Item=&str>
    {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// Parses a catalog in TOML.
    ///
    /// ```
    /// let cat = gokin::Catalog::from_toml_str(r#"
    ///     [alloys."Ti-Al 10%"]
    ///     composition = { Ti = 10.0, Al = 90.0 }
    ///     cost = 7.5
    /// "#).unwrap();
    ///
    /// assert_eq!(cat.get("Ti-Al 10%").unwrap().unit_cost, Some(7.5));
    /// ```
    ///
    /// Compositions are in wt%. Returns [`AlloyError::Catalog`] for malformed input.
    pub fn from_toml_str(s: &str) -> Result<Self>
    {
        let file: CatalogFile = toml::from_str(s)
            .map_err(|e| AlloyError::Catalog(e.to_string()))?;

        let mut cat = Catalog::new();
        for (name, e) in file.alloys {
            let comp = Composition::from_percent(e.composition)
                .map_err(|err| AlloyError::Catalog(format!("{}: {}", name, err)))?;
            cat.insert(name, comp, e.cost)?;
        }
        Ok(cat)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile
{
    #[serde(default)]
    alloys: BTreeMap<String, CatalogFileEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFileEntry
{
    composition: BTreeMap<String, f64>,
    cost: Option<f64>,
}

//

/// Composition from a master alloy name.
///
/// * `"A-B p%"` is `p` wt% of `A` balanced by `B`, e.g. `"Si-Al 99%"` or `"Cu-Al 100%"`.
/// * `"Pure X"` is element `X` alone.
///
/// Returns [`AlloyError::InvalidAlloyName`] for anything else.
pub fn parse_alloy_name(name: &str) -> Result<Composition>
{
    let invalid = |reason: &str| AlloyError::InvalidAlloyName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = name.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(invalid("expected two space-separated parts"));
    }

    if parts[0] == "Pure" {
        if !is_symbol(parts[1]) {
            return Err(invalid("not an element symbol"));
        }
        return Composition::new([(parts[1], 1.)]).map_err(|e| invalid(&e.to_string()));
    }

    let pct = parts[1].strip_suffix('%')
        .ok_or_else(|| invalid("missing %"))?;
    let pct: f64 = pct.parse()
        .map_err(|_| invalid("percentage is not a number"))?;
    if !(0. ..= 100.).contains(&pct) {
        return Err(invalid("percentage must be within [0, 100]"));
    }

    let elems: Vec<&str> = parts[0].split('-').collect();
    if elems.len() < 2 {
        return Err(invalid("expected at least two elements"));
    }
    if elems.len() > 2 {
        return Err(invalid("only the first element can be given a percentage"));
    }
    if !elems.iter().all(|e| is_symbol(e)) {
        return Err(invalid("not an element symbol"));
    }

    Composition::from_percent([(elems[0], pct), (elems[1], 100. - pct)])
        .map_err(|e| invalid(&e.to_string()))
}

fn is_symbol(s: &str) -> bool
{
    let mut c = s.chars();
    match c.next() {
        Some(h) if h.is_ascii_uppercase() => c.all(|t| t.is_ascii_lowercase()) && s.len() <= 3,
        _ => false,
    }
}

//

#[test]
fn test_parse_alloy_name1()
{
    use float_eq::assert_float_eq;

    let c = parse_alloy_name("Si-Al 99%").unwrap();
    assert_float_eq!(c.fraction("Si"), 0.99, abs <= 1e-12);
    assert_float_eq!(c.fraction("Al"), 0.01, abs <= 1e-12);

    let c = parse_alloy_name("Cu-Al 100%").unwrap();
    assert_float_eq!(c.fraction("Cu"), 1., abs <= 1e-12);
    assert!(c.contains("Al"));

    let c = parse_alloy_name("Pure Mg").unwrap();
    assert_float_eq!(c.fraction("Mg"), 1., abs <= 1e-12);

    for bad in ["Si-Al", "Si-Al 99", "Si 50%", "Si-Al 120%", "Si-Al -5%", "Si-Al x%", "Si-Al-Cu 50%", "Al-Al 50%", "Pure al", "Si-Al  99% extra"] {
        match parse_alloy_name(bad) {
            Err(AlloyError::InvalidAlloyName { .. }) => {},
            other => panic!("{}: {:?}", bad, other),
        }
    }
}
