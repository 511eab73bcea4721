use std::collections::BTreeMap;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use gokin::prelude::*;

/// Request file
///
/// ```toml
/// candidates = ["Cu-Al 100%", "Si-Al 99%"]
/// targets = ["LM2", { name = "mine", bounds = { Si = [9.0, 10.0] } }]
///
/// [initial]
/// preset = "2ORD"
/// mass = 100.0
///
/// [max_addition]
/// "Si-Al 99%" = 20.0
///
/// [engine]
/// method = "slp"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestFile
{
    pub initial: Option<InitialSection>,
    pub targets: Vec<TargetSection>,
    pub candidates: Vec<String>,
    pub max_addition: BTreeMap<String, f64>,
    pub max_total_addition: Option<f64>,
    pub engine: Option<EngineConfig>,
}

/// Melt given by a preset name or by wt%.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitialSection
{
    pub name: Option<String>,
    pub preset: Option<String>,
    pub composition: Option<BTreeMap<String, f64>>,
    pub mass: f64,
}

/// Target given by a preset name or by wt% windows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TargetSection
{
    Preset(String),
    Custom {
        name: String,
        bounds: BTreeMap<String, (f64, f64)>,
    },
}

impl RequestFile
{
    pub fn from_toml_str(s: &str) -> Result<Self>
    {
        let req = toml::from_str(s)?;
        Ok(req)
    }

    pub fn load(path: &std::path::Path) -> Result<Self>
    {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;

        Self::from_toml_str(&s)
            .with_context(|| format!("parsing {}", path.display()))
    }
}

impl InitialSection
{
    pub fn build(&self) -> Result<InitialComposition>
    {
        match (&self.preset, &self.composition) {
            (Some(p), None) => {
                let comp = presets::composition(p)?;
                let name = self.name.clone().unwrap_or_else(|| p.to_ascii_uppercase());
                Ok(InitialComposition::new(name, comp, self.mass)?)
            },
            (None, Some(c)) => {
                let comp = Composition::from_percent(c.iter().map(|(e, v)| (e.as_str(), *v)))?;
                let name = self.name.clone().unwrap_or_else(|| "melt".to_string());
                Ok(InitialComposition::new(name, comp, self.mass)?)
            },
            (Some(_), Some(_)) => bail!("initial melt has both preset and composition"),
            (None, None) => bail!("initial melt needs a preset or a composition"),
        }
    }
}

impl TargetSection
{
    pub fn build(&self) -> Result<TargetSpec>
    {
        match self {
            TargetSection::Preset(p) => Ok(presets::target(p)?),
            TargetSection::Custom { name, bounds } => {
                let t = TargetSpec::from_percent(name.as_str(), bounds.iter().map(|(e, w)| (e.as_str(), *w)))
                    .with_context(|| format!("target {}", name))?;
                Ok(t)
            },
        }
    }
}

//

#[test]
fn test_request_file1()
{
    use float_eq::assert_float_eq;

    let req = RequestFile::from_toml_str(r#"
        candidates = ["Cu-Al 100%", "Si-Al 99%"]
        targets = ["lm2", { name = "mine", bounds = { Si = [9.0, 10.0], Fe = [0.0, 0.8] } }]
        max_total_addition = 12.5

        [initial]
        preset = "2ord"
        mass = 250.0

        [max_addition]
        "Si-Al 99%" = 20.0

        [engine]
        method = "auglag"
    "#).unwrap();

    assert_eq!(req.candidates, ["Cu-Al 100%", "Si-Al 99%"]);
    assert_eq!(req.max_total_addition, Some(12.5));
    assert_eq!(req.max_addition.get("Si-Al 99%"), Some(&20.));
    assert_eq!(req.engine.as_ref().unwrap().method, Method::AugLag);

    let initial = req.initial.as_ref().unwrap().build().unwrap();
    assert_eq!(initial.name(), "2ORD");
    assert_float_eq!(initial.mass(), 250., abs <= 1e-12);

    let targets: Vec<TargetSpec> = req.targets.iter().map(|t| t.build().unwrap()).collect();
    assert_eq!(targets[0].name(), "LM2");
    assert_eq!(targets[1].name(), "mine");
    assert_float_eq!(targets[1].bound("Fe").unwrap().upper, 0.008, abs <= 1e-12);
}

#[test]
fn test_request_file2()
{
    let req = RequestFile::from_toml_str(r#"
        [initial]
        name = "scrap"
        composition = { Al = 97.0, Si = 3.0 }
        mass = 40.0
    "#).unwrap();

    let initial = req.initial.as_ref().unwrap().build().unwrap();
    assert_eq!(initial.name(), "scrap");
    assert!(req.targets.is_empty());
    assert!(req.engine.is_none());

    let empty = RequestFile::from_toml_str("").unwrap();
    assert!(empty.initial.is_none());

    assert!(RequestFile::from_toml_str("candidate = []").is_err());
    assert!(RequestFile::from_toml_str("[initial]\nmass = 1.0\n").unwrap()
        .initial.unwrap().build().is_err());
    assert!(RequestFile::from_toml_str("[initial]\npreset = \"2ORD\"\nmass = -1.0\n").unwrap()
        .initial.unwrap().build().is_err());
    assert!(RequestFile::from_toml_str("targets = [{ name = \"t\", bounds = { Si = [3.0, 2.0] } }]").unwrap()
        .targets[0].build().is_err());
    assert!(RequestFile::from_toml_str("targets = [\"nope\"]").unwrap()
        .targets[0].build().is_err());
}
