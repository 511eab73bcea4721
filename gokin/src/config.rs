use std::str::FromStr;
use serde::{Deserialize, Serialize};
use gokin_core::solver::{Backend, SolverParam};
use gokin_core::{BackendAugLag, BackendSLP};
use crate::{AlloyError, Element, Result};

/// Nonlinear programming method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Method
{
    /// Sequential linear programming, see [`gokin_core::BackendSLP`].
    #[default]
    Slp,
    /// Augmented Lagrangian, see [`gokin_core::BackendAugLag`].
    AugLag,
}

impl Method
{
    pub fn name(&self) -> &'static str
    {
        match self {
            Method::Slp => "slp",
            Method::AugLag => "auglag",
        }
    }

    /// Creates the backend of this method.
    pub fn backend(&self, par: SolverParam<f64>) -> Box<dyn Backend<f64> + Send + Sync>
    {
        match self {
            Method::Slp => Box::new(BackendSLP::new().par(|p| *p = par)),
            Method::AugLag => Box::new(BackendAugLag::new().par(|p| *p = par)),
        }
    }
}

impl FromStr for Method
{
    type Err = AlloyError;

    /// Case-insensitive `"slp"` or `"auglag"`.
    fn from_str(s: &str) -> Result<Self>
    {
        match s.trim().to_ascii_lowercase().as_str() {
            "slp" => Ok(Method::Slp),
            "auglag" => Ok(Method::AugLag),
            _ => Err(AlloyError::UnknownMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for Method
{
    type Error = AlloyError;

    fn try_from(s: String) -> Result<Self>
    {
        s.parse()
    }
}

impl From<Method> for String
{
    fn from(m: Method) -> Self
    {
        m.name().to_string()
    }
}

impl core::fmt::Display for Method
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{}", self.name())
    }
}

//

/// What the plan minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective
{
    /// Total added mass.
    #[default]
    Mass,
    /// Total cost of additions. Every candidate needs a unit cost.
    Cost,
}

impl FromStr for Objective
{
    type Err = AlloyError;

    fn from_str(s: &str) -> Result<Self>
    {
        match s.trim().to_ascii_lowercase().as_str() {
            "mass" => Ok(Objective::Mass),
            "cost" => Ok(Objective::Cost),
            _ => Err(AlloyError::InvalidConfig(format!("unknown objective {}", s))),
        }
    }
}

impl core::fmt::Display for Objective
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{}", match self {
            Objective::Mass => "mass",
            Objective::Cost => "cost",
        })
    }
}

//

/// Treatment of the element that makes up the rest of each material.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Element>", into = "Option<Element>")]
pub enum Balance
{
    /// Fractions are used as given; unlisted elements are zero.
    #[default]
    None,
    /// The element absorbs one minus the sum of the others in the melt and in every candidate.
    Element(Element),
}

impl From<Option<Element>> for Balance
{
    fn from(e: Option<Element>) -> Self
    {
        match e {
            Some(e) => Balance::Element(e),
            None => Balance::None,
        }
    }
}

impl From<Balance> for Option<Element>
{
    fn from(b: Balance) -> Self
    {
        match b {
            Balance::Element(e) => Some(e),
            Balance::None => None,
        }
    }
}

//

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig
{
    pub method: Method,
    pub objective: Objective,
    pub balance: Balance,
    /// Absolute tolerance of final fractions against the target.
    pub tolerance: f64,
    /// Additions at or below this mass in kg are left out of the plan.
    pub report_floor: f64,
    /// Cap of each addition, as a multiple of the melt mass, unless the request gives one.
    pub max_addition_ratio: f64,
    /// Max iteration number of the backend. `None` means no upper limit.
    pub max_iter: Option<usize>,
    /// Optimality tolerance of the backend.
    pub eps_acc: f64,
    /// Constraint tolerance of the backend in fraction units. `None` means `tolerance / 100`.
    pub eps_feas: Option<f64>,
    /// Period of iterations to output progress log(for debug/trace level).
    pub log_period: usize,
}

impl Default for EngineConfig
{
    fn default() -> Self
    {
        EngineConfig {
            method: Method::default(),
            objective: Objective::default(),
            balance: Balance::default(),
            tolerance: 1e-6,
            report_floor: 1e-6,
            max_addition_ratio: 10.,
            max_iter: Some(20_000),
            eps_acc: 1e-9,
            eps_feas: None,
            log_period: 100,
        }
    }
}

impl EngineConfig
{
    /// Changes parameters.
    ///
    /// Returns [`EngineConfig`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut EngineConfig)
    {
        f(&mut self);
        self
    }

    /// Checks ranges of the numeric parameters.
    pub fn validate(&self) -> Result<()>
    {
        let nonneg = |v: f64| v.is_finite() && v >= 0.;
        let pos = |v: f64| v.is_finite() && v > 0.;

        if !nonneg(self.tolerance) {
            return Err(AlloyError::InvalidConfig(format!("tolerance {}", self.tolerance)));
        }
        if !nonneg(self.report_floor) {
            return Err(AlloyError::InvalidConfig(format!("report_floor {}", self.report_floor)));
        }
        if !pos(self.max_addition_ratio) {
            return Err(AlloyError::InvalidConfig(format!("max_addition_ratio {}", self.max_addition_ratio)));
        }
        if !pos(self.eps_acc) {
            return Err(AlloyError::InvalidConfig(format!("eps_acc {}", self.eps_acc)));
        }
        if let Some(v) = self.eps_feas {
            if !pos(v) {
                return Err(AlloyError::InvalidConfig(format!("eps_feas {}", v)));
            }
        }
        Ok(())
    }

    /// Backend parameters for a melt of `scale` kg.
    pub fn solver_param(&self, scale: f64) -> SolverParam<f64>
    {
        let eps_feas = self.eps_feas.unwrap_or(self.tolerance * 1e-2);

        SolverParam {
            max_iter: self.max_iter,
            eps_acc: self.eps_acc,
            eps_feas: (eps_feas * scale).max(f64::MIN_POSITIVE),
            log_period: self.log_period,
            radius_init: 1e-2 * scale,
            ..SolverParam::default()
        }
    }
}

//

/// Reads a value from an environment variable, logging what is taken.
pub fn num_by_env<N: FromStr + core::fmt::Display>(e: &str) -> Option<N>
{
    if let Some(v) = std::env::var(e).ok()
                     .and_then(|s| {s.trim().parse::<N>().ok()}) {
        log::info!("{}: {}", e, v);
        Some(v)
    }
    else {
        None
    }
}

/// Overrides parameters by `GOKIN_*` environment variables.
///
/// `GOKIN_MAX_ITER`, `GOKIN_EPS_ACC`, `GOKIN_EPS_FEAS`, `GOKIN_TOLERANCE`, `GOKIN_METHOD` and `GOKIN_LOG_PERIOD`
/// are read; unset or unparsable ones leave the parameter as it is.
pub fn set_par_by_env(p: &mut EngineConfig)
{
    p.max_iter = num_by_env("GOKIN_MAX_ITER").or(p.max_iter);
    p.eps_acc = num_by_env("GOKIN_EPS_ACC").unwrap_or(p.eps_acc);
    p.eps_feas = num_by_env("GOKIN_EPS_FEAS").or(p.eps_feas);
    p.tolerance = num_by_env("GOKIN_TOLERANCE").unwrap_or(p.tolerance);
    p.method = num_by_env("GOKIN_METHOD").unwrap_or(p.method);
    p.log_period = num_by_env("GOKIN_LOG_PERIOD").unwrap_or(p.log_period);
}
