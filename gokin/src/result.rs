use std::collections::BTreeMap;
use serde::{Serialize, Serializer};
use gokin_core::solver::SolverError;
use crate::{Composition, Method, Violation};

/// Master alloy name to added mass in kg.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct AdditionPlan
{
    additions: BTreeMap<String, f64>,
}

impl AdditionPlan
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Adds `mass` kg of `name`, accumulating on an existing entry.
    pub fn add(&mut self, name: impl Into<String>, mass: f64)
    {
        *self.additions.entry(name.into()).or_insert(0.) += mass;
    }

    /// Builder pattern of [`AdditionPlan::add`].
    pub fn with(mut self, name: impl Into<String>, mass: f64) -> Self
    {
        self.add(name, mass);
        self
    }

    /// Added mass of `name`, zero if absent.
    pub fn mass(&self, name: &str) -> f64
    {
        self.additions.get(name).copied().unwrap_or(0.)
    }

    pub fn contains(&self, name: &str) -> bool
    {
        self.additions.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str, f64)>
    {
        self.additions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize
    {
        self.additions.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.additions.is_empty()
    }

    /// Returns the sum of added masses.
    pub fn total(&self) -> f64
    {
        self.additions.values().sum()
    }
}

//

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus
{
    /// The melt already met the target; nothing to add.
    AlreadyWithinTarget,
    /// The backend converged and the plan meets the target.
    Optimal,
    /// No plan within the caps meets the target.
    Infeasible,
    /// The backend ran out of iterations.
    NotConverged,
    /// The backend could not evaluate the problem.
    BackendError,
}

impl SolveStatus
{
    pub fn is_success(&self) -> bool
    {
        matches!(self, SolveStatus::AlreadyWithinTarget | SolveStatus::Optimal)
    }
}

impl core::fmt::Display for SolveStatus
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        write!(f, "{}", match self {
            SolveStatus::AlreadyWithinTarget => "AlreadyWithinTarget",
            SolveStatus::Optimal             => "Optimal",
            SolveStatus::Infeasible          => "Infeasible",
            SolveStatus::NotConverged        => "NotConverged",
            SolveStatus::BackendError        => "BackendError",
        })
    }
}

/// Reason of an unsuccessful solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Failure
{
    /// Element bounds still missed by the best plan found.
    InfeasibleTarget { violations: Vec<Violation> },
    /// Iteration budget exhausted.
    NonConvergence { iterations: usize },
    /// Backend error such as a non-finite evaluation.
    Backend(#[serde(serialize_with = "serialize_display")] SolverError),
}

fn serialize_display<S: Serializer, T: core::fmt::Display>(v: &T, s: S) -> Result<S::Ok, S::Error>
{
    s.collect_str(v)
}

impl core::fmt::Display for Failure
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result
    {
        match self {
            Failure::InfeasibleTarget { violations } => {
                write!(f, "target unreachable:")?;
                for (i, v) in violations.iter().enumerate() {
                    write!(f, "{} {}", if i == 0 { "" } else { ";" }, v)?;
                }
                Ok(())
            },
            Failure::NonConvergence { iterations } => {
                write!(f, "no convergence within {} iterations", iterations)
            },
            Failure::Backend(e) => {
                write!(f, "backend failed: {}", e)
            },
        }
    }
}

//

/// Outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult
{
    pub(crate) success: bool,
    pub(crate) status: SolveStatus,
    pub(crate) target: String,
    pub(crate) method: Method,
    pub(crate) plan: AdditionPlan,
    pub(crate) final_composition: Composition,
    pub(crate) final_mass: f64,
    pub(crate) added_mass: f64,
    pub(crate) total_cost: Option<f64>,
    pub(crate) objective: f64,
    pub(crate) iterations: usize,
    pub(crate) violations: Vec<Violation>,
    pub(crate) failure: Option<Failure>,
    pub(crate) message: String,
}

impl OptimizationResult
{
    /// `true` if the plan brings the melt within the target.
    pub fn success(&self) -> bool
    {
        self.success
    }

    pub fn status(&self) -> SolveStatus
    {
        self.status
    }

    /// Name of the target.
    pub fn target(&self) -> &str
    {
        &self.target
    }

    pub fn method(&self) -> Method
    {
        self.method
    }

    pub fn plan(&self) -> &AdditionPlan
    {
        &self.plan
    }

    pub fn final_composition(&self) -> &Composition
    {
        &self.final_composition
    }

    /// Melt mass plus added mass in kg.
    pub fn final_mass(&self) -> f64
    {
        self.final_mass
    }

    pub fn added_mass(&self) -> f64
    {
        self.added_mass
    }

    /// Cost of the plan. `None` if a planned alloy has no unit cost.
    pub fn total_cost(&self) -> Option<f64>
    {
        self.total_cost
    }

    /// Objective value of the plan, mass or cost.
    pub fn objective(&self) -> f64
    {
        self.objective
    }

    /// Backend iterations; zero when the backend was not invoked.
    pub fn iterations(&self) -> usize
    {
        self.iterations
    }

    /// Bounds missed by the final composition beyond tolerance.
    pub fn violations(&self) -> &[Violation]
    {
        &self.violations
    }

    pub fn failure(&self) -> Option<&Failure>
    {
        self.failure.as_ref()
    }

    pub fn message(&self) -> &str
    {
        &self.message
    }
}
