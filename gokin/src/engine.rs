use std::collections::BTreeMap;
use gokin_core::solver::Status;
use crate::problem::AdditionProblem;
use crate::{
    AdditionPlan, AlloyError, AlloyRegistry, Balance, EngineConfig, Failure, InitialComposition,
    MasterAlloy, Mixture, Objective, OptimizationResult, Result, SolveStatus, TargetSpec,
};

/// One optimization request.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionRequest
{
    pub initial: InitialComposition,
    pub target: TargetSpec,
    /// Registered master alloy names that may be added.
    pub candidates: Vec<String>,
    /// Upper bound in kg of individual candidates.
    pub max_addition: BTreeMap<String, f64>,
    /// Upper bound in kg of the sum of additions.
    pub max_total_addition: Option<f64>,
}

impl AdditionRequest
{
    pub fn new<I, S>(initial: InitialComposition, target: TargetSpec, candidates: I) -> Self
    where I: IntoIterator<Item=S>, S: Into<String>
    {
        AdditionRequest {
            initial,
            target,
            candidates: candidates.into_iter().map(|s| s.into()).collect(),
            max_addition: BTreeMap::new(),
            max_total_addition: None,
        }
    }

    /// Caps the addition of one candidate.
    pub fn max_addition(mut self, name: impl Into<String>, cap: f64) -> Self
    {
        self.max_addition.insert(name.into(), cap);
        self
    }

    /// Caps the sum of additions.
    pub fn max_total_addition(mut self, cap: f64) -> Self
    {
        self.max_total_addition = Some(cap);
        self
    }
}

//

/// Master alloy addition optimizer
///
/// Stateless apart from its configuration; a single engine can serve requests on several threads.
#[derive(Debug, Clone, Default)]
pub struct OptimizationEngine
{
    config: EngineConfig,
}

impl OptimizationEngine
{
    /// Creates an engine.
    ///
    /// Returns [`AlloyError::InvalidConfig`] if a parameter is out of range.
    pub fn new(config: EngineConfig) -> Result<Self>
    {
        config.validate()?;

        Ok(OptimizationEngine { config })
    }

    pub fn config(&self) -> &EngineConfig
    {
        &self.config
    }

    /// Solves a request.
    ///
    /// Returns `Err` for a malformed request,
    /// otherwise [`OptimizationResult`] whose [`OptimizationResult::success`] tells if the target was met.
    pub fn solve(&self, registry: &AlloyRegistry, req: &AdditionRequest) -> Result<OptimizationResult>
    {
        let par = &self.config;

        log::info!("----- Initializing");

        let resolved = registry.resolve(&req.candidates)?;

        let weights = match par.objective {
            Objective::Mass => vec![1.; resolved.len()],
            Objective::Cost => resolved.iter()
                .map(|a| a.unit_cost().ok_or_else(|| AlloyError::MissingCost(a.name().to_string())))
                .collect::<Result<Vec<_>>>()?,
        };

        let caps = self.caps(req, &resolved)?;
        let total_cap = match req.max_total_addition {
            Some(t) if !t.is_finite() || t < 0. => {
                return Err(AlloyError::InvalidMass(format!("total addition cap {} kg", t)));
            },
            t => t,
        };

        let (initial, alloys) = Self::apply_balance(&par.balance, &req.initial, &resolved)?;
        let alloy_refs: Vec<&MasterAlloy> = alloys.iter().collect();
        let mixture = Mixture::new(&initial, &alloy_refs);

        log::info!("target {} from {} ({} kg) with {} candidates by {}, minimizing {}",
            req.target.name(), initial.name(), initial.mass(), alloys.len(), par.method, par.objective);

        let build = ResultBuilder {
            engine: self,
            req,
            alloys: &alloy_refs,
            mixture: &mixture,
            weights: &weights,
            total_cap,
        };

        let x_zero = vec![0.; alloys.len()];

        if req.target.is_satisfied_by(initial.composition(), par.tolerance) {
            log::info!("----- AlreadyWithinTarget");

            let mut r = build.result(&x_zero, SolveStatus::AlreadyWithinTarget, 0);
            r.final_composition = initial.composition().clone();
            return Ok(r);
        }

        if alloys.is_empty() {
            log::warn!("----- Infeasible: no candidates");

            return Ok(build.result(&x_zero, SolveStatus::Infeasible, 0));
        }

        let prob = AdditionProblem::new(&mixture, &req.target, weights.clone(), caps.clone(), total_cap);
        let backend = par.method.backend(par.solver_param(initial.mass()));

        log::info!("----- Started");
        let outcome = match backend.solve(&prob, &x_zero) {
            Ok(o) => o,
            Err(e) => {
                log::error!("backend {}: {}", backend.name(), e);

                let mut r = build.result(&x_zero, SolveStatus::BackendError, 0);
                r.failure = Some(Failure::Backend(e));
                r.message = format!("{} for {}", Failure::Backend(e), req.target.name());
                return Ok(r);
            },
        };

        log::debug!("{}: {} after {} iterations, objective {:.6e}, violation {:.2e}",
            backend.name(), outcome.status, outcome.iter, outcome.objective, outcome.violation);

        let mut x: Vec<f64> = outcome.x.iter().zip(&caps)
            .map(|(v, cap)| v.max(0.).min(*cap))
            .collect();

        // a penalty point may overshoot the total cap; pull it back along the ray to the origin
        if let Some(t) = total_cap {
            let sum: f64 = x.iter().sum();
            if sum > t {
                log::debug!("additions {:.6} kg exceed the total cap {:.6} kg, scaled down", sum, t);
                let s = t / sum;
                x.iter_mut().for_each(|v| *v *= s);
            }
        }

        for v in x.iter_mut() {
            if *v <= par.report_floor {
                *v = 0.;
            }
        }

        let status = match outcome.status {
            Status::ExcessIter => SolveStatus::NotConverged,
            // Converged or Infeasible: judged by re-validation
            _ => SolveStatus::Optimal,
        };

        let r = build.result(&x, status, outcome.iter);
        match r.status {
            SolveStatus::Optimal => log::info!("----- Optimal"),
            s => log::warn!("----- {}", s),
        }
        Ok(r)
    }

    fn caps(&self, req: &AdditionRequest, resolved: &[&MasterAlloy]) -> Result<Vec<f64>>
    {
        for (name, cap) in req.max_addition.iter() {
            if !resolved.iter().any(|a| a.name() == name) {
                return Err(AlloyError::UnknownAlloy(name.clone()));
            }
            if !cap.is_finite() || *cap < 0. {
                return Err(AlloyError::InvalidMass(format!("cap {} kg of {}", cap, name)));
            }
        }

        let default_cap = self.config.max_addition_ratio * req.initial.mass();

        Ok(resolved.iter()
            .map(|a| req.max_addition.get(a.name()).copied().unwrap_or(default_cap))
            .collect())
    }

    fn apply_balance(balance: &Balance, initial: &InitialComposition, resolved: &[&MasterAlloy])
    -> Result<(InitialComposition, Vec<MasterAlloy>)>
    {
        match balance {
            Balance::None => {
                Ok((initial.clone(), resolved.iter().map(|a| (*a).clone()).collect()))
            },
            Balance::Element(b) => {
                let init = initial.with_composition(initial.composition().with_balance(b)?);

                let mut alloys = Vec::with_capacity(resolved.len());
                for a in resolved {
                    let mut m = MasterAlloy::new(a.name(), a.composition().with_balance(b)?);
                    if let Some(c) = a.unit_cost() {
                        m = m.with_cost(c)?;
                    }
                    alloys.push(m);
                }
                Ok((init, alloys))
            },
        }
    }
}

//

struct ResultBuilder<'a>
{
    engine: &'a OptimizationEngine,
    req: &'a AdditionRequest,
    alloys: &'a [&'a MasterAlloy],
    mixture: &'a Mixture,
    weights: &'a [f64],
    total_cap: Option<f64>,
}

impl<'a> ResultBuilder<'a>
{
    /// Builds the result of reported masses `x`, re-validating them against the target.
    ///
    /// `status` of [`SolveStatus::Optimal`] turns into [`SolveStatus::Infeasible`] on any violation.
    fn result(&self, x: &[f64], status: SolveStatus, iterations: usize) -> OptimizationResult
    {
        let par = &self.engine.config;
        let target = &self.req.target;

        let final_composition = self.mixture.composition(x);
        let final_mass = self.mixture.total_mass(x);
        let violations = target.violations(&final_composition, par.tolerance);

        let mut plan = AdditionPlan::new();
        let mut total_cost = Some(0.);
        for (a, v) in self.alloys.iter().zip(x) {
            if *v > 0. {
                plan.add(a.name(), *v);
                total_cost = total_cost.and_then(|t| a.unit_cost().map(|c| t + c * v));
            }
        }
        let objective: f64 = self.weights.iter().zip(x).map(|(w, v)| w * v).sum();

        let status = match status {
            SolveStatus::Optimal if !violations.is_empty() => SolveStatus::Infeasible,
            s => s,
        };

        let failure = match status {
            SolveStatus::Infeasible => Some(Failure::InfeasibleTarget { violations: violations.clone() }),
            SolveStatus::NotConverged => Some(Failure::NonConvergence { iterations }),
            _ => None,
        };

        let message = match (&status, &failure) {
            (SolveStatus::AlreadyWithinTarget, _) => {
                format!("{} already meets {}; nothing to add", self.req.initial.name(), target.name())
            },
            (SolveStatus::Optimal, _) => {
                format!("{} met by adding {:.4} kg in {} additions (objective {:.4})",
                    target.name(), plan.total(), plan.len(), objective)
            },
            (SolveStatus::Infeasible, Some(f)) if self.at_total_cap(&plan) => {
                format!("{} for {} by {}; total addition held at its cap of {:.4} kg",
                    f, target.name(), par.method, plan.total())
            },
            (_, Some(f)) => {
                format!("{} for {} by {}", f, target.name(), par.method)
            },
            (_, None) => String::new(),
        };

        OptimizationResult {
            success: status.is_success(),
            status,
            target: target.name().to_string(),
            method: par.method,
            added_mass: plan.total(),
            plan,
            final_composition,
            final_mass,
            total_cost,
            objective,
            iterations,
            violations,
            failure,
            message,
        }
    }

    fn at_total_cap(&self, plan: &AdditionPlan) -> bool
    {
        match self.total_cap {
            Some(t) => t > 0. && plan.total() >= t - self.engine.config.tolerance * self.req.initial.mass(),
            None => false,
        }
    }
}
