//! Several targets against one melt, solved in parallel.

use rayon::prelude::*;
use crate::{AdditionRequest, AlloyRegistry, OptimizationEngine, OptimizationResult, Result};

/// Solves every request on the rayon thread pool.
///
/// Returns results in the order of `requests`; each entry fails or succeeds on its own.
pub fn solve_all(engine: &OptimizationEngine, registry: &AlloyRegistry, requests: &[AdditionRequest])
-> Vec<Result<OptimizationResult>>
{
    log::debug!("batch of {} requests", requests.len());

    requests.par_iter()
        .map(|req| engine.solve(registry, req))
        .collect()
}

/// Solves one request per target with the same melt, candidates and caps as `base`.
pub fn solve_targets(engine: &OptimizationEngine, registry: &AlloyRegistry, base: &AdditionRequest, targets: &[crate::TargetSpec])
-> Vec<Result<OptimizationResult>>
{
    let requests: Vec<AdditionRequest> = targets.iter()
        .map(|t| AdditionRequest {
            target: t.clone(),
            ..base.clone()
        })
        .collect();

    solve_all(engine, registry, &requests)
}
