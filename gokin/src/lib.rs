/*!
Master alloy addition optimizer.

Given a melt of known composition and mass, a target window per element
and a set of master alloys, `gokin` finds how much of each master alloy to add
so that the mixture lands within the window, minimizing the added mass or its cost.

The fraction of each element after adding masses \\(x\\) is a ratio of linear functions of \\(x\\),
so the problem is a small nonlinear program solved by a [`gokin_core`] backend
selected through [`EngineConfig::method`].

# Examples

```
use gokin::prelude::*;

let mut registry = AlloyRegistry::new();
let catalog = Catalog::builtin();
for name in ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"] {
    registry.register(catalog.master_alloy(name).unwrap()).unwrap();
}

let initial = presets::initial("2ORD", 100.).unwrap();
let target = presets::target("LM2").unwrap();
let req = AdditionRequest::new(initial, target, ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"]);

let engine = OptimizationEngine::new(EngineConfig::default()).unwrap();
let rslt = engine.solve(&registry, &req).unwrap();

assert!(rslt.success());
assert!((rslt.plan().mass("Si-Al 99%") - 6.335).abs() < 1e-2);
assert!((rslt.final_mass() - 106.44).abs() < 1e-2);
```
*/

mod error;

pub use error::*;

//

mod composition;
mod alloy;
mod catalog;
mod target;
mod mixture;

pub use composition::*;
pub use alloy::*;
pub use catalog::*;
pub use target::*;
pub use mixture::*;

//

mod config;
mod problem;
mod result;
mod engine;

pub use config::*;
pub use result::*;
pub use engine::*;

//

pub mod analysis;
pub mod batch;
pub mod presets;

//

/// Prelude
pub mod prelude
{
    pub use crate::{
        AdditionPlan, AdditionRequest, AlloyError, AlloyRegistry, Balance, Bound, Catalog, Composition,
        Element, EngineConfig, Failure, InitialComposition, MasterAlloy, Method, Objective,
        OptimizationEngine, OptimizationResult, SolveStatus, TargetSpec,
    };
    pub use crate::{analysis, batch, presets};
}
