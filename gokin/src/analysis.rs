//! Pre-solve diagnosis of a request.

use serde::Serialize;
use crate::{Element, InitialComposition, MasterAlloy, TargetSpec};

/// Element below its lower bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deficit
{
    pub element: Element,
    pub current: f64,
    pub minimum: f64,
    pub deficit: f64,
    /// Candidates containing the element, richest first.
    pub sources: Vec<Source>,
}

/// Element above its upper bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Excess
{
    pub element: Element,
    pub current: f64,
    pub maximum: f64,
    pub excess: f64,
}

/// Candidate that can raise an element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source
{
    pub name: String,
    pub content: f64,
    pub unit_cost: Option<f64>,
}

/// Result of [`analyze`]. Fractions are in `[0, 1]`, masses in kg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis
{
    pub increase: Vec<Deficit>,
    pub decrease: Vec<Excess>,
    pub issues: Vec<String>,
    /// Sum over deficient elements of the least addition of their richest source, ignoring dilution.
    pub estimated_min_addition: f64,
}

impl Analysis
{
    /// No deficit, no excess.
    pub fn within_target(&self) -> bool
    {
        self.increase.is_empty() && self.decrease.is_empty()
    }
}

/// Compares the melt with the target and lists what the candidates can do about each gap.
pub fn analyze(initial: &InitialComposition, target: &TargetSpec, candidates: &[&MasterAlloy]) -> Analysis
{
    let comp = initial.composition();
    let mass = initial.mass();

    let mut increase = Vec::new();
    let mut decrease = Vec::new();
    let mut issues = Vec::new();
    let mut estimated_min_addition = 0.;

    for (e, b) in target.iter() {
        let current = comp.fraction(e.as_str());

        if current < b.lower {
            let mut sources: Vec<Source> = candidates.iter()
                .filter(|a| a.composition().fraction(e.as_str()) > 0.)
                .map(|a| Source {
                    name: a.name().to_string(),
                    content: a.composition().fraction(e.as_str()),
                    unit_cost: a.unit_cost(),
                })
                .collect();
            sources.sort_by(|p, q| q.content.total_cmp(&p.content));

            let deficit = b.lower - current;
            match sources.first() {
                Some(best) => {
                    estimated_min_addition += deficit * mass / best.content;
                },
                None => {
                    issues.push(format!("no source for {}, which needs raising from {:.2}% to at least {:.2}%",
                        e, current * 100., b.lower * 100.));
                },
            }

            increase.push(Deficit {
                element: e.clone(),
                current,
                minimum: b.lower,
                deficit,
                sources,
            });
        }
        else if current > b.upper {
            issues.push(format!("{} needs lowering from {:.2}% to at most {:.2}%, only possible by dilution",
                e, current * 100., b.upper * 100.));

            decrease.push(Excess {
                element: e.clone(),
                current,
                maximum: b.upper,
                excess: current - b.upper,
            });
        }
    }

    log::debug!("analysis: {} to raise, {} to lower, about {:.3} kg to add", increase.len(), decrease.len(), estimated_min_addition);

    Analysis {
        increase,
        decrease,
        issues,
        estimated_min_addition,
    }
}
