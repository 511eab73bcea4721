use thiserror::Error;

/// Errors raised while building an optimization request.
///
/// Solve-time non-success is not an error; see [`crate::Failure`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlloyError
{
    #[error("invalid composition: {0}")]
    InvalidComposition(String),
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("invalid mass: {0}")]
    InvalidMass(String),
    #[error("master alloy already registered: {0}")]
    DuplicateAlloy(String),
    #[error("master alloy named twice in candidates: {0}")]
    DuplicateCandidate(String),
    #[error("unknown master alloy: {0}")]
    UnknownAlloy(String),
    #[error("invalid master alloy name {name:?}: {reason}")]
    InvalidAlloyName { name: String, reason: String },
    #[error("invalid unit cost of master alloy {0}")]
    InvalidCost(String),
    #[error("no unit cost for master alloy {0}; required by the cost objective")]
    MissingCost(String),
    #[error("unknown solver method: {0} (expected slp or auglag)")]
    UnknownMethod(String),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("catalog: {0}")]
    Catalog(String),
}

/// Result alias of this crate.
pub type Result<T> = std::result::Result<T, AlloyError>;
