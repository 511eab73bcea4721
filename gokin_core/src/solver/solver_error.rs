/// Solver errors.
///
/// Convergence failures are not errors; they are reported by [`crate::solver::Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverError
{
    /// Sizes of the problem and the initial point are inconsistent.
    InvalidProblem,
    /// Objective, constraints or their derivatives evaluated to a non-finite value.
    NonFinite,
    /// Linear subproblem found an unbounded direction.
    LpUnbounded,
    /// Linear subproblem exceeded its pivot limit.
    LpExcessIter,
}

impl core::fmt::Display for SolverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            SolverError::InvalidProblem => "InvalidProblem: inconsistent problem size",
            SolverError::NonFinite      => "NonFinite: evaluation produced a non-finite value",
            SolverError::LpUnbounded    => "LpUnbounded: linear subproblem is unbounded",
            SolverError::LpExcessIter   => "LpExcessIter: linear subproblem exceeded max pivots",
        })
    }
}

impl std::error::Error for SolverError {}
