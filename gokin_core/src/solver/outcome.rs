/// Termination status of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status
{
    /// Stationary and every constraint within `eps_feas`.
    Converged,
    /// Stationary for the largest penalty weight while still violating a constraint.
    Infeasible,
    /// Exceed max iterations.
    ExcessIter,
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", match &self {
            Status::Converged  => "Converged",
            Status::Infeasible => "Infeasible",
            Status::ExcessIter => "ExcessIter",
        })
    }
}

/// Final iterate of a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<F>
{
    /// Last iterate, always within the variable bounds.
    pub x: Vec<F>,
    /// How the iteration ended.
    pub status: Status,
    /// Number of iterations spent.
    pub iter: usize,
    /// \\(f(x)\\) at the last iterate.
    pub objective: F,
    /// Largest constraint violation \\(\max_j \max(0, -c_j(x))\\) at the last iterate.
    pub violation: F,
}
