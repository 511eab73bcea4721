use num_traits::Float;
use super::{Outcome, Problem, SolverError};

/// Solver backend trait.
///
/// Every backend solves the same [`Problem`] contract,
/// so a caller can select one at run time by `Box<dyn Backend<F>>`.
pub trait Backend<F: Float>
{
    /// Short name of the method, such as `"slp"`.
    fn name(&self) -> &'static str;

    /// Starts to solve a nonlinear program.
    ///
    /// Returns `Ok` with the final iterate and its [`crate::solver::Status`],
    /// or `Err` with [`SolverError`] when the problem cannot be evaluated.
    /// * `prob` is the problem to solve.
    /// * `x0` is an initial point of length \\(n\\). It is projected onto the bounds before use.
    fn solve(&self, prob: &dyn Problem<F>, x0: &[F]) -> Result<Outcome<F>, SolverError>;
}
