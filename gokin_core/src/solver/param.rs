use num_traits::Float;

/// Solver parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverParam<F: Float>
{
    /// Max iteration number. `None` means no upper limit.
    pub max_iter: Option<usize>,
    /// Tolerance of the optimality measure (model decrease or projected gradient).
    pub eps_acc: F,
    /// Tolerance of the largest constraint violation.
    pub eps_feas: F,
    /// Tolerance of small positive value to avoid division by zero.
    pub eps_zero: F,
    /// Period of iterations to output progress log(for debug/trace level).
    pub log_period: usize,
    /// Initial weight of the constraint penalty.
    pub penalty_init: F,
    /// Upper limit of the constraint penalty weight.
    pub penalty_max: F,
    /// Initial trust region radius in the max-norm. Used by [`crate::BackendSLP`].
    pub radius_init: F,
}

impl<F: Float> Default for SolverParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        SolverParam {
            max_iter: None,
            eps_acc: ten.powi(-9),
            eps_feas: ten.powi(-8),
            eps_zero: ten.powi(-12),
            log_period: 100,
            penalty_init: ten,
            penalty_max: ten.powi(6),
            radius_init: F::one(),
        }
    }
}
