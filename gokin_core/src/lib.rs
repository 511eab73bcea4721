/*!
Nonlinear programming layer of `gokin`.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate solves small dense problems of the form
\\[
\begin{array}{ll}
{\rm minimize} & f(x) \\\\
{\rm subject \ to} & c_j(x) \ge 0 \quad (j = 0, \ldots, m - 1) \\\\
& l \le x \le u,
\end{array}
\\]
where \\(f\\) and \\(c_j\\) are continuously differentiable.

# General usage

1. Express the problem by implementing [`solver::Problem`].
1. Choose a [`solver::Backend`] implementation:
   * [`BackendSLP`] - trust-region sequential linear programming on an exact penalty function,
     each subproblem solved by the dense [`Simplex`].
   * [`BackendAugLag`] - augmented Lagrangian with a projected-gradient inner solver.
1. Optionally set parameters by [`BackendSLP::par`] or [`BackendAugLag::par`].
1. Invoke [`solver::Backend::solve`] and inspect the resulting [`solver::Outcome`].

# Examples

```
use gokin_core::prelude::*;
use gokin_core::{BackendSLP, MatBuild};

// minimize x0 + x1 subject to x0 * x1 - 1 >= 0, x0 - 2 x1 >= 0, 0 <= x <= 10
struct Hyperbola;

impl Problem<f64> for Hyperbola
{
    fn size(&self) -> (usize, usize) { (2, 2) }
    fn bound(&self, _i: usize) -> (f64, f64) { (0., 10.) }
    fn objective(&self, x: &[f64]) -> f64 { x[0] + x[1] }
    fn objective_grad(&self, _x: &[f64], g: &mut [f64]) { g.fill(1.); }
    fn constraints(&self, x: &[f64], c: &mut [f64])
    {
        c[0] = x[0] * x[1] - 1.;
        c[1] = x[0] - 2. * x[1];
    }
    fn constraints_jac(&self, x: &[f64], jac: &mut MatBuild<f64>)
    {
        jac[(0, 0)] = x[1];
        jac[(0, 1)] = x[0];
        jac[(1, 0)] = 1.;
        jac[(1, 1)] = -2.;
    }
}

let s = BackendSLP::new().par(|p| {
    p.max_iter = Some(1_000);
});
let rslt = s.solve(&Hyperbola, &[3., 1.]).unwrap();

assert_eq!(rslt.status, Status::Converged);
assert!((rslt.x[0] - 2_f64.sqrt()).abs() < 1e-6);
```
*/

pub mod solver;

//

mod matbuild;

pub use matbuild::*;

//

mod vecop;

//

mod simplex;

pub use simplex::*;

//

mod backend_slp;
mod backend_auglag;

pub use backend_slp::*;
pub use backend_auglag::*;

//

/// Prelude
pub mod prelude
{
    pub use crate::solver::{Backend, Outcome, Problem, SolverError, SolverParam, Status};
}
