use num_traits::Float;
use core::fmt::{Debug, LowerExp};
use crate::MatBuild;
use crate::Simplex;
use crate::solver::{Backend, Outcome, Problem, SolverError, SolverParam, Status};
use crate::vecop;

/// Sequential linear programming backend
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Minimizes the exact penalty function
/// \\(\phi_\mu(x) = f(x) + \mu \sum_j \max(0, -c_j(x))\\)
/// by linearizing \\(f\\) and \\(c\\) within a max-norm trust region of radius \\(R\\):
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & \nabla f(x)^T d + \mu \sum_j t_j \\\\
/// {\rm subject \ to} & c_j(x) + \nabla c_j(x)^T d + t_j \ge 0, \quad t \ge 0 \\\\
/// & \max(l - x, -R) \le d \le \min(u - x, R).
/// \end{array}
/// \\]
/// Each subproblem is solved by [`Simplex`].
/// The penalty weight \\(\mu\\) grows tenfold whenever the iteration stalls at an infeasible point,
/// up to [`SolverParam::penalty_max`].
#[derive(Debug, Clone)]
pub struct BackendSLP<F: Float>
{
    /// Solver parameters.
    pub par: SolverParam<F>,
    /// Linear subproblem solver.
    pub lp: Simplex<F>,
}

impl<F: Float> BackendSLP<F>
{
    /// Creates an instance with default parameters.
    pub fn new() -> Self
    {
        BackendSLP {
            par: SolverParam::default(),
            lp: Simplex::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`BackendSLP`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<F: Float> Default for BackendSLP<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float + Debug + LowerExp> Backend<F> for BackendSLP<F>
{
    fn name(&self) -> &'static str
    {
        "slp"
    }

    fn solve(&self, prob: &dyn Problem<F>, x0: &[F]) -> Result<Outcome<F>, SolverError>
    {
        let (m, n) = prob.size();

        if x0.len() != n {
            log::error!("Size mismatch: x0 {}, problem ({}, {})", x0.len(), m, n);
            return Err(SolverError::InvalidProblem);
        }

        log::debug!("{:?}", self.par);

        let core = SlpCore {
            par: &self.par,
            lp: &self.lp,
            prob,
            m, n,
        };

        core.solve(x0)
    }
}

//

struct Point<F: Float>
{
    x: Vec<F>,
    f: F,
    c: Vec<F>,
}

struct SlpCore<'a, F: Float>
{
    par: &'a SolverParam<F>,
    lp: &'a Simplex<F>,
    prob: &'a dyn Problem<F>,
    m: usize,
    n: usize,
}

impl<'a, F: Float + Debug + LowerExp> SlpCore<'a, F>
{
    fn solve(&self, x0: &[F]) -> Result<Outcome<F>, SolverError>
    {
        log::info!("----- Initializing");
        let f0 = F::zero();
        let (m, n) = (self.m, self.n);

        let (lb, ub) = vecop::bounds(self.prob, n);
        let mut x = x0.to_vec();
        vecop::proj_box(&mut x, &lb, &ub);

        let mut pt = self.eval(x)?;
        let mut grad = vec![f0; n];
        let mut jac = MatBuild::new(m, n);
        self.eval_derivs(&pt.x, &mut grad, &mut jac)?;

        let mut mu = self.par.penalty_init;
        let mut radius = self.par.radius_init;

        // Iteration
        log::info!("----- Started");
        let mut i = 0;
        loop {
            let excess_iter = if let Some(max_iter) = self.par.max_iter {
                i + 1 >= max_iter
            } else {
                false
            };

            let log_trig = if self.par.log_period > 0 {
                i % self.par.log_period == 0
            }
            else {
                if i == 0 && log::log_enabled!(log::Level::Debug) {
                    log::warn!("log_period == 0: no periodic log");
                }
                false
            };

            let viol_sum = vecop::violation_sum(&pt.c);
            let viol_max = vecop::violation_max(&pt.c);
            let phi = pt.f + mu * viol_sum;

            let (d, lp_obj) = self.subproblem(&pt, &grad, &jac, &lb, &ub, mu, radius)?;
            let pred = mu * viol_sum - lp_obj;
            let d_norm = vecop::norm_inf(&d);

            let term_stat = pred <= self.par.eps_acc * (F::one() + phi.abs())
                         || radius <= self.par.eps_acc * (F::one() + vecop::norm_inf(&pt.x));

            if log_trig || excess_iter || term_stat {
                log::debug!("{}: obj_viol_pred {:.2e} {:.2e} {:.2e} mu {:.1e} radius {:.2e}", i, pt.f, viol_max, pred, mu, radius);
            }
            else {
                log::trace!("{}: obj_viol_pred {:.2e} {:.2e} {:.2e} mu {:.1e} radius {:.2e}", i, pt.f, viol_max, pred, mu, radius);
            }

            if term_stat {
                if viol_max <= self.par.eps_feas {
                    log::info!("----- Converged");

                    return Ok(Self::outcome(pt, Status::Converged, i, viol_max));
                }
                else if mu < self.par.penalty_max {
                    mu = (mu * F::from(10).unwrap()).min(self.par.penalty_max);
                    radius = radius.max(self.par.radius_init);
                    log::debug!("{}: penalty raised to {:.1e}", i, mu);
                }
                else {
                    log::warn!("----- Infeasible");

                    return Ok(Self::outcome(pt, Status::Infeasible, i, viol_max));
                }
            }
            else {
                let mut xt: Vec<F> = pt.x.iter().zip(&d).map(|(a, b)| *a + *b).collect();
                vecop::proj_box(&mut xt, &lb, &ub);

                let trial = self.eval(xt)?;
                let phi_t = trial.f + mu * vecop::violation_sum(&trial.c);
                let rho = (phi - phi_t) / pred;

                log::trace!("{}: step {:.2e} ratio {:.3e}", i, d_norm, rho);

                if rho >= F::from(0.1).unwrap() {
                    pt = trial;
                    self.eval_derivs(&pt.x, &mut grad, &mut jac)?;

                    if rho >= F::from(0.75).unwrap() && d_norm >= F::from(0.9).unwrap() * radius {
                        radius = radius + radius;
                    }
                }
                else {
                    radius = F::from(0.5).unwrap() * d_norm.min(radius);
                }
            }

            if excess_iter {
                log::warn!("----- ExcessIter");

                let viol_max = vecop::violation_max(&pt.c);
                return Ok(Self::outcome(pt, Status::ExcessIter, i + 1, viol_max));
            }

            i += 1;
        } // end of loop
    }

    fn outcome(pt: Point<F>, status: Status, iter: usize, violation: F) -> Outcome<F>
    {
        Outcome {
            objective: pt.f,
            x: pt.x,
            status,
            iter,
            violation,
        }
    }

    fn eval(&self, x: Vec<F>) -> Result<Point<F>, SolverError>
    {
        let f = self.prob.objective(&x);
        let mut c = vec![F::zero(); self.m];
        self.prob.constraints(&x, &mut c);

        if !f.is_finite() || !vecop::all_finite(&c) {
            log::error!("non-finite evaluation at {:?}", x);
            return Err(SolverError::NonFinite);
        }

        Ok(Point { x, f, c })
    }

    fn eval_derivs(&self, x: &[F], grad: &mut [F], jac: &mut MatBuild<F>) -> Result<(), SolverError>
    {
        grad.fill(F::zero());
        jac.set_zero();
        self.prob.objective_grad(x, grad);
        self.prob.constraints_jac(x, jac);

        if !vecop::all_finite(grad) || !jac.is_finite() {
            log::error!("non-finite derivative at {:?}", x);
            return Err(SolverError::NonFinite);
        }
        log::trace!("jacobian {}", jac);

        Ok(())
    }

    /// Solves the trust region subproblem.
    ///
    /// Returns a tuple of the step \\(d\\) and the model value
    /// \\(\nabla f^T d + \mu \sum_j t_j\\).
    #[allow(clippy::too_many_arguments)]
    fn subproblem(&self, pt: &Point<F>, grad: &[F], jac: &MatBuild<F>, lb: &[F], ub: &[F], mu: F, radius: F)
    -> Result<(Vec<F>, F), SolverError>
    {
        let f0 = F::zero();
        let (m, n) = (self.m, self.n);

        // d = lo + z, 0 <= z <= hi - lo
        let lo: Vec<F> = (0.. n).map(|i| (lb[i] - pt.x[i]).max(-radius).min(f0)).collect();
        let hi: Vec<F> = (0.. n).map(|i| (ub[i] - pt.x[i]).min(radius).max(f0)).collect();

        // columns: z (n) | t (m) | s (m) | w (n)
        let (ct, cs, cw) = (n, n + m, n + m + m);
        let nc = n + m + m + n;
        let nr = m + n;

        let mut mat_a = MatBuild::new(nr, nc);
        let mut vec_b = vec![f0; nr];
        let mut vec_c = vec![f0; nc];
        let mut basis = vec![0; nr];

        for j in 0.. m {
            // J_j z + t_j - s_j = -c_j - J_j lo
            let r = -pt.c[j] - jac.row_dot(j, &lo);
            let sgn = if r >= f0 { F::one() } else { -F::one() };

            for i in 0.. n {
                mat_a[(j, i)] = sgn * jac[(j, i)];
            }
            mat_a[(j, ct + j)] = sgn;
            mat_a[(j, cs + j)] = -sgn;
            vec_b[j] = r.abs();
            basis[j] = if r >= f0 { ct + j } else { cs + j };
        }
        for i in 0.. n {
            // z_i + w_i = hi_i - lo_i
            mat_a[(m + i, i)] = F::one();
            mat_a[(m + i, cw + i)] = F::one();
            vec_b[m + i] = hi[i] - lo[i];
            basis[m + i] = cw + i;
        }

        vec_c[.. n].copy_from_slice(grad);
        for j in 0.. m {
            vec_c[ct + j] = mu;
        }

        let (z, _) = self.lp.solve(&mat_a, &vec_b, &vec_c, &mut basis)?;

        let d: Vec<F> = (0.. n).map(|i| lo[i] + z[i].min(hi[i] - lo[i])).collect();
        let t_sum = z[ct.. cs].iter().fold(f0, |s, v| s + *v);

        let obj = vecop::dot(grad, &d) + mu * t_sum;

        Ok((d, obj))
    }
}
