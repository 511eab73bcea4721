use num_traits::Float;
use core::fmt::{Debug, LowerExp};
use crate::MatBuild;
use crate::solver::{Backend, Outcome, Problem, SolverError, SolverParam, Status};
use crate::vecop;

/// Augmented Lagrangian backend
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Repeatedly minimizes, within the variable bounds,
/// \\[
/// L_\rho(x, \lambda) = f(x) + \sum_j \psi(c_j(x), \lambda_j, \rho),
/// \quad
/// \psi(c, \lambda, \rho) = \left\\{
/// \begin{array}{ll}
/// -\lambda c + \frac{\rho}{2} c^2 & (\lambda - \rho c > 0) \\\\
/// -\frac{\lambda^2}{2\rho} & ({\rm otherwise})
/// \end{array}
/// \right.
/// \\]
/// by a projected Newton-type method,
/// then updates \\(\lambda \leftarrow \max(0, \lambda - \rho c(x))\\).
/// The Newton-type step models the curvature of \\(L_\rho\\) as
/// \\(\rho \sum_j \nabla c_j \nabla c_j^T\\) over the rows in their quadratic piece,
/// plus a multiple of the identity by a Barzilai-Borwein quotient of the remainder.
/// The penalty \\(\rho\\) grows tenfold while the violation fails to shrink by a quarter.
#[derive(Debug, Clone)]
pub struct BackendAugLag<F: Float>
{
    /// Solver parameters.
    pub par: SolverParam<F>,
}

impl<F: Float> BackendAugLag<F>
{
    /// Creates an instance with default parameters.
    pub fn new() -> Self
    {
        BackendAugLag {
            par: SolverParam::default(),
        }
    }

    /// Changes solver parameters.
    ///
    /// Returns [`BackendAugLag`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut SolverParam<F>)
    {
        f(&mut self.par);
        self
    }
}

impl<F: Float> Default for BackendAugLag<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<F: Float + Debug + LowerExp> Backend<F> for BackendAugLag<F>
{
    fn name(&self) -> &'static str
    {
        "auglag"
    }

    fn solve(&self, prob: &dyn Problem<F>, x0: &[F]) -> Result<Outcome<F>, SolverError>
    {
        let (m, n) = prob.size();

        if x0.len() != n {
            log::error!("Size mismatch: x0 {}, problem ({}, {})", x0.len(), m, n);
            return Err(SolverError::InvalidProblem);
        }

        log::debug!("{:?}", self.par);

        let (lb, ub) = vecop::bounds(prob, n);

        let mut core = AugLagCore {
            par: &self.par,
            prob,
            lb, ub,
            lam: vec![F::zero(); m],
            rho: self.par.penalty_init,
            c: vec![F::zero(); m],
            jac: MatBuild::new(m, n),
            iter: 0,
        };

        core.solve(x0)
    }
}

//

enum Inner
{
    Tight,
    Stalled,
    Budget,
}

struct AugLagCore<'a, F: Float>
{
    par: &'a SolverParam<F>,
    prob: &'a dyn Problem<F>,
    lb: Vec<F>,
    ub: Vec<F>,

    lam: Vec<F>,
    rho: F,

    c: Vec<F>,
    jac: MatBuild<F>,
    iter: usize,
}

impl<'a, F: Float + Debug + LowerExp> AugLagCore<'a, F>
{
    fn solve(&mut self, x0: &[F]) -> Result<Outcome<F>, SolverError>
    {
        log::info!("----- Initializing");
        let f1 = F::one();
        let ten = F::from(10).unwrap();

        let mut x = x0.to_vec();
        vecop::proj_box(&mut x, &self.lb, &self.ub);

        let mut omega = f1;
        let mut prev_viol = F::infinity();

        // Iteration
        log::info!("----- Started");
        let mut k = 0;
        loop {
            let inner = self.minimize(&mut x, omega)?;

            self.prob.constraints(&x, &mut self.c);
            if !vecop::all_finite(&self.c) {
                return Err(SolverError::NonFinite);
            }
            let viol = vecop::violation_max(&self.c);
            let settled = !matches!(inner, Inner::Budget);

            for (l, c) in self.lam.iter_mut().zip(&self.c) {
                *l = (*l - self.rho * *c).max(F::zero());
            }

            log::debug!("{}: iter {} viol {:.2e} rho {:.1e} omega {:.1e}", k, self.iter, viol, self.rho, omega);

            if viol <= self.par.eps_feas && (omega <= self.par.eps_acc || matches!(inner, Inner::Stalled)) {
                log::info!("----- Converged");

                return Ok(self.outcome(x, Status::Converged, viol));
            }

            if let Inner::Budget = inner {
                log::warn!("----- ExcessIter");

                return Ok(self.outcome(x, Status::ExcessIter, viol));
            }

            if viol > self.par.eps_feas && viol > F::from(0.25).unwrap() * prev_viol {
                if self.rho < self.par.penalty_max {
                    self.rho = (self.rho * ten).min(self.par.penalty_max);
                    log::debug!("{}: penalty raised to {:.1e}", k, self.rho);
                }
                else if settled && viol > F::from(0.99).unwrap() * prev_viol {
                    log::warn!("----- Infeasible");

                    return Ok(self.outcome(x, Status::Infeasible, viol));
                }
            }

            prev_viol = viol;
            omega = (omega / ten).max(self.par.eps_acc);
            k += 1;
        } // end of loop
    }

    fn outcome(&self, x: Vec<F>, status: Status, violation: F) -> Outcome<F>
    {
        Outcome {
            objective: self.prob.objective(&x),
            x,
            status,
            iter: self.iter,
            violation,
        }
    }

    fn budget_left(&self) -> bool
    {
        if let Some(max_iter) = self.par.max_iter {
            self.iter < max_iter
        }
        else {
            true
        }
    }

    /// Augmented Lagrangian value, and its gradient into `grad` if given.
    fn lagr(&mut self, x: &[F], grad: Option<&mut [F]>) -> Result<F, SolverError>
    {
        let f0 = F::zero();
        let two = F::from(2).unwrap();

        let mut val = self.prob.objective(x);
        self.prob.constraints(x, &mut self.c);

        for (j, c) in self.c.iter().enumerate() {
            let l = self.lam[j];
            val = val + if l - self.rho * *c > f0 {
                -l * *c + self.rho * *c * *c / two
            }
            else {
                -l * l / (two * self.rho)
            };
        }

        if !val.is_finite() {
            log::error!("non-finite evaluation at {:?}", x);
            return Err(SolverError::NonFinite);
        }

        if let Some(g) = grad {
            g.fill(f0);
            self.jac.set_zero();
            self.prob.objective_grad(x, g);
            self.prob.constraints_jac(x, &mut self.jac);

            for (j, c) in self.c.iter().enumerate() {
                let w = (self.lam[j] - self.rho * *c).max(f0);
                if w > f0 {
                    for (i, gi) in g.iter_mut().enumerate() {
                        *gi = *gi - w * self.jac[(j, i)];
                    }
                }
            }

            if !vecop::all_finite(g) {
                log::error!("non-finite derivative at {:?}", x);
                return Err(SolverError::NonFinite);
            }
        }

        Ok(val)
    }

    /// Projected Newton-type method for the bound-constrained subproblem.
    fn minimize(&mut self, x: &mut Vec<F>, omega: F) -> Result<Inner, SolverError>
    {
        let f0 = F::zero();
        let f1 = F::one();
        let delta_min = F::from(1e-10).unwrap();
        let delta_max = F::from(1e10).unwrap();
        let n = x.len();

        let mut grad = vec![f0; n];
        let mut val = self.lagr(x, Some(&mut grad))?;
        let mut delta = vecop::norm_inf(&grad).max(f1);

        let mut xn = vec![f0; n];
        let mut grad_n = vec![f0; n];
        let mut dir = vec![f0; n];
        let mut hess = MatBuild::new(n, n);

        loop {
            // projected gradient norm
            for i in 0.. n {
                xn[i] = x[i] - grad[i];
            }
            vecop::proj_box(&mut xn, &self.lb, &self.ub);
            let pg = xn.iter().zip(x.iter()).fold(f0, |a, (p, q)| a.max((*p - *q).abs()));

            if pg <= omega * vecop::norm_inf(x).max(f1) {
                return Ok(Inner::Tight);
            }
            if !self.budget_left() {
                return Ok(Inner::Budget);
            }
            self.iter += 1;

            // self.c and self.jac are at x here
            self.gauss_newton(&mut hess);
            let diag_max = (0.. n).fold(f0, |a, i| a.max(hess[(i, i)]));
            delta = delta.max(delta_min * diag_max.max(f1));

            self.newton_dir(x, &grad, &hess, delta, pg, &mut dir);
            let mut accepted = self.search(x, &dir, &grad, val, &mut xn)?;

            if accepted.is_none() {
                for i in 0.. n {
                    dir[i] = -grad[i] / delta;
                }
                accepted = self.search(x, &dir, &grad, val, &mut xn)?;
            }

            let val_n = match accepted {
                None => {
                    log::trace!("line search stalled at pg {:.2e}", pg);
                    return Ok(Inner::Stalled);
                },
                Some(v) => v,
            };

            self.lagr(&xn, Some(&mut grad_n))?;

            // curvature left out of the Gauss-Newton part
            let mut ss = f0;
            let mut sy = f0;
            for i in 0.. n {
                let s = xn[i] - x[i];
                let hs = (0.. n).fold(f0, |a, k| a + hess[(i, k)] * (xn[k] - x[k]));
                ss = ss + s * s;
                sy = sy + s * (grad_n[i] - grad[i] - hs);
            }
            delta = if sy > f0 && ss > f0 {
                (sy / ss).max(delta_min).min(delta_max)
            }
            else {
                delta_min
            };

            x.copy_from_slice(&xn);
            grad.copy_from_slice(&grad_n);
            val = val_n;

            if self.par.log_period > 0 && self.iter % self.par.log_period == 0 {
                log::trace!("{}: lagr {:.6e} pg {:.2e} delta {:.1e}", self.iter, val, pg, delta);
                log::trace!("hessian {}", hess);
            }
        }
    }

    /// \\(\rho J^T J\\) over the rows whose penalty is in its quadratic piece.
    fn gauss_newton(&self, hess: &mut MatBuild<F>)
    {
        let f0 = F::zero();
        let (m, n) = self.jac.size();

        hess.set_zero();
        for j in 0.. m {
            if self.lam[j] - self.rho * self.c[j] <= f0 {
                continue;
            }
            for r in 0.. n {
                let jr = self.rho * self.jac[(j, r)];
                if jr != f0 {
                    for c in 0.. n {
                        hess[(r, c)] = hess[(r, c)] + jr * self.jac[(j, c)];
                    }
                }
            }
        }
    }

    /// Newton-type direction over the variables not held at a bound.
    ///
    /// A variable within `eps` of a bound with its gradient pushing against it is held,
    /// and gets a diagonally scaled gradient step instead.
    fn newton_dir(&self, x: &[F], grad: &[F], hess: &MatBuild<F>, delta: F, eps: F, dir: &mut [F])
    {
        let f0 = F::zero();
        let n = x.len();

        let held = |i: usize| {
            (x[i] <= self.lb[i] + eps && grad[i] > f0) || (x[i] >= self.ub[i] - eps && grad[i] < f0)
        };
        let free: Vec<usize> = (0.. n).filter(|i| !held(*i)).collect();

        for i in 0.. n {
            dir[i] = -grad[i] / (hess[(i, i)] + delta);
        }

        let mut a = MatBuild::new(free.len(), free.len())
            .by_fn(|r, c| hess[(free[r], free[c])] + if r == c { delta } else { f0 });
        let mut b: Vec<F> = free.iter().map(|i| -grad[*i]).collect();

        if chol_solve(&mut a, &mut b) {
            for (k, i) in free.iter().enumerate() {
                dir[*i] = b[k];
            }
        }
        else {
            log::trace!("reduced hessian not positive definite, diagonal step");
        }
    }

    /// Armijo backtracking along the projected path \\(P(x + \alpha d)\\) from \\(\alpha = 1\\).
    ///
    /// Returns the value at the accepted point `xn`, or `None` if no step is accepted.
    fn search(&mut self, x: &[F], dir: &[F], grad: &[F], val: F, xn: &mut [F]) -> Result<Option<F>, SolverError>
    {
        let f0 = F::zero();
        let sigma = F::from(1e-4).unwrap();
        let half = F::from(0.5).unwrap();
        let n = x.len();

        let mut alpha = F::one();
        for _ in 0.. 60 {
            for i in 0.. n {
                xn[i] = x[i] + alpha * dir[i];
            }
            vecop::proj_box(xn, &self.lb, &self.ub);

            let decr = grad.iter().zip(xn.iter().zip(x.iter())).fold(f0, |a, (g, (p, q))| a + *g * (*p - *q));
            if decr < f0 {
                let val_n = self.lagr(xn, None)?;
                if val_n <= val + sigma * decr {
                    return Ok(Some(val_n));
                }
            }
            alpha = alpha * half;
        }

        Ok(None)
    }
}

//

/// Solves \\(A z = b\\) for a symmetric positive definite \\(A\\) by Cholesky factorization.
///
/// `a` is overwritten by the factor in its lower triangle and `b` by the solution.
/// Returns `false` if `a` is not numerically positive definite.
fn chol_solve<F: Float>(a: &mut MatBuild<F>, b: &mut [F]) -> bool
{
    let (n, _) = a.size();
    assert_eq!(b.len(), n);

    for k in 0.. n {
        let mut d = a[(k, k)];
        for p in 0.. k {
            d = d - a[(k, p)] * a[(k, p)];
        }
        if d.is_nan() || d <= F::zero() {
            return false;
        }
        let d = d.sqrt();
        a[(k, k)] = d;

        for i in k + 1.. n {
            let mut v = a[(i, k)];
            for p in 0.. k {
                v = v - a[(i, p)] * a[(k, p)];
            }
            a[(i, k)] = v / d;
        }
    }

    // L y = b
    for i in 0.. n {
        let mut v = b[i];
        for p in 0.. i {
            v = v - a[(i, p)] * b[p];
        }
        b[i] = v / a[(i, i)];
    }
    // L^T z = y
    for i in (0.. n).rev() {
        let mut v = b[i];
        for p in i + 1.. n {
            v = v - a[(p, i)] * b[p];
        }
        b[i] = v / a[(i, i)];
    }

    true
}

//

#[test]
fn test_chol_solve1()
{
    use float_eq::assert_float_eq;

    let a_ref = [
        [4., 2., 0.4],
        [2., 5., 1.],
        [0.4, 1., 3.],
    ];
    let z_ref = [1., -2., 0.5];
    let mut b: Vec<f64> = a_ref.iter()
        .map(|row| row.iter().zip(&z_ref).map(|(a, z)| a * z).sum())
        .collect();

    let mut a = MatBuild::new(3, 3).by_fn(|r, c| a_ref[r][c]);
    assert!(chol_solve(&mut a, &mut b));
    assert_float_eq!(b.as_slice(), z_ref.as_slice(), abs_all <= 1e-12);

    let mut a = MatBuild::new(2, 2).by_fn(|r, c| [[1., 2.], [2., 1.]][r][c]);
    assert!(!chol_solve(&mut a, &mut [1., 1.]));

    let mut a = MatBuild::<f64>::new(0, 0);
    assert!(chol_solve(&mut a, &mut []));
}
