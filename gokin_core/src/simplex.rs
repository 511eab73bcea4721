use num_traits::Float;
use core::fmt::{Debug, LowerExp};
use crate::MatBuild;
use crate::solver::SolverError;

/// Dense primal simplex method
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Solves a linear program of the standard form
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & c^T x \\\\
/// {\rm subject \ to} & A x = b \\\\
/// & x \ge 0,
/// \end{array}
/// \\]
/// starting from a feasible basis given by the caller.
/// Entering and leaving variables follow Bland's rule, so degenerate pivots do not cycle.
#[derive(Debug, Clone)]
pub struct Simplex<F: Float>
{
    /// Max number of pivots.
    pub max_iter: usize,
    /// Pivot elements smaller than this are treated as zero.
    pub eps_piv: F,
}

impl<F: Float> Default for Simplex<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        Simplex {
            max_iter: 10_000,
            eps_piv: ten.powi(-10),
        }
    }
}

impl<F: Float + Debug + LowerExp> Simplex<F>
{
    /// Starts to solve a linear program.
    ///
    /// Returns `Ok` with a tuple of the optimal \\(x\\) and the number of pivots,
    /// or `Err` with [`SolverError`].
    /// * `mat_a` is \\(A\\) of size \\(m \times n\\).
    /// * `vec_b` is \\(b\\) of length \\(m\\).
    /// * `vec_c` is \\(c\\) of length \\(n\\).
    /// * `basis` holds \\(m\\) column indices of an initial feasible basis.
    ///   On return it holds the optimal basis.
    pub fn solve(&self, mat_a: &MatBuild<F>, vec_b: &[F], vec_c: &[F], basis: &mut [usize])
    -> Result<(Vec<F>, usize), SolverError>
    {
        let f0 = F::zero();

        let (m, n) = mat_a.size();
        if vec_b.len() != m || vec_c.len() != n || basis.len() != m || basis.iter().any(|&j| j >= n) {
            log::error!("simplex size mismatch: A {}x{}, b {}, c {}, basis {}", m, n, vec_b.len(), vec_c.len(), basis.len());
            return Err(SolverError::InvalidProblem);
        }

        // last row for reduced costs, last column for rhs
        let mut tab = MatBuild::new(m + 1, n + 1).by_fn(|r, c| {
            if r < m {
                if c < n { mat_a[(r, c)] } else { vec_b[r] }
            }
            else {
                if c < n { vec_c[c] } else { f0 }
            }
        });

        if !tab.is_finite() {
            return Err(SolverError::NonFinite);
        }

        for r in 0.. m {
            if tab[(r, basis[r])].abs() <= self.eps_piv {
                log::error!("simplex initial basis is singular at row {}", r);
                return Err(SolverError::InvalidProblem);
            }
            Self::pivot(&mut tab, r, basis[r]);
        }

        let c_max = vec_c.iter().fold(f0, |a, v| a.max(v.abs()));
        let eps_cost = self.eps_piv * (F::one() + c_max);

        let mut i = 0;
        loop {
            // entering column: smallest index with negative reduced cost
            let enter = (0.. n).find(|&j| tab[(m, j)] < -eps_cost && !basis.contains(&j));

            let e = match enter {
                None => break,
                Some(e) => e,
            };

            if i >= self.max_iter {
                log::warn!("simplex exceeded {} pivots", self.max_iter);
                return Err(SolverError::LpExcessIter);
            }

            let mut leave: Option<(usize, F)> = None;
            for r in 0.. m {
                let a = tab[(r, e)];
                if a > self.eps_piv {
                    let ratio = tab[(r, n)].max(f0) / a;
                    leave = match leave {
                        None => Some((r, ratio)),
                        Some((lr, lratio)) => {
                            if ratio < lratio || (ratio == lratio && basis[r] < basis[lr]) {
                                Some((r, ratio))
                            }
                            else {
                                Some((lr, lratio))
                            }
                        },
                    };
                }
            }

            let l = match leave {
                None => {
                    log::debug!("simplex unbounded at column {}", e);
                    return Err(SolverError::LpUnbounded);
                },
                Some((l, _)) => l,
            };

            log::trace!("simplex {}: enter {} leave {} ratio {:.3e}", i, e, basis[l], tab[(l, n)] / tab[(l, e)]);

            Self::pivot(&mut tab, l, e);
            basis[l] = e;
            i += 1;
        }

        let mut x = vec![f0; n];
        for (r, &j) in basis.iter().enumerate() {
            x[j] = tab[(r, n)].max(f0);
        }

        Ok((x, i))
    }

    fn pivot(tab: &mut MatBuild<F>, pr: usize, pc: usize)
    {
        let (nr, nc) = tab.size();

        let p = tab[(pr, pc)];
        for c in 0.. nc {
            tab[(pr, c)] = tab[(pr, c)] / p;
        }
        tab[(pr, pc)] = F::one();

        for r in 0.. nr {
            if r != pr {
                let factor = tab[(r, pc)];
                if factor != F::zero() {
                    for c in 0.. nc {
                        tab[(r, c)] = tab[(r, c)] - factor * tab[(pr, c)];
                    }
                    tab[(r, pc)] = F::zero();
                }
            }
        }
    }
}
