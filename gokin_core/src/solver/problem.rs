use num_traits::Float;
use crate::MatBuild;

/// Nonlinear program trait.
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Expresses
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & f(x) \\\\
/// {\rm subject \ to} & c(x) \ge 0 \\\\
/// & l \le x \le u,
/// \end{array}
/// \\]
/// where
/// * variables \\( x \in \mathbb{R}^n \\)
/// * \\( f: \mathbb{R}^n \to \mathbb{R} \\) as an objective
/// * \\( c: \mathbb{R}^n \to \mathbb{R}^m \\) as inequality constraints
/// * \\( l, u \\) as variable bounds, possibly infinite.
pub trait Problem<F: Float>
{
    /// Size of the constraint Jacobian.
    ///
    /// Returns a tuple of \\(m\\) and \\(n\\).
    fn size(&self) -> (usize, usize);

    /// Bounds of a variable.
    ///
    /// Returns a tuple of \\(l_i\\) and \\(u_i\\).
    /// Use `F::neg_infinity()` or `F::infinity()` for an unbounded side.
    /// * `i` is an index of the variable.
    fn bound(&self, i: usize) -> (F, F);

    /// Returns \\(f(x)\\).
    fn objective(&self, x: &[F]) -> F;

    /// Calculates \\(\nabla f(x)\\) into `g` of length \\(n\\).
    fn objective_grad(&self, x: &[F], g: &mut [F]);

    /// Calculates \\(c(x)\\) into `c` of length \\(m\\).
    fn constraints(&self, x: &[F], c: &mut [F]);

    /// Calculates the Jacobian \\(\partial c / \partial x\\) into `jac` of size \\(m \times n\\).
    fn constraints_jac(&self, x: &[F], jac: &mut MatBuild<F>);
}
