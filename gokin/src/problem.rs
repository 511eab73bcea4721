use gokin_core::MatBuild;
use gokin_core::solver::Problem;
use crate::{Mixture, TargetSpec};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Side
{
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct Row
{
    k: Option<usize>,
    value: f64,
    side: Side,
    /// reciprocal of the largest coefficient magnitude
    norm: f64,
}

/// Addition problem
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\[
/// \begin{array}{ll}
/// {\rm minimize} & w^T x \\\\
/// {\rm subject \ to} & s_e \left( m_e(x) - l_e M(x) \right) \ge 0, \quad s_e \left( u_e M(x) - m_e(x) \right) \ge 0 \\\\
/// & T - \sum_i x_i \ge 0 \\\\
/// & 0 \le x \le x_{\rm cap},
/// \end{array}
/// \\]
/// where \\(m_e(x)\\) is the mass of element \\(e\\) and \\(M(x)\\) the total mass after adding \\(x\\).
/// Since \\(M(x) > 0\\), these rows are the windows \\(l_e \le m_e(x) / M(x) \le u_e\\) multiplied out,
/// so their gradients are constant.
/// \\(s_e\\) is the reciprocal of the largest coefficient magnitude of the row.
/// Sides of a window that cannot be violated (\\(l_e = 0\\), \\(u_e = 1\\)) are left out.
pub(crate) struct AdditionProblem<'a>
{
    mix: &'a Mixture,
    rows: Vec<Row>,
    weights: Vec<f64>,
    caps: Vec<f64>,
    total_cap: Option<f64>,
}

impl<'a> AdditionProblem<'a>
{
    /// * `weights` is a per-kg objective coefficient of each addition.
    /// * `caps` is an upper bound of each addition.
    pub fn new(mix: &'a Mixture, target: &TargetSpec, weights: Vec<f64>, caps: Vec<f64>, total_cap: Option<f64>) -> Self
    {
        assert_eq!(weights.len(), mix.n_alloys());
        assert_eq!(caps.len(), mix.n_alloys());

        let mut rows = Vec::new();
        for (e, b) in target.iter() {
            let k = mix.index_of(e.as_str());

            if b.binds_lower() {
                rows.push(Self::row(mix, k, b.lower, Side::Lower));
            }
            // an element absent from every material never exceeds its upper bound
            if b.binds_upper() && k.is_some() {
                rows.push(Self::row(mix, k, b.upper, Side::Upper));
            }
        }

        log::debug!("addition problem: {} variables, {} element rows, total cap {:?}", caps.len(), rows.len(), total_cap);

        AdditionProblem {
            mix,
            rows,
            weights,
            caps,
            total_cap,
        }
    }

    fn row(mix: &Mixture, k: Option<usize>, value: f64, side: Side) -> Row
    {
        let mut row = Row { k, value, side, norm: 1. };

        let largest = (0.. mix.n_alloys())
            .map(|i| row.coef(mix, i).abs())
            .fold(0., f64::max);
        row.norm = 1. / largest.max(1e-3);
        row
    }

    pub fn n_rows(&self) -> usize
    {
        self.rows.len() + if self.total_cap.is_some() { 1 } else { 0 }
    }
}

impl Row
{
    /// d/dx_i of the row before normalization
    fn coef(&self, mix: &Mixture, i: usize) -> f64
    {
        let a = self.k.map_or(0., |k| mix.content(i, k));
        match self.side {
            Side::Lower => a - self.value,
            Side::Upper => self.value - a,
        }
    }
}

impl<'a> Problem<f64> for AdditionProblem<'a>
{
    fn size(&self) -> (usize, usize)
    {
        (self.n_rows(), self.caps.len())
    }

    fn bound(&self, i: usize) -> (f64, f64)
    {
        (0., self.caps[i])
    }

    fn objective(&self, x: &[f64]) -> f64
    {
        self.weights.iter().zip(x).map(|(w, v)| w * v).sum()
    }

    fn objective_grad(&self, _x: &[f64], g: &mut [f64])
    {
        g.copy_from_slice(&self.weights);
    }

    fn constraints(&self, x: &[f64], c: &mut [f64])
    {
        let total = self.mix.total_mass(x);

        for (j, row) in self.rows.iter().enumerate() {
            let m = row.k.map_or(0., |k| self.mix.element_mass(k, x));
            c[j] = row.norm * match row.side {
                Side::Lower => m - row.value * total,
                Side::Upper => row.value * total - m,
            };
        }

        if let Some(cap) = self.total_cap {
            c[self.rows.len()] = cap - x.iter().sum::<f64>();
        }
    }

    fn constraints_jac(&self, _x: &[f64], jac: &mut MatBuild<f64>)
    {
        for (j, row) in self.rows.iter().enumerate() {
            for i in 0.. self.caps.len() {
                jac[(j, i)] = row.norm * row.coef(self.mix, i);
            }
        }

        if self.total_cap.is_some() {
            for i in 0.. self.caps.len() {
                jac[(self.rows.len(), i)] = -1.;
            }
        }
    }
}

//

#[test]
fn test_addition_problem1()
{
    use float_eq::assert_float_eq;
    use crate::{presets, Catalog, MasterAlloy};

    let catalog = Catalog::builtin();
    let alloys: Vec<MasterAlloy> = ["Si-Al 99%", "Pure Al"].iter()
        .map(|n| catalog.master_alloy(n).unwrap())
        .collect();
    let refs: Vec<&MasterAlloy> = alloys.iter().collect();
    let initial = presets::initial("2ORD", 100.).unwrap();
    let target = presets::target("A356").unwrap();
    let mix = Mixture::new(&initial, &refs);

    let prob = AdditionProblem::new(&mix, &target, vec![1.; 2], vec![1000.; 2], Some(500.));
    let (m, n) = prob.size();
    assert_eq!(m, prob.n_rows());
    assert_eq!(n, 2);

    let x = [30., 250.];
    let mut c = vec![0.; m];
    prob.constraints(&x, &mut c);

    // the sign of each row agrees with the window check on fractions
    let comp = mix.composition(&x);
    for (row, cj) in prob.rows.iter().zip(&c) {
        let r = row.k.map_or(0., |k| mix.fraction(k, &x));
        let inside = match row.side {
            Side::Lower => r >= row.value,
            Side::Upper => r <= row.value,
        };
        assert_eq!(*cj >= 0., inside, "{:?} {} {}", row, r, comp);
    }
    assert_float_eq!(c[m - 1], 220., abs <= 1e-12);

    let mut jac = MatBuild::new(m, n);
    prob.constraints_jac(&x, &mut jac);
    let mut c_d = vec![0.; m];
    for i in 0.. n {
        let mut x_d = x;
        x_d[i] += 1.;
        prob.constraints(&x_d, &mut c_d);
        for j in 0.. m {
            assert_float_eq!(c_d[j] - c[j], jac[(j, i)], abs <= 1e-9);
            assert!(jac[(j, i)].abs() <= 1. + 1e-12);
        }
    }
}
