use std::ops::{Index, IndexMut};
use num_traits::Float;

//

/// Dense matrix builder
///
/// Matrix struct which owns a `Vec` of data array in column-major.
/// It holds constraint Jacobians handed over by [`crate::solver::Problem::constraints_jac`]
/// and the tableau of [`crate::Simplex`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatBuild<F: Float>
{
    nr: usize,
    nc: usize,
    array: Vec<F>,
}

impl<F: Float> MatBuild<F>
{
    /// Creates an instance.
    ///
    /// Returns the [`MatBuild`] instance with zero data.
    /// * `nr` is a number of rows.
    /// * `nc` is a number of columns.
    pub fn new(nr: usize, nc: usize) -> Self
    {
        MatBuild {
            nr, nc,
            array: vec![F::zero(); nr * nc],
        }
    }

    /// Size of the matrix.
    ///
    /// Returns a tuple of a number of rows and columns.
    pub fn size(&self) -> (usize, usize)
    {
        (self.nr, self.nc)
    }

    /// Fills every element with zero.
    pub fn set_zero(&mut self)
    {
        self.array.fill(F::zero());
    }

    /// Data by a function.
    ///
    /// * `func` takes a row and a column of the matrix and returns data of each element.
    pub fn set_by_fn<M>(&mut self, mut func: M)
    where M: FnMut(usize, usize) -> F
    {
        for c in 0.. self.nc {
            for r in 0.. self.nr {
                self[(r, c)] = func(r, c);
            }
        }
    }
    /// Builder pattern of [`MatBuild::set_by_fn`].
    pub fn by_fn<M>(mut self, func: M) -> Self
    where M: FnMut(usize, usize) -> F
    {
        self.set_by_fn(func);
        self
    }

    /// Dot product of a row and a vector.
    ///
    /// Returns \\(\sum_c a_{rc} v_c\\).
    /// * `r` is an index of the row.
    /// * `v` is a vector of length equal to the number of columns.
    pub fn row_dot(&self, r: usize, v: &[F]) -> F
    {
        assert_eq!(v.len(), self.nc);

        let mut s = F::zero();
        for (c, vc) in v.iter().enumerate() {
            s = s + self[(r, c)] * *vc;
        }
        s
    }

    /// Checks if every element is finite.
    pub fn is_finite(&self) -> bool
    {
        self.array.iter().all(|v| v.is_finite())
    }

    fn index(&self, (r, c): (usize, usize)) -> usize
    {
        assert!(r < self.nr);
        assert!(c < self.nc);

        c * self.nr + r
    }
}

//

impl<F: Float> Index<(usize, usize)> for MatBuild<F>
{
    type Output = F;
    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        let i = self.index(index);

        &self.array[i]
    }
}

impl<F: Float> IndexMut<(usize, usize)> for MatBuild<F>
{
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output
    {
        let i = self.index(index);

        &mut self.array[i]
    }
}

//

impl<F: Float> AsRef<[F]> for MatBuild<F>
{
    fn as_ref(&self) -> &[F]
    {
        &self.array
    }
}

//

/// One line per row, for trace logs of small matrices.
impl<F> core::fmt::Display for MatBuild<F>
where F: Float + core::fmt::LowerExp
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error>
    {
        write!(f, "{} x {}", self.nr, self.nc)?;
        for r in 0.. self.nr {
            write!(f, "\n  [")?;
            for c in 0.. self.nc {
                write!(f, " {:10.3e}", self[(r, c)])?;
            }
            write!(f, " ]")?;
        }
        Ok(())
    }
}

//

#[test]
fn test_matbuild1()
{
    use float_eq::assert_float_eq;

    let ref_array = &[ // column-major
        1., 4.,
        2., 5.,
        3., 6.,
    ];

    let mut m = MatBuild::<f64>::new(2, 3)
            .by_fn(|r, c| (r * 3 + c + 1) as f64);

    let m_array: &[f64] = m.as_ref();
    assert_float_eq!(m_array, ref_array.as_ref(), abs_all <= 1e-12);
    assert_float_eq!(m.row_dot(1, &[1., 0., -1.]), -2., abs <= 1e-12);
    assert!(m.is_finite());

    let s = m.to_string();
    println!("{}", s);
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "2 x 3");
    assert!(lines[1].contains("1.000e0") && lines[1].contains("3.000e0"));
    assert!(lines[2].contains("6.000e0"));
    assert_eq!(MatBuild::<f64>::new(0, 4).to_string(), "0 x 4");

    m[(0, 1)] = f64::NAN;
    assert!(!m.is_finite());
    m.set_zero();
    assert_eq!(m, MatBuild::new(2, 3));
}
