use num_traits::Float;

pub fn dot<F: Float>(x: &[F], y: &[F]) -> F
{
    assert_eq!(x.len(), y.len());

    x.iter().zip(y).fold(F::zero(), |s, (a, b)| s + *a * *b)
}

pub fn norm_inf<F: Float>(x: &[F]) -> F
{
    x.iter().fold(F::zero(), |m, v| m.max(v.abs()))
}

/// Returns \\(\sum_j \max(0, -c_j)\\).
pub fn violation_sum<F: Float>(c: &[F]) -> F
{
    let f0 = F::zero();

    c.iter().fold(f0, |s, v| s + (-*v).max(f0))
}

/// Returns \\(\max_j \max(0, -c_j)\\).
pub fn violation_max<F: Float>(c: &[F]) -> F
{
    let f0 = F::zero();

    c.iter().fold(f0, |m, v| m.max(-*v))
}

pub fn all_finite<F: Float>(x: &[F]) -> bool
{
    x.iter().all(|v| v.is_finite())
}

/// Projects `x` onto the box `lo <= x <= hi` in place.
pub fn proj_box<F: Float>(x: &mut [F], lo: &[F], hi: &[F])
{
    for ((v, l), h) in x.iter_mut().zip(lo).zip(hi) {
        *v = v.max(*l).min(*h);
    }
}

pub fn bounds<F: Float>(prob: &dyn crate::solver::Problem<F>, n: usize) -> (Vec<F>, Vec<F>)
{
    (0.. n).map(|i| prob.bound(i)).unzip()
}

//

#[test]
fn test_vecop1()
{
    use float_eq::assert_float_eq;

    let c = [1., -2., 0.5, -0.25];
    assert_float_eq!(violation_sum(&c), 2.25, abs <= 1e-12);
    assert_float_eq!(violation_max(&c), 2., abs <= 1e-12);
    assert_float_eq!(violation_max(&[1., 2.]), 0., abs <= 1e-12);
    assert_float_eq!(norm_inf(&c), 2., abs <= 1e-12);
    assert_float_eq!(dot(&c, &[1., 1., 2., 4.]), -1., abs <= 1e-12);

    let mut x = [-1., 0.5, 3.];
    proj_box(&mut x, &[0., 0., 0.], &[1., 1., 1.]);
    assert_float_eq!(x.as_ref(), [0., 0.5, 1.].as_ref(), abs_all <= 1e-12);
}
