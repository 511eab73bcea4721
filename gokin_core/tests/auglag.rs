use float_eq::assert_float_eq;
use gokin_core::prelude::*;
use gokin_core::{BackendAugLag, MatBuild};

//

// minimize x0 + x1 subject to x0 x1 >= 1, x0 >= 2 x1, 0 <= x <= 10
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

// minimize x0 subject to x0 >= 5, 0 <= x0 <= 1
struct OutOfReach;

impl Problem<f64> for OutOfReach
{
    fn size(&self) -> (usize, usize) { (1, 1) }
    fn bound(&self, _i: usize) -> (f64, f64) { (0., 1.) }
    fn objective(&self, x: &[f64]) -> f64 { x[0] }
    fn objective_grad(&self, _x: &[f64], g: &mut [f64]) { g[0] = 1.; }
    fn constraints(&self, x: &[f64], c: &mut [f64]) { c[0] = x[0] - 5.; }
    fn constraints_jac(&self, _x: &[f64], jac: &mut MatBuild<f64>) { jac[(0, 0)] = 1.; }
}

// minimize -x0 + x1 subject to 0 <= x0 <= 3, 1 <= x1 <= 2
struct BoxOnly;

impl Problem<f64> for BoxOnly
{
    fn size(&self) -> (usize, usize) { (0, 2) }
    fn bound(&self, i: usize) -> (f64, f64) { [(0., 3.), (1., 2.)][i] }
    fn objective(&self, x: &[f64]) -> f64 { -x[0] + x[1] }
    fn objective_grad(&self, _x: &[f64], g: &mut [f64]) { g.copy_from_slice(&[-1., 1.]); }
    fn constraints(&self, _x: &[f64], _c: &mut [f64]) {}
    fn constraints_jac(&self, _x: &[f64], _jac: &mut MatBuild<f64>) {}
}

//

#[test]
fn test_auglag1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = BackendAugLag::new().par(|p| {
        p.max_iter = Some(1_000);
    });
    let rslt = s.solve(&Hyperbola, &[3., 1.]).unwrap();
    println!("{:?}", rslt);

    assert_eq!(rslt.status, Status::Converged);
    assert_float_eq!(rslt.x.as_slice(), [2_f64.sqrt(), 0.5_f64.sqrt()].as_slice(), abs_all <= 1e-5);
    assert_float_eq!(rslt.objective, 1.5 * 2_f64.sqrt(), abs <= 1e-5);
    assert!(rslt.violation <= 1e-8);
}

#[test]
fn test_auglag2()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = BackendAugLag::new();
    let rslt = s.solve(&OutOfReach, &[0.5]).unwrap();
    println!("{:?}", rslt);

    assert_eq!(rslt.status, Status::Infeasible);
    assert_float_eq!(rslt.x[0], 1., abs <= 1e-9);
    assert_float_eq!(rslt.violation, 4., abs <= 1e-9);
}

#[test]
fn test_auglag3()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = BackendAugLag::new();
    let rslt = s.solve(&BoxOnly, &[-5., 5.]).unwrap();

    assert_eq!(rslt.status, Status::Converged);
    assert_float_eq!(rslt.x.as_slice(), [3., 1.].as_slice(), abs_all <= 1e-9);
}

#[test]
fn test_auglag4()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s = BackendAugLag::new().par(|p| {
        p.max_iter = Some(1);
    });
    let rslt = s.solve(&Hyperbola, &[3., 1.]).unwrap();

    assert_eq!(rslt.status, Status::ExcessIter);
    assert_eq!(rslt.iter, 1);

    let rslt = s.solve(&Hyperbola, &[3.]).unwrap_err();
    assert_eq!(rslt, SolverError::InvalidProblem);
}

#[test]
fn test_auglag5()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let s: Box<dyn Backend<f64>> = Box::new(BackendAugLag::new());
    assert_eq!(s.name(), "auglag");

    let rslt = s.solve(&Hyperbola, &[1., 1.]).unwrap();
    assert_eq!(rslt.status, Status::Converged);
    assert_float_eq!(rslt.objective, 1.5 * 2_f64.sqrt(), abs <= 1e-5);
}
