use float_eq::assert_float_eq;
use gokin::prelude::*;
use gokin::set_par_by_env;

//

#[test]
fn test_config1()
{
    let cfg: EngineConfig = toml::from_str(r#"
        method = "AugLag"
        objective = "cost"
        balance = "Al"
        tolerance = 1e-5
        max_iter = 500
    "#).unwrap();

    assert_eq!(cfg.method, Method::AugLag);
    assert_eq!(cfg.objective, Objective::Cost);
    assert_eq!(cfg.balance, Balance::Element(Element::from("Al")));
    assert_float_eq!(cfg.tolerance, 1e-5, abs <= 1e-18);
    assert_eq!(cfg.max_iter, Some(500));
    // unspecified ones are defaults
    assert_eq!(cfg.report_floor, EngineConfig::default().report_floor);
    assert_eq!(cfg.eps_feas, None);

    let empty: EngineConfig = toml::from_str("").unwrap();
    assert_eq!(empty, EngineConfig::default());

    assert!(toml::from_str::<EngineConfig>("method = \"newton\"").is_err());
    assert!(toml::from_str::<EngineConfig>("objective = \"speed\"").is_err());
    assert!(toml::from_str::<EngineConfig>("tolerence = 1e-5").is_err());

    let json = serde_json::to_string(&cfg).unwrap();
    let back: EngineConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn test_config2()
{
    assert_eq!("SLP".parse::<Method>().unwrap(), Method::Slp);
    assert_eq!(" auglag ".parse::<Method>().unwrap(), Method::AugLag);
    assert_eq!("ipm".parse::<Method>().unwrap_err(), AlloyError::UnknownMethod("ipm".to_string()));
    assert_eq!(Method::AugLag.to_string(), "auglag");
    assert_eq!(Method::Slp.backend(Default::default()).name(), "slp");
    assert_eq!(Method::AugLag.backend(Default::default()).name(), "auglag");

    assert_eq!("Cost".parse::<Objective>().unwrap(), Objective::Cost);
    assert!("time".parse::<Objective>().is_err());

    let par = EngineConfig::default().solver_param(100.);
    assert_float_eq!(par.eps_feas, 1e-6, rmax <= 1e-12);
    assert_float_eq!(par.radius_init, 1., abs <= 1e-12);
    assert_eq!(par.max_iter, Some(20_000));

    let par = EngineConfig::default().par(|p| p.eps_feas = Some(1e-4)).solver_param(10.);
    assert_float_eq!(par.eps_feas, 1e-3, rmax <= 1e-12);

    for bad in [
        EngineConfig::default().par(|p| p.tolerance = -1.),
        EngineConfig::default().par(|p| p.report_floor = f64::NAN),
        EngineConfig::default().par(|p| p.max_addition_ratio = 0.),
        EngineConfig::default().par(|p| p.eps_acc = 0.),
        EngineConfig::default().par(|p| p.eps_feas = Some(-1e-9)),
    ] {
        match OptimizationEngine::new(bad) {
            Err(AlloyError::InvalidConfig(_)) => {},
            other => panic!("{:?}", other.map(|e| e.config().clone())),
        }
    }
}

#[test]
fn test_config_env()
{
    let _ = env_logger::builder().is_test(true).try_init();

    std::env::set_var("GOKIN_MAX_ITER", "123");
    std::env::set_var("GOKIN_METHOD", "AugLag");
    std::env::set_var("GOKIN_EPS_ACC", "not a number");
    std::env::remove_var("GOKIN_TOLERANCE");

    let mut cfg = EngineConfig::default();
    set_par_by_env(&mut cfg);

    assert_eq!(cfg.max_iter, Some(123));
    assert_eq!(cfg.method, Method::AugLag);
    assert_eq!(cfg.eps_acc, EngineConfig::default().eps_acc);
    assert_eq!(cfg.tolerance, EngineConfig::default().tolerance);

    std::env::remove_var("GOKIN_MAX_ITER");
    std::env::remove_var("GOKIN_METHOD");
    std::env::remove_var("GOKIN_EPS_ACC");
}
