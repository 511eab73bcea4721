use float_eq::assert_float_eq;
use gokin::prelude::*;

//

const LM2_CANDIDATES: [&str; 3] = ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"];

fn registry(names: &[&str]) -> AlloyRegistry
{
    let catalog = Catalog::builtin();
    let mut reg = AlloyRegistry::new();
    for name in names {
        reg.register(catalog.master_alloy(name).unwrap()).unwrap();
    }
    reg
}

fn lm2_request() -> AdditionRequest
{
    AdditionRequest::new(
        presets::initial("2ORD", 100.).unwrap(),
        presets::target("LM2").unwrap(),
        LM2_CANDIDATES,
    )
}

fn pure_al(mass: f64) -> InitialComposition
{
    InitialComposition::new("Al", Composition::new([("Al", 1.)]).unwrap(), mass).unwrap()
}

fn engine_with<P: FnOnce(&mut EngineConfig)>(f: P) -> OptimizationEngine
{
    OptimizationEngine::new(EngineConfig::default().par(f)).unwrap()
}

fn check_lm2(rslt: &OptimizationResult)
{
    println!("{}", rslt.message());

    assert!(rslt.success());
    assert_eq!(rslt.status(), SolveStatus::Optimal);
    assert_float_eq!(rslt.plan().mass("Si-Al 99%"), 6.335176, abs <= 1e-3);
    assert_float_eq!(rslt.plan().mass("Cu-Al 100%"), 0.105082, abs <= 1e-3);
    assert!(!rslt.plan().contains("Al-Mg 50%"));
    assert_float_eq!(rslt.final_mass(), 106.440258, abs <= 1e-3);
    assert_float_eq!(rslt.final_mass(), 100. + rslt.added_mass(), abs <= 1e-9);
    assert!(rslt.failure().is_none());

    let target = presets::target("LM2").unwrap();
    assert!(target.violations(rslt.final_composition(), 1e-6).is_empty());
}

//

#[test]
fn test_engine_lm2_slp()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let engine = OptimizationEngine::new(EngineConfig::default()).unwrap();
    let rslt = engine.solve(&reg, &lm2_request()).unwrap();

    check_lm2(&rslt);
    assert_eq!(rslt.method(), Method::Slp);
    assert!(rslt.iterations() > 0);
    assert_float_eq!(rslt.objective(), rslt.added_mass(), abs <= 1e-12);
}

#[test]
fn test_engine_lm2_auglag()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let engine = engine_with(|p| {
        p.method = "AugLag".parse().unwrap();
    });
    let rslt = engine.solve(&reg, &lm2_request()).unwrap();

    check_lm2(&rslt);
    assert_eq!(rslt.method(), Method::AugLag);
}

#[test]
fn test_engine_already_within()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let initial = presets::initial("2ORD", 100.).unwrap();
    let target = TargetSpec::from_percent("loose", [("Si", (3., 5.)), ("Cu", (0., 1.))]).unwrap();

    let engine = OptimizationEngine::default();

    let none: &[&str] = &[];
    for names in [&LM2_CANDIDATES[..], none] {
        let reg = registry(names);
        let req = AdditionRequest::new(initial.clone(), target.clone(), names.iter().copied());
        let rslt = engine.solve(&reg, &req).unwrap();

        assert!(rslt.success());
        assert_eq!(rslt.status(), SolveStatus::AlreadyWithinTarget);
        assert!(rslt.plan().is_empty());
        assert_eq!(rslt.final_composition(), initial.composition());
        assert_float_eq!(rslt.final_mass(), 100., abs <= 1e-12);
        assert_eq!(rslt.iterations(), 0);
    }
}

#[test]
fn test_engine_no_candidates()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = AlloyRegistry::new();
    let req = AdditionRequest::new(
        presets::initial("2ORD", 100.).unwrap(),
        presets::target("LM2").unwrap(),
        Vec::<String>::new(),
    );
    let rslt = OptimizationEngine::default().solve(&reg, &req).unwrap();
    println!("{}", rslt.message());

    assert!(!rslt.success());
    assert_eq!(rslt.status(), SolveStatus::Infeasible);
    assert_eq!(rslt.iterations(), 0);
    assert!(rslt.plan().is_empty());
    assert!(rslt.violations().iter().any(|v| v.element.as_str() == "Si"));
    assert!(rslt.message().contains("Si"));
}

#[test]
fn test_engine_unreachable_element()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&["Fe-Al 10%", "Si-Al 99%"]);
    let target = TargetSpec::from_percent("iron", [("Fe", (99., 100.))]).unwrap();
    let req = AdditionRequest::new(presets::initial("2ORD", 100.).unwrap(), target, ["Fe-Al 10%", "Si-Al 99%"]);

    for method in [Method::Slp, Method::AugLag] {
        let rslt = engine_with(|p| p.method = method).solve(&reg, &req).unwrap();
        println!("{}", rslt.message());

        assert!(!rslt.success());
        assert_eq!(rslt.status(), SolveStatus::Infeasible);
        assert!(rslt.message().contains("Fe"));
        match rslt.failure() {
            Some(Failure::InfeasibleTarget { violations }) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].element.as_str(), "Fe");
                assert!(violations[0].actual < 0.1);
            },
            other => panic!("{:?}", other),
        }
        for (_, m) in rslt.plan().iter() {
            assert!(m >= 0.);
            assert!(m <= 1000. + 1e-9);
        }
    }
}

#[test]
fn test_engine_widening()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&["Si-Al 99%"]);
    let initial = presets::initial("2ORD", 100.).unwrap();

    for method in [Method::Slp, Method::AugLag] {
        let engine = engine_with(|p| p.method = method);

        let narrow = TargetSpec::from_percent("narrow", [("Si", (12., 12.5))]).unwrap();
        let req = AdditionRequest::new(initial.clone(), narrow, ["Si-Al 99%"])
            .max_addition("Si-Al 99%", 5.);
        let rslt = engine.solve(&reg, &req).unwrap();
        println!("{}: {}", method, rslt.message());
        assert!(!rslt.success());
        assert_eq!(rslt.status(), SolveStatus::Infeasible);
        assert_float_eq!(rslt.plan().mass("Si-Al 99%"), 5., abs <= 1e-6);

        let wide = TargetSpec::from_percent("wide", [("Si", (8., 12.5))]).unwrap();
        let req = AdditionRequest { target: wide, ..req };
        let rslt = engine.solve(&reg, &req).unwrap();
        println!("{}: {}", method, rslt.message());
        assert!(rslt.success());
        // (3.84 + 0.99 x) / (100 + x) = 0.08
        assert_float_eq!(rslt.plan().mass("Si-Al 99%"), 4.16 / 0.91, abs <= 1e-4);

        let wider = TargetSpec::from_percent("wider", [("Si", (7., 12.5))]).unwrap();
        let req = AdditionRequest { target: wider, ..req };
        let rslt = engine.solve(&reg, &req).unwrap();
        assert!(rslt.success());
    }
}

#[test]
fn test_engine_dilution()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let catalog = Catalog::builtin();
    let names: Vec<&str> = catalog.names().collect();
    let reg = registry(&names);

    let slp = OptimizationEngine::default();
    let auglag = engine_with(|p| p.method = Method::AugLag);

    // each needs hundreds of kg, mostly to dilute Cu, Pb or Fe
    for (init, target) in [("2ORD", "A356"), ("23FAR", "A356"), ("AL91", "A356"), ("AL91", "A380")] {
        let req = AdditionRequest::new(
            presets::initial(init, 100.).unwrap(),
            presets::target(target).unwrap(),
            names.iter().copied(),
        );

        let r_slp = slp.solve(&reg, &req).unwrap();
        let r_aug = auglag.solve(&reg, &req).unwrap();
        println!("{} -> {}: {}", init, target, r_slp.message());
        println!("{} -> {}: {}", init, target, r_aug.message());

        assert!(r_slp.success());
        assert!(r_aug.success());
        assert_eq!(r_aug.status(), SolveStatus::Optimal);
        assert_float_eq!(r_aug.objective(), r_slp.objective(), r2nd <= 1e-4);

        let spec = presets::target(target).unwrap();
        assert!(spec.violations(r_aug.final_composition(), 1e-6).is_empty());
    }

    // Cu 0.64% of 2ORD is held under 0.1%
    let req = AdditionRequest::new(
        presets::initial("2ORD", 100.).unwrap(),
        presets::target("A356").unwrap(),
        names.iter().copied(),
    );
    let rslt = auglag.solve(&reg, &req).unwrap();
    assert_float_eq!(rslt.final_mass(), 640., abs <= 1e-2);
}

#[test]
fn test_engine_cost()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let catalog = Catalog::builtin();
    let mut reg = AlloyRegistry::new();
    reg.register(catalog.master_alloy("Si-Al 50%").unwrap()).unwrap();
    reg.register(catalog.master_alloy("Si-Al 99%").unwrap().with_cost(10.).unwrap()).unwrap();

    let target = TargetSpec::from_percent("si", [("Si", (5., 10.))]).unwrap();
    let req = AdditionRequest::new(pure_al(100.), target, ["Si-Al 50%", "Si-Al 99%"]);

    let rslt = OptimizationEngine::default().solve(&reg, &req).unwrap();
    assert!(rslt.success());
    assert_float_eq!(rslt.plan().mass("Si-Al 99%"), 5. / 0.94, abs <= 1e-4);
    assert!(!rslt.plan().contains("Si-Al 50%"));

    let rslt = engine_with(|p| p.objective = Objective::Cost).solve(&reg, &req).unwrap();
    assert!(rslt.success());
    assert_float_eq!(rslt.plan().mass("Si-Al 50%"), 5. / 0.45, abs <= 1e-4);
    assert!(!rslt.plan().contains("Si-Al 99%"));
    assert_float_eq!(rslt.total_cost().unwrap(), 3. * 5. / 0.45, abs <= 1e-3);
    assert_float_eq!(rslt.objective(), rslt.total_cost().unwrap(), abs <= 1e-9);
}

#[test]
fn test_engine_missing_cost()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let rslt = engine_with(|p| p.objective = Objective::Cost).solve(&reg, &lm2_request());

    match rslt {
        Err(AlloyError::MissingCost(name)) => assert_eq!(name, "Cu-Al 100%"),
        other => panic!("{:?}", other),
    }
}

#[test]
fn test_engine_request_errors()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let engine = OptimizationEngine::default();

    let mut req = lm2_request();
    req.candidates.push("Ti-Al 10%".to_string());
    assert_eq!(engine.solve(&reg, &req).unwrap_err(), AlloyError::UnknownAlloy("Ti-Al 10%".to_string()));

    let mut req = lm2_request();
    req.candidates.push("Si-Al 99%".to_string());
    assert_eq!(engine.solve(&reg, &req).unwrap_err(), AlloyError::DuplicateCandidate("Si-Al 99%".to_string()));

    let req = lm2_request().max_addition("Pure Al", 1.);
    assert_eq!(engine.solve(&reg, &req).unwrap_err(), AlloyError::UnknownAlloy("Pure Al".to_string()));

    let req = lm2_request().max_addition("Si-Al 99%", -1.);
    assert!(matches!(engine.solve(&reg, &req), Err(AlloyError::InvalidMass(_))));

    let req = lm2_request().max_total_addition(f64::NAN);
    assert!(matches!(engine.solve(&reg, &req), Err(AlloyError::InvalidMass(_))));

    let bad = EngineConfig::default().par(|p| p.tolerance = -1.);
    assert!(matches!(OptimizationEngine::new(bad), Err(AlloyError::InvalidConfig(_))));

    assert!(matches!("sqp".parse::<Method>(), Err(AlloyError::UnknownMethod(_))));
    assert_eq!("SLP".parse::<Method>().unwrap(), Method::Slp);
}

#[test]
fn test_engine_caps()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let engine = OptimizationEngine::default();

    let rslt = engine.solve(&reg, &lm2_request().max_addition("Si-Al 99%", 3.)).unwrap();
    assert!(!rslt.success());
    assert!(rslt.violations().iter().any(|v| v.element.as_str() == "Si"));
    assert!(rslt.plan().mass("Si-Al 99%") <= 3. + 1e-9);

    let rslt = engine.solve(&reg, &lm2_request().max_total_addition(5.)).unwrap();
    println!("{}", rslt.message());
    assert!(!rslt.success());
    assert_eq!(rslt.status(), SolveStatus::Infeasible);
    assert!(rslt.added_mass() <= 5. * (1. + 1e-12));
    assert!(rslt.message().contains("cap"));

    let rslt = engine.solve(&reg, &lm2_request().max_total_addition(10.)).unwrap();
    check_lm2(&rslt);
}

#[test]
fn test_engine_total_cap_tight()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let target = presets::target("LM2").unwrap();

    // just under the 6.440258 kg the target needs
    for method in [Method::Slp, Method::AugLag] {
        let engine = engine_with(|p| p.method = method);
        for cap in [6.44, 6.4402] {
            let rslt = engine.solve(&reg, &lm2_request().max_total_addition(cap)).unwrap();
            println!("{}: {}", method, rslt.message());

            assert!(rslt.added_mass() <= cap * (1. + 1e-12));
            assert_float_eq!(rslt.final_mass(), 100. + rslt.added_mass(), abs <= 1e-9);
            if rslt.success() {
                assert!(target.violations(rslt.final_composition(), 1e-6).is_empty());
            }
            if rslt.status() == SolveStatus::Infeasible {
                assert!(!rslt.violations().is_empty());
            }
        }

        let rslt = engine.solve(&reg, &lm2_request().max_total_addition(6.45)).unwrap();
        check_lm2(&rslt);
        assert!(rslt.added_mass() <= 6.45);
    }
}

#[test]
fn test_engine_balance()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&["Cu-Al 100%", "Si-Al 99%"]);
    let melt = Composition::from_percent([("Si", 3.84), ("Cu", 0.64)]).unwrap();
    let initial = InitialComposition::new("unbalanced", melt, 100.).unwrap();
    let target = TargetSpec::from_percent("si-al", [("Si", (9.5, 11.5)), ("Al", (85., 92.))]).unwrap();
    let req = AdditionRequest::new(initial, target, ["Cu-Al 100%", "Si-Al 99%"]);

    let rslt = OptimizationEngine::default().solve(&reg, &req).unwrap();
    assert!(!rslt.success());
    assert!(rslt.violations().iter().any(|v| v.element.as_str() == "Al"));

    let rslt = engine_with(|p| p.balance = Balance::Element(Element::from("Al"))).solve(&reg, &req).unwrap();
    assert!(rslt.success());
    assert_float_eq!(rslt.final_composition().total(), 1., abs <= 1e-9);
    assert!(rslt.final_composition().fraction("Al") >= 0.85 - 1e-6);
    assert!(rslt.final_composition().fraction("Si") >= 0.095 - 1e-6);
}

#[test]
fn test_engine_not_converged()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let rslt = engine_with(|p| p.max_iter = Some(1)).solve(&reg, &lm2_request()).unwrap();
    println!("{}", rslt.message());

    assert!(!rslt.success());
    assert_eq!(rslt.status(), SolveStatus::NotConverged);
    assert_eq!(rslt.failure(), Some(&Failure::NonConvergence { iterations: 1 }));
    assert!(rslt.message().contains("iterations"));
}

#[test]
fn test_engine_json()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry(&LM2_CANDIDATES);
    let rslt = OptimizationEngine::default().solve(&reg, &lm2_request()).unwrap();

    let v = serde_json::to_value(&rslt).unwrap();
    assert_eq!(v["success"], serde_json::json!(true));
    assert_eq!(v["status"], serde_json::json!("Optimal"));
    assert_eq!(v["method"], serde_json::json!("slp"));
    assert!(v["plan"]["Si-Al 99%"].as_f64().unwrap() > 6.);
    assert!(v["final_composition"]["Al"].as_f64().unwrap() < 0.893);
}
