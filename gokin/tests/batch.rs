use gokin::prelude::*;

//

fn registry() -> AlloyRegistry
{
    let catalog = Catalog::builtin();
    let mut reg = AlloyRegistry::new();
    for name in ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"] {
        reg.register(catalog.master_alloy(name).unwrap()).unwrap();
    }
    reg
}

fn base() -> AdditionRequest
{
    AdditionRequest::new(
        presets::initial("2ORD", 100.).unwrap(),
        presets::target("LM2").unwrap(),
        ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"],
    )
}

#[test]
fn test_batch1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let reg = registry();
    let engine = OptimizationEngine::default();
    let targets: Vec<TargetSpec> = ["LM2", "A380"].iter()
        .map(|n| presets::target(n).unwrap())
        .collect();

    let rslts = batch::solve_targets(&engine, &reg, &base(), &targets);
    assert_eq!(rslts.len(), 2);

    for (r, t) in rslts.iter().zip(&targets) {
        let r = r.as_ref().unwrap();
        println!("{}", r.message());

        assert_eq!(r.target(), t.name());
        assert!(r.success());
        assert!(t.violations(r.final_composition(), 1e-6).is_empty());
    }

    // same answer as a single solve
    let single = engine.solve(&reg, &base()).unwrap();
    let first = rslts[0].as_ref().unwrap();
    assert_eq!(single.plan(), first.plan());
}

#[test]
fn test_batch2()
{
    let reg = registry();
    let engine = OptimizationEngine::default();

    let mut unknown = base();
    unknown.candidates.push("Ti-Al 10%".to_string());

    let mut loose = base();
    loose.target = TargetSpec::from_percent("loose", [("Si", (3., 5.))]).unwrap();

    let rslts = batch::solve_all(&engine, &reg, &[base(), unknown, loose]);
    assert_eq!(rslts.len(), 3);

    assert!(rslts[0].as_ref().unwrap().success());
    assert_eq!(rslts[1].as_ref().unwrap_err(), &AlloyError::UnknownAlloy("Ti-Al 10%".to_string()));
    assert_eq!(rslts[2].as_ref().unwrap().status(), SolveStatus::AlreadyWithinTarget);

    assert!(batch::solve_all(&engine, &reg, &[]).is_empty());
}
