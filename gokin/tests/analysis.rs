use float_eq::assert_float_eq;
use gokin::prelude::*;

//

fn candidates(names: &[&str]) -> Vec<MasterAlloy>
{
    let catalog = Catalog::builtin();
    names.iter().map(|n| catalog.master_alloy(n).unwrap()).collect()
}

#[test]
fn test_analyze1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let initial = presets::initial("2ORD", 100.).unwrap();
    let target = presets::target("LM2").unwrap();
    let alloys = candidates(&["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%", "Si-Al 50%"]);
    let refs: Vec<&MasterAlloy> = alloys.iter().collect();

    let a = analysis::analyze(&initial, &target, &refs);
    assert!(!a.within_target());

    let raised: Vec<&str> = a.increase.iter().map(|d| d.element.as_str()).collect();
    assert_eq!(raised, ["Cu", "Si"]);

    let cu = &a.increase[0];
    assert_float_eq!(cu.current, 0.0064, abs <= 1e-12);
    assert_float_eq!(cu.minimum, 0.007, abs <= 1e-12);
    assert_float_eq!(cu.deficit, 0.0006, abs <= 1e-12);
    assert_eq!(cu.sources.len(), 1);
    assert_eq!(cu.sources[0].name, "Cu-Al 100%");

    // richest first
    let si = &a.increase[1];
    assert_eq!(si.sources.len(), 2);
    assert_eq!(si.sources[0].name, "Si-Al 99%");
    assert_eq!(si.sources[1].name, "Si-Al 50%");
    assert_eq!(si.sources[1].unit_cost, Some(3.0));

    assert_eq!(a.decrease.len(), 1);
    assert_eq!(a.decrease[0].element.as_str(), "Al");
    assert_float_eq!(a.decrease[0].excess, 0.947 - 0.893, abs <= 1e-12);

    // only the dilution note
    assert_eq!(a.issues.len(), 1);
    assert!(a.issues[0].starts_with("Al"));

    assert_float_eq!(a.estimated_min_addition, 0.06 + 5.66 / 0.99, abs <= 1e-9);
}

#[test]
fn test_analyze2()
{
    let initial = presets::initial("2ORD", 100.).unwrap();
    let target = presets::target("LM2").unwrap();
    let alloys = candidates(&["Si-Al 99%"]);
    let refs: Vec<&MasterAlloy> = alloys.iter().collect();

    let a = analysis::analyze(&initial, &target, &refs);
    assert!(a.increase[0].sources.is_empty());
    assert!(a.issues.iter().any(|s| s.starts_with("no source for Cu")));

    let a = analysis::analyze(&initial, &target, &[]);
    assert_eq!(a.increase.len(), 2);
    assert_float_eq!(a.estimated_min_addition, 0., abs <= 1e-12);
    assert_eq!(a.issues.len(), 3);

    let loose = TargetSpec::from_percent("loose", [("Si", (3., 5.)), ("Cu", (0., 1.))]).unwrap();
    let a = analysis::analyze(&initial, &loose, &refs);
    assert!(a.within_target());
    assert!(a.issues.is_empty());
}
