use float_eq::assert_float_eq;
use gokin::prelude::*;
use gokin::parse_alloy_name;

//

fn si_al(pct: f64) -> MasterAlloy
{
    let comp = Composition::from_percent([("Si", pct), ("Al", 100. - pct)]).unwrap();
    MasterAlloy::new(format!("Si-Al {}%", pct), comp)
}

#[test]
fn test_registry1()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut reg = AlloyRegistry::new();
    assert!(reg.is_empty());

    reg.register(si_al(50.)).unwrap();
    reg.register(si_al(99.)).unwrap();
    reg.register(MasterAlloy::new("Cu-Al 100%", parse_alloy_name("Cu-Al 100%").unwrap())).unwrap();
    assert_eq!(reg.len(), 3);
    assert!(reg.contains("Si-Al 99%"));
    assert!(!reg.contains("Si-Al 98%"));

    assert_eq!(reg.register(si_al(50.)), Err(AlloyError::DuplicateAlloy("Si-Al 50%".to_string())));
    assert_eq!(reg.len(), 3);

    let names: Vec<&str> = reg.names().collect();
    assert_eq!(names, ["Si-Al 50%", "Si-Al 99%", "Cu-Al 100%"]);

    assert_float_eq!(reg.get("Si-Al 99%").unwrap().composition().fraction("Si"), 0.99, abs <= 1e-12);
    assert!(reg.get("Si-Al 99%").unwrap().unit_cost().is_none());
}

#[test]
fn test_registry2()
{
    let mut reg = AlloyRegistry::new();
    reg.register_all([si_al(10.), si_al(20.), si_al(30.)]).unwrap();

    let removed = reg.remove("Si-Al 20%").unwrap();
    assert_eq!(removed.name(), "Si-Al 20%");
    assert_eq!(reg.len(), 2);

    // lookup still right after reindexing
    assert_eq!(reg.get("Si-Al 30%").unwrap().name(), "Si-Al 30%");
    assert_float_eq!(reg.get("Si-Al 30%").unwrap().composition().fraction("Si"), 0.3, abs <= 1e-12);

    assert_eq!(reg.remove("Si-Al 20%").unwrap_err(), AlloyError::UnknownAlloy("Si-Al 20%".to_string()));

    let err = reg.register_all([si_al(40.), si_al(10.), si_al(50.)]).unwrap_err();
    assert_eq!(err, AlloyError::DuplicateAlloy("Si-Al 10%".to_string()));
    assert!(reg.contains("Si-Al 40%"));
    assert!(!reg.contains("Si-Al 50%"));

    reg.clear();
    assert!(reg.is_empty());
    assert!(reg.get("Si-Al 10%").is_none());
}

#[test]
fn test_registry3()
{
    let mut reg = AlloyRegistry::new();
    reg.register_all([si_al(10.), si_al(20.)]).unwrap();

    let found = reg.resolve(&["Si-Al 20%", "Si-Al 10%"]).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name(), "Si-Al 20%");
    assert_eq!(found[1].name(), "Si-Al 10%");

    assert_eq!(reg.resolve(&["Si-Al 10%", "Ti-Al 5%"]).unwrap_err(),
               AlloyError::UnknownAlloy("Ti-Al 5%".to_string()));
    assert_eq!(reg.resolve(&["Si-Al 10%", "Si-Al 10%"]).unwrap_err(),
               AlloyError::DuplicateCandidate("Si-Al 10%".to_string()));

    let empty: &[String] = &[];
    assert!(reg.resolve(empty).unwrap().is_empty());
}

#[test]
fn test_master_alloy_cost()
{
    assert_eq!(si_al(50.).with_cost(3.).unwrap().unit_cost(), Some(3.));
    assert_eq!(si_al(50.).with_cost(0.).unwrap().unit_cost(), Some(0.));

    for bad in [-1., f64::NAN, f64::INFINITY] {
        match si_al(50.).with_cost(bad) {
            Err(AlloyError::InvalidCost(_)) => {},
            other => panic!("{}: {:?}", bad, other),
        }
    }
}

//

#[test]
fn test_catalog1()
{
    let cat = Catalog::builtin();
    assert!(cat.len() >= 5);

    let e = cat.get("Mn-Al 25%").unwrap();
    assert_float_eq!(e.composition.fraction("Mn"), 0.25, abs <= 1e-12);
    assert_float_eq!(e.composition.fraction("Al"), 0.75, abs <= 1e-12);
    assert!(e.unit_cost.is_some());

    // not listed, but named by the convention
    let a = cat.master_alloy("Fe-Al 10%").unwrap();
    assert_eq!(a.name(), "Fe-Al 10%");
    assert_float_eq!(a.composition().fraction("Fe"), 0.1, abs <= 1e-12);
    assert!(a.unit_cost().is_none());

    let a = cat.master_alloy("Pure Al").unwrap();
    assert_eq!(a.unit_cost(), Some(2.2));

    match cat.master_alloy("secret sauce") {
        Err(AlloyError::InvalidAlloyName { name, .. }) => assert_eq!(name, "secret sauce"),
        other => panic!("{:?}", other),
    }
}

#[test]
fn test_catalog2()
{
    let mut cat = Catalog::builtin();
    let file = Catalog::from_toml_str(r#"
        [alloys."Si-Al 50%"]
        composition = { Si = 50.0, Al = 50.0 }
        cost = 2.5

        [alloys."Sr-Al 10%"]
        composition = { Sr = 10.0, Al = 90.0 }
    "#).unwrap();
    assert_eq!(file.len(), 2);

    cat.merge(file);
    assert_eq!(cat.get("Si-Al 50%").unwrap().unit_cost, Some(2.5));
    assert_eq!(cat.get("Sr-Al 10%").unwrap().unit_cost, None);
    assert!(cat.names().any(|n| n == "Pure Al"));

    let empty = Catalog::from_toml_str("").unwrap();
    assert!(empty.is_empty());

    let bad = [
        "[alloys.\"X\"]\ncomposition = { Si = 150.0 }\n",
        "[alloys.\"X\"]\ncomposition = { Si = 50.0 }\ncost = -1.0\n",
        "[alloys.\"X\"]\ncomposition = { Si = 50.0 }\nprice = 1.0\n",
        "[alloys.\"X\"]\ncost = 1.0\n",
        "alloys = 3\n",
    ];
    for s in bad {
        assert!(Catalog::from_toml_str(s).is_err(), "{}", s);
    }

    let mut cat = Catalog::new();
    assert!(cat.insert("X", Composition::default(), Some(f64::NAN)).is_err());
    cat.insert("X", Composition::default(), Some(1.)).unwrap();
    assert_eq!(cat.len(), 1);
}
