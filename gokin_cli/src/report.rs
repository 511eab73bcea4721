use std::io::Write;
use serde::Serialize;
use gokin::analysis::Analysis;
use gokin::prelude::*;

/// One element of the JSON output.
#[derive(Serialize)]
struct JsonEntry<'a>
{
    #[serde(flatten)]
    result: &'a OptimizationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a Analysis>,
}

/// Writes a result as a human-readable table.
///
/// Every element listed in the final composition is shown, with its window when `target` bounds it.
/// Missed windows are marked.
pub fn write_result<W: Write>(w: &mut W, rslt: &OptimizationResult, target: &TargetSpec) -> std::io::Result<()>
{
    writeln!(w, "== {} ({}) ==", rslt.target(), rslt.method())?;
    writeln!(w, "status       {}", rslt.status())?;

    if rslt.plan().is_empty() {
        writeln!(w, "additions    none")?;
    }
    else {
        writeln!(w, "additions")?;
        for (name, mass) in rslt.plan().iter() {
            writeln!(w, "  {:<20} {:>12.4} kg", name, mass)?;
        }
    }
    writeln!(w, "added mass   {:.4} kg", rslt.added_mass())?;
    writeln!(w, "final mass   {:.4} kg", rslt.final_mass())?;
    if let Some(c) = rslt.total_cost() {
        writeln!(w, "total cost   {:.4}", c)?;
    }
    if rslt.iterations() > 0 {
        writeln!(w, "iterations   {}", rslt.iterations())?;
    }

    let mark = |e: &Element| {
        if rslt.violations().iter().any(|v| &v.element == e) { "  <--" } else { "" }
    };

    writeln!(w, "composition")?;
    for (e, v) in rslt.final_composition().iter() {
        match target.bound(e.as_str()) {
            Some(b) => writeln!(w, "  {:<4} {:>9.4}%  {}{}", e, v * 100., b, mark(e))?,
            None => writeln!(w, "  {:<4} {:>9.4}%", e, v * 100.)?,
        }
    }
    // bounded but absent elements
    for (e, b) in target.iter() {
        if !rslt.final_composition().contains(e.as_str()) {
            writeln!(w, "  {:<4} {:>9.4}%  {}{}", e, 0., b, mark(e))?;
        }
    }

    writeln!(w, "{}", rslt.message())?;
    Ok(())
}

/// Writes a pre-solve analysis.
pub fn write_analysis<W: Write>(w: &mut W, target: &TargetSpec, a: &Analysis) -> std::io::Result<()>
{
    writeln!(w, "-- analysis against {} --", target.name())?;

    if a.within_target() {
        writeln!(w, "already within target")?;
        return Ok(());
    }

    for d in a.increase.iter() {
        writeln!(w, "raise  {:<4} {:>9.4}% -> >= {:.4}%", d.element, d.current * 100., d.minimum * 100.)?;
        for s in d.sources.iter() {
            match s.unit_cost {
                Some(c) => writeln!(w, "         {} ({:.2}%, {:.2}/kg)", s.name, s.content * 100., c)?,
                None => writeln!(w, "         {} ({:.2}%)", s.name, s.content * 100.)?,
            }
        }
    }
    for e in a.decrease.iter() {
        writeln!(w, "lower  {:<4} {:>9.4}% -> <= {:.4}%", e.element, e.current * 100., e.maximum * 100.)?;
    }
    for s in a.issues.iter() {
        writeln!(w, "note   {}", s)?;
    }
    writeln!(w, "rough minimum addition {:.4} kg", a.estimated_min_addition)?;
    Ok(())
}

/// Writes results as a JSON array.
///
/// `analyses`, if not empty, pairs with `rslts` and is put in each element as `analysis`.
pub fn write_json<W: Write>(w: &mut W, rslts: &[&OptimizationResult], analyses: &[Analysis]) -> serde_json::Result<()>
{
    let entries: Vec<JsonEntry> = rslts.iter().enumerate()
        .map(|(i, r)| JsonEntry { result: *r, analysis: analyses.get(i) })
        .collect();

    serde_json::to_writer_pretty(w, &entries)
}

//

#[test]
fn test_write_result1()
{
    let catalog = Catalog::builtin();
    let mut reg = AlloyRegistry::new();
    for name in ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"] {
        reg.register(catalog.master_alloy(name).unwrap()).unwrap();
    }
    let target = presets::target("LM2").unwrap();
    let req = AdditionRequest::new(
        presets::initial("2ORD", 100.).unwrap(),
        target.clone(),
        ["Cu-Al 100%", "Si-Al 99%", "Al-Mg 50%"],
    );
    let rslt = OptimizationEngine::default().solve(&reg, &req).unwrap();

    let mut buf = Vec::new();
    write_result(&mut buf, &rslt, &target).unwrap();
    let s = String::from_utf8(buf).unwrap();
    println!("{}", s);

    assert!(s.starts_with("== LM2 (slp) =="));
    assert!(s.contains("status       Optimal"));
    assert!(s.contains("Si-Al 99%"));
    assert!(!s.contains("Al-Mg 50%"));
    assert!(!s.contains("<--"));

    let a = gokin::analysis::analyze(&req.initial, &target, &reg.iter().collect::<Vec<_>>());
    let mut buf = Vec::new();
    write_analysis(&mut buf, &target, &a).unwrap();
    let s = String::from_utf8(buf).unwrap();

    assert!(s.contains("raise  Si"));
    assert!(s.contains("lower  Al"));
}

#[test]
fn test_write_json1()
{
    let catalog = Catalog::builtin();
    let mut reg = AlloyRegistry::new();
    for name in ["Cu-Al 100%", "Si-Al 99%"] {
        reg.register(catalog.master_alloy(name).unwrap()).unwrap();
    }
    let target = presets::target("LM2").unwrap();
    let req = AdditionRequest::new(presets::initial("2ORD", 100.).unwrap(), target.clone(), ["Cu-Al 100%", "Si-Al 99%"]);
    let rslt = OptimizationEngine::default().solve(&reg, &req).unwrap();
    let a = gokin::analysis::analyze(&req.initial, &target, &reg.iter().collect::<Vec<_>>());

    let mut buf = Vec::new();
    write_json(&mut buf, &[&rslt], &[a]).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    println!("{}", v);

    assert_eq!(v[0]["target"], serde_json::json!("LM2"));
    assert_eq!(v[0]["success"], serde_json::json!(true));
    assert!(v[0]["plan"]["Si-Al 99%"].as_f64().unwrap() > 6.);
    let increase = v[0]["analysis"]["increase"].as_array().unwrap();
    assert!(increase.iter().any(|d| d["element"] == serde_json::json!("Si")));
    assert!(v[0]["analysis"]["estimated_min_addition"].as_f64().unwrap() > 0.);

    let mut buf = Vec::new();
    write_json(&mut buf, &[&rslt, &rslt], &[]).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert!(v[1].get("analysis").is_none());
    assert_eq!(v[1]["method"], serde_json::json!("slp"));
}
