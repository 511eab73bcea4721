use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gokin::prelude::*;
use gokin::set_par_by_env;

mod request;
mod report;

use request::RequestFile;

/// Master alloy additions that bring a melt into a target composition window
#[derive(Parser, Debug)]
#[command(name = "gokin", version)]
struct Args
{
    /// Request file (TOML)
    #[arg(short, long, value_name = "PATH")]
    request: Option<PathBuf>,
    /// Engine configuration file (TOML), in place of the [engine] table of the request
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Catalog file (TOML) merged over the builtin catalog
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Preset initial melt, e.g. 2ORD
    #[arg(short, long, value_name = "NAME")]
    initial: Option<String>,
    /// Mass of the initial melt in kg
    #[arg(short, long, value_name = "KG")]
    mass: Option<f64>,
    /// Preset target, repeatable; several targets are solved in parallel
    #[arg(short, long = "target", value_name = "NAME")]
    targets: Vec<String>,
    /// Candidate master alloy, repeatable; defaults to every catalog entry
    #[arg(short, long = "alloy", value_name = "NAME")]
    alloys: Vec<String>,
    /// Cap of one candidate, repeatable
    #[arg(long, value_name = "NAME=KG", value_parser = parse_cap)]
    max_addition: Vec<(String, f64)>,
    /// Cap of the sum of additions in kg
    #[arg(long, value_name = "KG")]
    max_total: Option<f64>,

    /// slp or auglag
    #[arg(long)]
    method: Option<Method>,
    /// mass or cost
    #[arg(long)]
    objective: Option<Objective>,
    /// Element taking up the remainder of every material, e.g. Al
    #[arg(long, value_name = "ELEMENT")]
    balance: Option<String>,
    /// Absolute tolerance of final fractions
    #[arg(long)]
    tolerance: Option<f64>,

    /// Print a pre-solve analysis
    #[arg(long)]
    analyze: bool,
    /// Print results as JSON, with the analysis of each if --analyze is given
    #[arg(long)]
    json: bool,
    /// List presets and catalog entries, then exit
    #[arg(long)]
    list: bool,
}

fn parse_cap(s: &str) -> std::result::Result<(String, f64), String>
{
    let (name, kg) = s.rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=KG, got {}", s))?;
    let kg: f64 = kg.trim().parse()
        .map_err(|_| format!("not a mass: {}", kg))?;

    Ok((name.trim().to_string(), kg))
}

//

/// Everything needed to run, after merging files and flags.
struct Job
{
    engine: OptimizationEngine,
    registry: AlloyRegistry,
    requests: Vec<AdditionRequest>,
}

fn load_catalog(args: &Args) -> Result<Catalog>
{
    let mut catalog = Catalog::builtin();
    if let Some(path) = &args.catalog {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        catalog.merge(Catalog::from_toml_str(&s).with_context(|| format!("parsing {}", path.display()))?);
    }
    Ok(catalog)
}

fn build_config(args: &Args, file: &mut RequestFile) -> Result<EngineConfig>
{
    let mut cfg = match &args.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))?
        },
        None => file.engine.take().unwrap_or_default(),
    };

    set_par_by_env(&mut cfg);

    if let Some(m) = args.method {
        cfg.method = m;
    }
    if let Some(o) = args.objective {
        cfg.objective = o;
    }
    if let Some(b) = &args.balance {
        cfg.balance = Balance::Element(Element::from(b.as_str()));
    }
    if let Some(t) = args.tolerance {
        cfg.tolerance = t;
    }

    Ok(cfg)
}

fn build_job(args: &Args) -> Result<Job>
{
    let mut file = match &args.request {
        Some(path) => RequestFile::load(path)?,
        None => RequestFile::default(),
    };

    let catalog = load_catalog(args)?;
    let config = build_config(args, &mut file)?;
    let engine = OptimizationEngine::new(config)?;

    let initial = match (&args.initial, &file.initial) {
        (Some(name), _) => {
            let mass = args.mass.or(file.initial.as_ref().map(|i| i.mass)).unwrap_or(100.);
            presets::initial(name, mass)?
        },
        (None, Some(sec)) => {
            let init = sec.build().context("initial melt")?;
            match args.mass {
                Some(mass) => InitialComposition::new(init.name(), init.composition().clone(), mass)?,
                None => init,
            }
        },
        (None, None) => bail!("no initial melt; give --initial or an [initial] table"),
    };

    let targets: Vec<TargetSpec> = if !args.targets.is_empty() {
        args.targets.iter().map(|n| presets::target(n)).collect::<gokin::Result<_>>()?
    }
    else {
        file.targets.iter().map(|t| t.build()).collect::<Result<_>>()?
    };
    if targets.is_empty() {
        bail!("no target; give --target or targets in the request file");
    }

    let candidates: Vec<String> = if !args.alloys.is_empty() {
        args.alloys.clone()
    }
    else if !file.candidates.is_empty() {
        file.candidates.clone()
    }
    else {
        catalog.names().map(|n| n.to_string()).collect()
    };

    let mut registry = AlloyRegistry::new();
    for name in candidates.iter() {
        registry.register(catalog.master_alloy(name)?)
            .with_context(|| format!("candidate {}", name))?;
    }

    let mut caps: BTreeMap<String, f64> = file.max_addition.clone();
    caps.extend(args.max_addition.iter().cloned());
    let max_total = args.max_total.or(file.max_total_addition);

    let requests = targets.into_iter()
        .map(|target| AdditionRequest {
            initial: initial.clone(),
            target,
            candidates: candidates.clone(),
            max_addition: caps.clone(),
            max_total_addition: max_total,
        })
        .collect();

    Ok(Job { engine, registry, requests })
}

fn list<W: Write>(w: &mut W, catalog: &Catalog) -> std::io::Result<()>
{
    writeln!(w, "targets:  {}", gokin::presets::TARGETS.join(", "))?;
    writeln!(w, "initials: {}", gokin::presets::INITIALS.join(", "))?;
    writeln!(w, "catalog:")?;
    for name in catalog.names() {
        if let Some(e) = catalog.get(name) {
            match e.unit_cost {
                Some(c) => writeln!(w, "  {:<20} {:>8.2}/kg  {}", name, c, e.composition)?,
                None => writeln!(w, "  {:<20} {:>11}  {}", name, "", e.composition)?,
            }
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<ExitCode>
{
    let mut out = std::io::stdout().lock();

    if args.list {
        list(&mut out, &load_catalog(&args)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    let job = build_job(&args)?;
    log::debug!("{:?}", job.engine.config());

    let mut analyses = Vec::new();
    if args.analyze {
        let alloys: Vec<&MasterAlloy> = job.registry.iter().collect();
        for req in job.requests.iter() {
            let a = analysis::analyze(&req.initial, &req.target, &alloys);
            if !args.json {
                report::write_analysis(&mut out, &req.target, &a)?;
                writeln!(out)?;
            }
            analyses.push(a);
        }
    }

    let rslts = if job.requests.len() == 1 {
        vec![job.engine.solve(&job.registry, &job.requests[0])]
    }
    else {
        batch::solve_all(&job.engine, &job.registry, &job.requests)
    };

    let mut all_ok = true;
    let mut done = Vec::new();
    for (r, req) in rslts.into_iter().zip(&job.requests) {
        let r = r.with_context(|| format!("target {}", req.target.name()))?;
        all_ok &= r.success();
        done.push((r, req));
    }

    if args.json {
        let v: Vec<&OptimizationResult> = done.iter().map(|(r, _)| r).collect();
        report::write_json(&mut out, &v, &analyses)?;
        writeln!(out)?;
    }
    else {
        for (i, (r, req)) in done.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            report::write_result(&mut out, r, &req.target)?;
        }
    }

    Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

/// main
fn main() -> ExitCode
{
    env_logger::init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        },
    }
}

//

#[test]
fn test_parse_cap1()
{
    assert_eq!(parse_cap("Si-Al 99%=20").unwrap(), ("Si-Al 99%".to_string(), 20.));
    assert_eq!(parse_cap(" Pure Al = 1.5 ").unwrap(), ("Pure Al".to_string(), 1.5));
    assert!(parse_cap("Si-Al 99%").is_err());
    assert!(parse_cap("Si-Al 99%=lots").is_err());
}

#[test]
fn test_build_job1()
{
    let args = Args::parse_from([
        "gokin", "-i", "2ord", "-m", "50",
        "-t", "LM2", "-t", "A380",
        "-a", "Cu-Al 100%", "-a", "Si-Al 99%",
        "--max-addition", "Si-Al 99%=8",
        "--method", "AugLag", "--objective", "mass",
    ]);
    let job = build_job(&args).unwrap();

    assert_eq!(job.engine.config().method, Method::AugLag);
    assert_eq!(job.registry.len(), 2);
    assert_eq!(job.requests.len(), 2);
    assert_eq!(job.requests[1].target.name(), "A380");
    assert_eq!(job.requests[0].initial.mass(), 50.);
    assert_eq!(job.requests[0].max_addition.get("Si-Al 99%"), Some(&8.));

    // every catalog entry by default
    let args = Args::parse_from(["gokin", "-i", "2ORD", "-t", "LM2"]);
    let job = build_job(&args).unwrap();
    assert_eq!(job.registry.len(), Catalog::builtin().len());
    assert_eq!(job.requests[0].initial.mass(), 100.);

    assert!(build_job(&Args::parse_from(["gokin", "-t", "LM2"])).is_err());
    assert!(build_job(&Args::parse_from(["gokin", "-i", "2ORD"])).is_err());
    assert!(build_job(&Args::parse_from(["gokin", "-i", "2ORD", "-t", "LM2", "-a", "bogus"])).is_err());
    assert!(build_job(&Args::parse_from(["gokin", "-i", "2ORD", "-t", "LM2", "--tolerance=-1"])).is_err());
}
