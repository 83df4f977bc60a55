//! Route-based RC extraction: builds and reduces the parasitic network of
//! every routed net in a layout database.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use opensilicon_core::{LayoutDatabase, Net};
use opensilicon_io::{
    load_database, write_outcomes, IoError, NetOutcome, ProjectMeta, ProjectSettings, RouteFile,
};
use opensilicon_parasitics::memory::InMemoryEngine;
use opensilicon_parasitics::{Corner, NetParasiticBuilder};

#[derive(Parser)]
#[command(name = "opensilicon-rcx")]
#[command(about = "Build RC parasitic networks from routed nets", long_about = None)]
#[command(version)]
struct Cli {
    /// Layout database (JSON)
    #[arg(long, value_name = "FILE")]
    database: PathBuf,

    /// Router output (JSON)
    #[arg(long, value_name = "FILE")]
    routes: PathBuf,

    /// Project metadata with corner and extraction settings
    #[arg(long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Only extract these nets
    #[arg(long = "net", value_name = "NAME")]
    nets: Vec<String>,

    /// Override the project's corner
    #[arg(long)]
    corner: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Returns `Ok(false)` when at least one net failed to build.
fn run(cli: &Cli) -> Result<bool, String> {
    let db = load_database(&cli.database).map_err(|e| e.to_string())?;
    let routes = RouteFile::load(&cli.routes).map_err(|e| e.to_string())?;
    let settings = load_settings(cli.project.as_deref(), cli.corner.as_deref())?;

    let nets = select_nets(&db, &cli.nets).map_err(|e| e.to_string())?;
    let mut engine = InMemoryEngine::new();
    let outcomes = extract(&mut engine, &db, &routes, &settings, &nets);

    let failures = outcomes.iter().filter(|o| o.is_failure()).count();
    let flagged = outcomes
        .iter()
        .filter_map(|o| o.report.as_ref())
        .filter(|r| r.has_warnings())
        .count();
    if flagged > 0 {
        log::warn!("{} nets were built with route warnings", flagged);
    }
    log::info!(
        "extracted {} of {} nets at corner {}",
        outcomes.len() - failures,
        outcomes.len(),
        settings.corner.name
    );

    write_outcomes(io::stdout().lock(), &outcomes).map_err(|e| e.to_string())?;
    Ok(all_built(&outcomes))
}

fn all_built(outcomes: &[NetOutcome]) -> bool {
    outcomes.iter().all(|o| !o.is_failure())
}

fn load_settings(project: Option<&Path>, corner: Option<&str>) -> Result<ProjectSettings, String> {
    let mut settings = match project {
        Some(path) => ProjectMeta::load(path).map_err(|e| e.to_string())?.settings,
        None => ProjectSettings::default(),
    };
    if let Some(name) = corner {
        settings.corner = Corner::new(name, settings.corner.index);
    }
    Ok(settings)
}

/// Nets to extract, in database order or in the order they were requested.
fn select_nets<'a>(db: &'a LayoutDatabase, filter: &[String]) -> Result<Vec<&'a Net>, IoError> {
    if filter.is_empty() {
        return Ok(db.nets().iter().collect());
    }
    filter
        .iter()
        .map(|name| {
            db.find_net(name)
                .ok_or_else(|| IoError::UnknownNet(name.clone()))
        })
        .collect()
}

/// One outcome per net, in the order of `nets`. A net without a route is
/// reported as failed and does not stop the others.
fn extract(
    engine: &mut InMemoryEngine,
    db: &LayoutDatabase,
    routes: &RouteFile,
    settings: &ProjectSettings,
    nets: &[&Net],
) -> Vec<NetOutcome> {
    let mut outcomes: Vec<Option<NetOutcome>> = vec![None; nets.len()];
    let mut positions = Vec::with_capacity(nets.len());
    let mut jobs = Vec::with_capacity(nets.len());
    for (position, &net) in nets.iter().enumerate() {
        match routes.require(&net.name) {
            Ok(segments) => {
                positions.push(position);
                jobs.push((net, segments));
            }
            Err(e) => {
                log::warn!("{}", e);
                outcomes[position] = Some(NetOutcome::failed(&net.name, e));
            }
        }
    }

    let results = NetParasiticBuilder::new(&mut *engine, db, settings.analysis_context())
        .with_config(settings.extraction.clone())
        .build_all(jobs);

    for (position, (name, result)) in positions.into_iter().zip(results) {
        outcomes[position] = Some(match result {
            Ok(report) => {
                let reduced = engine.reduced(&name).cloned();
                NetOutcome::built(report, reduced)
            }
            Err(e) => NetOutcome::failed(&name, e),
        });
    }
    outcomes.into_iter().flatten().collect()
}
