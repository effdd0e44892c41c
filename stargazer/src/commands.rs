//! Command execution and output rendering
//!
//! Every command writes its result to the given writer so the binary can
//! print to stdout and tests can capture the output. Logging goes to the
//! tracing subscriber and never to the writer.

use crate::cli::{Cli, Command, JournalCommand, OpticsArgs, PlanArgs, StarfieldArgs};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use observing_journal::{JournalEntry, JournalStore};
use planning_engine::{
    builtin_catalog, catalog::load_catalog, compute_conditions, compute_optics, filter_objects,
    generate_plan, generate_star_field, observing_evening, starfield::HORIZON_BAND_PX,
    CelestialObject, DifficultyFilter, ObservationConditions, SessionPlan, TypeFilter,
};
use serde::Serialize;
use std::io::Write;
use tracing::info;

pub const NO_TARGETS_MESSAGE: &str = "No matching targets for this date/filter. Try changing filters.";
pub const NO_OPTICS_MESSAGE: &str =
    "Insufficient data: aperture, focal length and eyepiece must all be positive.";
pub const EMPTY_JOURNAL_MESSAGE: &str = "No observations yet. Add your first log entry tonight.";

/// Everything produced for one planning request
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub conditions: ObservationConditions,
    pub type_filter: String,
    pub difficulty_filter: String,
    pub targets: Vec<CelestialObject>,
    pub plan: SessionPlan,
}

pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::Plan(args) => run_plan(args, out),
        Command::Optics(args) => run_optics(args, out),
        Command::Starfield(args) => run_starfield(args, out),
        Command::Journal(cmd) => {
            let mut store = JournalStore::open(&cli.journal);
            run_journal(cmd, &mut store, out)
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Conditions → visibility → plan for one evening
pub fn build_report(
    date: NaiveDate,
    catalog: &[CelestialObject],
    type_filter: TypeFilter,
    difficulty_filter: DifficultyFilter,
) -> PlanReport {
    let instant = observing_evening(date);
    let conditions = compute_conditions(instant);
    let targets = filter_objects(catalog, conditions.month, type_filter, difficulty_filter);
    let plan = generate_plan(instant, &conditions, &targets);

    PlanReport {
        conditions,
        type_filter: type_filter.to_string(),
        difficulty_filter: difficulty_filter.to_string(),
        targets,
        plan,
    }
}

fn run_plan(args: &PlanArgs, out: &mut impl Write) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("Failed to load catalog {:?}", path))?,
        None => builtin_catalog(),
    };

    let date = args.date.unwrap_or_else(today);
    info!("Planning {} against {} catalog objects", date, catalog.len());

    let mut report = build_report(date, &catalog, args.object_type, args.difficulty);
    for extra in &args.add_target {
        report
            .plan
            .append_target(&extra.name, &extra.time, extra.note.as_deref());
    }

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_plan_text(&report, out)?;
    }
    Ok(())
}

pub fn write_plan_text(report: &PlanReport, out: &mut impl Write) -> Result<()> {
    let c = &report.conditions;

    writeln!(out, "CONDITIONS")?;
    writeln!(out, "  Moon:      {} ({}% illum.)", c.phase, c.illumination_percent)?;
    writeln!(out, "  Darkness:  {}", c.darkness_window)?;
    writeln!(out, "  Seeing:    {}", c.seeing_hint)?;
    writeln!(out, "  Sky:       {}", c.sky_quality_suggestion)?;
    writeln!(out, "  {}", c.summary)?;
    writeln!(out)?;

    writeln!(
        out,
        "TARGETS (type: {}, difficulty: {})",
        report.type_filter, report.difficulty_filter
    )?;
    if report.targets.is_empty() {
        writeln!(out, "  {}", NO_TARGETS_MESSAGE)?;
    }
    for obj in &report.targets {
        writeln!(out, "  {} · {} · {}", obj.name, obj.difficulty, obj.altitude_hint)?;
        writeln!(out, "      {}", obj.note)?;
    }
    writeln!(out)?;

    writeln!(out, "SESSION PLAN")?;
    write!(out, "{}", report.plan)?;
    Ok(())
}

fn run_optics(args: &OpticsArgs, out: &mut impl Write) -> Result<()> {
    let result = compute_optics(args.aperture, args.focal_length, args.eyepiece);

    match (result, args.json) {
        (Some(r), true) => {
            serde_json::to_writer_pretty(&mut *out, &r)?;
            writeln!(out)?;
        }
        (Some(r), false) => write!(out, "{}", r)?,
        (None, true) => writeln!(out, "null")?,
        (None, false) => writeln!(out, "{}", NO_OPTICS_MESSAGE)?,
    }
    Ok(())
}

fn run_starfield(args: &StarfieldArgs, out: &mut impl Write) -> Result<()> {
    let date = args.date.unwrap_or_else(today);
    let conditions = compute_conditions(observing_evening(date));
    let (month, day) = conditions.seed();
    let field = generate_star_field(month, day, args.width, args.height);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &field)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "Star field for {} (seed {}, {}x{}): {} stars",
        date,
        field.seed,
        field.width,
        field.height,
        field.stars.len()
    )?;
    writeln!(
        out,
        "Horizon band: y >= {:.0} (bottom {:.0} px)",
        field.horizon_y, HORIZON_BAND_PX
    )?;
    for star in &field.stars {
        writeln!(
            out,
            "  {:8.2} {:8.2}  r={:.2}{}",
            star.x,
            star.y,
            star.radius,
            if star.warm { "  warm" } else { "" }
        )?;
    }
    Ok(())
}

pub fn run_journal(cmd: &JournalCommand, store: &mut JournalStore, out: &mut impl Write) -> Result<()> {
    match cmd {
        JournalCommand::List { json } => {
            if *json {
                serde_json::to_writer_pretty(&mut *out, store.entries())?;
                writeln!(out)?;
                return Ok(());
            }
            if store.is_empty() {
                writeln!(out, "{}", EMPTY_JOURNAL_MESSAGE)?;
            }
            for entry in store.newest_first() {
                writeln!(out, "{} ({})", entry.target, entry.date)?;
                writeln!(
                    out,
                    "  Rating: {}/5 · Instrument: {}",
                    entry.rating, entry.instrument
                )?;
                if !entry.notes.is_empty() {
                    writeln!(out, "  {}", entry.notes)?;
                }
            }
        }
        JournalCommand::Add {
            target,
            rating,
            instrument,
            notes,
            date,
        } => {
            let date = date
                .clone()
                .unwrap_or_else(|| today().format("%Y-%m-%d").to_string());
            let entry = JournalEntry::new(&date, target, *rating, instrument, notes)?;
            store
                .append(entry)
                .with_context(|| format!("Failed to write journal {:?}", store.path()))?;
            writeln!(out, "Logged {} ({} entries)", target.trim(), store.len())?;
        }
    }
    Ok(())
}
