//! Command-line arguments

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use planning_engine::{DifficultyFilter, TypeFilter};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_JOURNAL_PATH: &str = "stargazing-journal.json";

#[derive(Parser, Debug)]
#[command(
    name = "stargazer",
    version,
    about = "Plan an evening of observing: moon conditions, targets, session plan and optics"
)]
pub struct Cli {
    /// Journal file
    #[arg(long, global = true, env = "STARGAZER_JOURNAL", default_value = DEFAULT_JOURNAL_PATH)]
    pub journal: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Conditions, visible targets and the session plan for a date
    Plan(PlanArgs),
    /// Magnification, focal ratio and exit pupil for an instrument
    Optics(OpticsArgs),
    /// Star field points for the sky preview
    Starfield(StarfieldArgs),
    /// Observing journal
    #[command(subcommand)]
    Journal(JournalCommand),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Observing date (YYYY-MM-DD), evaluated at 20:00 UTC; defaults to today's local date
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Object type: all, planet, star, deep-sky
    #[arg(short = 't', long = "type", default_value = "all")]
    pub object_type: TypeFilter,

    /// Difficulty: all, easy, moderate, challenging
    #[arg(short = 'D', long, default_value = "all")]
    pub difficulty: DifficultyFilter,

    /// Catalog JSON file instead of the built-in catalog
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Extra plan step as "TIME|NAME" or "TIME|NAME|NOTE" (repeatable)
    #[arg(short = 'a', long = "add-target")]
    pub add_target: Vec<ExtraTarget>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OpticsArgs {
    /// Aperture in mm
    #[arg(long, default_value_t = 0.0)]
    pub aperture: f64,

    /// Telescope focal length in mm
    #[arg(long, default_value_t = 0.0)]
    pub focal_length: f64,

    /// Eyepiece focal length in mm
    #[arg(long, default_value_t = 0.0)]
    pub eyepiece: f64,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StarfieldArgs {
    /// Date to seed the field (YYYY-MM-DD), evaluated at 20:00 UTC; defaults to today's local date
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    #[arg(long, default_value_t = 400.0)]
    pub height: f64,

    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// Show logged observations, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Log an observation
    Add {
        #[arg(long)]
        target: String,

        /// 1 (poor) to 5 (excellent)
        #[arg(long)]
        rating: u8,

        #[arg(long, default_value = "")]
        instrument: String,

        #[arg(long, default_value = "")]
        notes: String,

        /// Date to record, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

/// A user-added plan step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraTarget {
    pub time: String,
    pub name: String,
    pub note: Option<String>,
}

impl FromStr for ExtraTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '|').map(str::trim);
        let time = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if time.is_empty() || name.is_empty() {
            return Err(format!("expected \"TIME|NAME[|NOTE]\", got {:?}", s));
        }
        Ok(Self {
            time: time.to_string(),
            name: name.to_string(),
            note: parts.next().filter(|n| !n.is_empty()).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_target_parsing() {
        let t: ExtraTarget = "01:10|M13|averted vision".parse().unwrap();
        assert_eq!(t.time, "01:10");
        assert_eq!(t.name, "M13");
        assert_eq!(t.note.as_deref(), Some("averted vision"));

        let t: ExtraTarget = " 02:00 | Vega ".parse().unwrap();
        assert_eq!(t.name, "Vega");
        assert!(t.note.is_none());

        assert!("02:00".parse::<ExtraTarget>().is_err());
        assert!("|Vega".parse::<ExtraTarget>().is_err());
    }

    #[test]
    fn test_date_help_names_evaluation_instant() {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        for sub in ["plan", "starfield"] {
            let help = cmd
                .find_subcommand_mut(sub)
                .unwrap()
                .render_help()
                .to_string();
            assert!(help.contains("20:00 UTC"), "{}: {}", sub, help);
            assert!(help.contains("local date"), "{}: {}", sub, help);
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
