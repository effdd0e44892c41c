//! Session plan generation
//!
//! A plan is always the same five-step evening:
//!
//! | Time | Step |
//! |------|------|
//! | 20:30 | setup and cooldown (35 min Oct-Feb, 20 min otherwise) |
//! | 21:15 | calibration on the first visible target |
//! | 22:00 | deep-sky run over the next three targets |
//! | 23:30 | high-power lunar/planetary pass |
//! | 00:MM | notes and sketches, MM = (day·3) mod 60 |
//!
//! Missing targets fall back to fixed names so a plan is always produced.

use crate::{CelestialObject, ObservationConditions};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Calibration target used when nothing matches the filters
pub const FALLBACK_CALIBRATION_TARGET: &str = "Jupiter";

/// Deep-sky run used when fewer than two targets match the filters
pub const FALLBACK_DEEP_SKY_RUN: &str = "Orion Nebula, Andromeda Galaxy";

const COLD_MONTH_COOLDOWN_MIN: u32 = 35;
const WARM_MONTH_COOLDOWN_MIN: u32 = 20;
const DEEP_SKY_RUN_LEN: usize = 3;

/// Ordered, timestamped plan steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionPlan {
    steps: Vec<String>,
}

impl SessionPlan {
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a user-chosen target to the end of the plan.
    ///
    /// Returns false and leaves the plan unchanged when the name or time is
    /// blank.
    pub fn append_target(&mut self, name: &str, time: &str, note: Option<&str>) -> bool {
        let name = name.trim();
        let time = time.trim();
        if name.is_empty() || time.is_empty() {
            return false;
        }

        let step = match note.map(str::trim).filter(|n| !n.is_empty()) {
            Some(note) => format!("{} - {} ({})", time, name, note),
            None => format!("{} - {}", time, name),
        };
        self.steps.push(step);
        true
    }
}

impl fmt::Display for SessionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "{:>2}. {}", i + 1, step)?;
        }
        Ok(())
    }
}

impl IntoIterator for SessionPlan {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Thermal equilibration time for the optics
fn cooldown_minutes(month: u32) -> u32 {
    if month >= 10 || month <= 2 {
        COLD_MONTH_COOLDOWN_MIN
    } else {
        WARM_MONTH_COOLDOWN_MIN
    }
}

/// Per-date minute for the closing notes step
fn notes_minute(day: u32) -> u32 {
    (day * 3) % 60
}

/// Build the five-step plan for an evening
pub fn generate_plan(
    date: DateTime<Utc>,
    conditions: &ObservationConditions,
    filtered: &[CelestialObject],
) -> SessionPlan {
    let month = date.month();
    let day = date.day();

    let calibration = filtered
        .first()
        .map(|o| o.name.as_str())
        .unwrap_or(FALLBACK_CALIBRATION_TARGET);

    let deep_sky: Vec<&str> = filtered
        .iter()
        .skip(1)
        .take(DEEP_SKY_RUN_LEN)
        .map(|o| o.name.as_str())
        .collect();
    let deep_sky = if deep_sky.is_empty() {
        FALLBACK_DEEP_SKY_RUN.to_string()
    } else {
        deep_sky.join(", ")
    };

    debug!(
        "Plan for {}-{:02}: {} targets, moon {}%",
        month,
        day,
        filtered.len(),
        conditions.illumination_percent
    );

    SessionPlan {
        steps: vec![
            format!(
                "20:30 - Setup and polar alignment (allow optics to cool for {} min).",
                cooldown_minutes(month)
            ),
            format!("21:15 - Start with easy calibration target: {}.", calibration),
            format!("22:00 - Deep-sky run: {}.", deep_sky),
            "23:30 - High-power lunar/planetary pass if seeing remains steady.".to_string(),
            format!(
                "00:{:02} - Capture notes and sketches while memory is fresh.",
                notes_minute(day)
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builtin_catalog, compute_conditions, filter_objects, observing_evening, DifficultyFilter,
        TypeFilter,
    };
    use chrono::NaiveDate;

    fn evening(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        observing_evening(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn plan_for(date: DateTime<Utc>, filtered: &[CelestialObject]) -> SessionPlan {
        let conditions = compute_conditions(date);
        generate_plan(date, &conditions, filtered)
    }

    #[test]
    fn test_november_plan_uses_targets() {
        let date = evening(2025, 11, 14);
        let catalog = builtin_catalog();
        let visible = filter_objects(&catalog, 11, TypeFilter::All, DifficultyFilter::All);
        let plan = plan_for(date, &visible);

        assert_eq!(plan.len(), 5);
        assert_eq!(
            plan.steps()[0],
            "20:30 - Setup and polar alignment (allow optics to cool for 35 min)."
        );
        assert_eq!(plan.steps()[1], "21:15 - Start with easy calibration target: Mercury.");
        assert_eq!(plan.steps()[2], "22:00 - Deep-sky run: Venus, Mars, Jupiter.");
        assert_eq!(
            plan.steps()[3],
            "23:30 - High-power lunar/planetary pass if seeing remains steady."
        );
        assert_eq!(
            plan.steps()[4],
            "00:42 - Capture notes and sketches while memory is fresh."
        );
    }

    #[test]
    fn test_fallbacks_when_nothing_matches() {
        let plan = plan_for(evening(2025, 6, 20), &[]);

        assert_eq!(
            plan.steps()[0],
            "20:30 - Setup and polar alignment (allow optics to cool for 20 min)."
        );
        assert_eq!(plan.steps()[1], "21:15 - Start with easy calibration target: Jupiter.");
        assert_eq!(
            plan.steps()[2],
            "22:00 - Deep-sky run: Orion Nebula, Andromeda Galaxy."
        );
    }

    #[test]
    fn test_single_target_falls_back_for_deep_sky() {
        let catalog = builtin_catalog();
        let plan = plan_for(evening(2025, 7, 4), &catalog[..1]);
        assert_eq!(plan.steps()[1], "21:15 - Start with easy calibration target: Mercury.");
        assert_eq!(
            plan.steps()[2],
            "22:00 - Deep-sky run: Orion Nebula, Andromeda Galaxy."
        );
    }

    #[test]
    fn test_cooldown_months() {
        for month in [10, 11, 12, 1, 2] {
            assert_eq!(cooldown_minutes(month), 35, "month {}", month);
        }
        for month in 3..=9 {
            assert_eq!(cooldown_minutes(month), 20, "month {}", month);
        }
    }

    #[test]
    fn test_cooldown_changes_between_february_and_march() {
        let february = plan_for(evening(2025, 2, 28), &[]);
        let march = plan_for(evening(2025, 3, 1), &[]);
        assert_eq!(
            february.steps()[0],
            "20:30 - Setup and polar alignment (allow optics to cool for 35 min)."
        );
        assert_eq!(
            march.steps()[0],
            "20:30 - Setup and polar alignment (allow optics to cool for 20 min)."
        );

        let september = plan_for(evening(2025, 9, 30), &[]);
        let october = plan_for(evening(2025, 10, 1), &[]);
        assert!(september.steps()[0].contains("cool for 20 min"));
        assert!(october.steps()[0].contains("cool for 35 min"));
    }

    #[test]
    fn test_notes_minute_for_every_day() {
        for day in 1..=31 {
            let plan = plan_for(evening(2025, 1, day), &[]);
            assert_eq!(plan.len(), 5);
            let expected = format!("00:{:02} - ", (day * 3) % 60);
            assert!(
                plan.steps()[4].starts_with(&expected),
                "day {}: {}",
                day,
                plan.steps()[4]
            );
        }
    }

    #[test]
    fn test_append_target() {
        let mut plan = plan_for(evening(2025, 8, 1), &[]);

        assert!(plan.append_target("M13", "01:10", Some("  try averted vision ")));
        assert!(plan.append_target("Vega", "01:30", None));
        assert!(plan.append_target("Deneb", "01:45", Some("   ")));
        assert!(!plan.append_target("  ", "02:00", None));
        assert!(!plan.append_target("Altair", "", None));

        assert_eq!(plan.len(), 8);
        assert_eq!(plan.steps()[5], "01:10 - M13 (try averted vision)");
        assert_eq!(plan.steps()[6], "01:30 - Vega");
        assert_eq!(plan.steps()[7], "01:45 - Deneb");
    }

    #[test]
    fn test_display_numbers_steps() {
        let plan = plan_for(evening(2025, 3, 2), &[]);
        let text = plan.to_string();
        assert!(text.starts_with(" 1. 20:30 - Setup"));
        assert_eq!(text.lines().count(), 5);
    }
}
