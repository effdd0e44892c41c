//! Moon phase and sky conditions for an observing date
//!
//! The lunar model is a synthetic synodic cycle anchored to a reference new
//! moon. It is good enough to tell a dark night from a bright one; it is not
//! an ephemeris and drifts by up to a day from the real phase.
//!
//! ```text
//! cycle        = (days_since_unix_epoch + 4.867) mod 29.53
//! illumination = round((1 - cos(2π · cycle / 29.53)) · 50)
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

/// Mean synodic month in days
pub const SYNODIC_MONTH_DAYS: f64 = 29.53;

/// Offset in days that puts a new moon at cycle day 0
pub const NEW_MOON_OFFSET_DAYS: f64 = 4.867;

/// Cycle days below this are waxing, the rest waning
pub const WAXING_LIMIT_DAYS: f64 = 14.7;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Local hour used when a bare calendar date is planned
const EVENING_HOUR: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl MoonPhase {
    /// Band an illumination percentage into a named phase
    ///
    /// | illumination | waxing | waning |
    /// |---|---|---|
    /// | ≤10 | New Moon | New Moon |
    /// | 11-39 | Waxing Crescent | Waning Crescent |
    /// | 40-59 | First Quarter | Last Quarter |
    /// | 60-94 | Waxing Gibbous | Waning Gibbous |
    /// | ≥95 | Full Moon | Full Moon |
    pub fn from_illumination(illumination_percent: u8, waxing: bool) -> Self {
        match (illumination_percent, waxing) {
            (0..=10, _) => Self::NewMoon,
            (11..=39, true) => Self::WaxingCrescent,
            (11..=39, false) => Self::WaningCrescent,
            (40..=59, true) => Self::FirstQuarter,
            (40..=59, false) => Self::LastQuarter,
            (60..=94, true) => Self::WaxingGibbous,
            (60..=94, false) => Self::WaningGibbous,
            _ => Self::FullMoon,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hours of usable darkness as local clock times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DarknessWindow {
    pub start: &'static str,
    pub end: &'static str,
}

impl DarknessWindow {
    /// Seasonal twilight at a fixed mid-northern latitude: April through
    /// September get the short summer night
    pub fn for_month(month: u32) -> Self {
        if (4..=9).contains(&month) {
            Self { start: "22:00", end: "04:30" }
        } else {
            Self { start: "19:30", end: "05:45" }
        }
    }
}

impl fmt::Display for DarknessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Conditions for one observing date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationConditions {
    pub date: DateTime<Utc>,
    /// Calendar month, 1-12
    pub month: u32,
    /// Day of month, 1-31
    pub day: u32,
    /// Position in the synthetic synodic month, [0, 29.53)
    pub moon_cycle_day: f64,
    /// Lit fraction of the lunar disk, 0-100
    pub illumination_percent: u8,
    pub phase: MoonPhase,
    pub darkness_window: DarknessWindow,
    pub seeing_hint: &'static str,
    pub sky_quality_suggestion: &'static str,
    pub summary: String,
}

impl ObservationConditions {
    pub fn is_waxing(&self) -> bool {
        self.moon_cycle_day < WAXING_LIMIT_DAYS
    }

    /// The `(month, day)` pair that seeds target filtering and the star field
    pub fn seed(&self) -> (u32, u32) {
        (self.month, self.day)
    }
}

/// The instant evaluated when planning a bare calendar date: 20:00 that day
pub fn observing_evening(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) + Duration::hours(EVENING_HOUR)).and_utc()
}

/// Position in the synthetic synodic month for an instant
pub fn moon_cycle_day(date: DateTime<Utc>) -> f64 {
    let epoch_days = date.timestamp_millis() as f64 / MILLIS_PER_DAY;
    let cycle = (epoch_days + NEW_MOON_OFFSET_DAYS).rem_euclid(SYNODIC_MONTH_DAYS);
    // rem_euclid can round up to the modulus itself
    if cycle >= SYNODIC_MONTH_DAYS {
        0.0
    } else {
        cycle
    }
}

/// Illuminated percentage for a cycle day: 0 at new moon, 100 at full
pub fn illumination_percent(cycle_day: f64) -> u8 {
    let angle = 2.0 * PI * cycle_day / SYNODIC_MONTH_DAYS;
    ((1.0 - angle.cos()) * 50.0).round().clamp(0.0, 100.0) as u8
}

pub fn seeing_hint(illumination_percent: u8) -> &'static str {
    if illumination_percent > 85 {
        "Fair (bright moon)"
    } else if illumination_percent > 50 {
        "Good"
    } else {
        "Excellent"
    }
}

pub fn sky_quality_suggestion(illumination_percent: u8) -> &'static str {
    if illumination_percent > 85 {
        "Aim for Bortle 4 or better"
    } else {
        "Bortle 5+ can still work for brighter targets"
    }
}

/// Compute moon and sky conditions for an instant
pub fn compute_conditions(date: DateTime<Utc>) -> ObservationConditions {
    let cycle = moon_cycle_day(date);
    let illumination = illumination_percent(cycle);
    let phase = MoonPhase::from_illumination(illumination, cycle < WAXING_LIMIT_DAYS);
    let month = date.month();

    debug!(
        "Conditions for {}: cycle day {:.3}, {}% ({})",
        date, cycle, illumination, phase
    );

    ObservationConditions {
        date,
        month,
        day: date.day(),
        moon_cycle_day: cycle,
        illumination_percent: illumination,
        phase,
        darkness_window: DarknessWindow::for_month(month),
        seeing_hint: seeing_hint(illumination),
        sky_quality_suggestion: sky_quality_suggestion(illumination),
        summary: format!(
            "On {}, expect best contrast around local midnight. \
             Prioritize faint galaxies when moon illumination is below 50%.",
            date.format("%a %b %d %Y")
        ),
    }
}
