//! Stargazer Planning Engine
//!
//! Turns a calendar date and a static catalog of celestial objects into
//! moon/sky conditions, a seasonally filtered target list and a fixed
//! five-step observing session plan. The optics calculator is independent
//! and works from instrument parameters alone.
//!
//! # Pipeline
//!
//! ```text
//! date ──► conditions::compute_conditions ──► (month, day)
//!                                              │
//! catalog ──► visibility::filter_objects ◄─────┘
//!                    │
//!                    ▼
//!            plan::generate_plan ──► SessionPlan
//! ```
//!
//! | Stage | Output | Notes |
//! |-------|--------|-------|
//! | Conditions | `ObservationConditions` | synthetic 29.53-day moon cycle, not an ephemeris |
//! | Visibility | `Vec<CelestialObject>` | catalog order preserved, empty is a normal result |
//! | Plan | `SessionPlan` | always five steps, fallbacks when no targets match |
//! | Optics | `Option<OpticsResult>` | abstains on zero or missing inputs |
//!
//! Everything here is a pure, synchronous computation. The only I/O is
//! [`catalog::load_catalog`] for caller-supplied catalog files.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod catalog;
pub mod conditions;
pub mod optics;
pub mod plan;
pub mod starfield;
pub mod visibility;

pub use catalog::builtin_catalog;
pub use conditions::{compute_conditions, observing_evening, MoonPhase, ObservationConditions};
pub use optics::{compute_optics, OpticsResult};
pub use plan::{generate_plan, SessionPlan};
pub use starfield::{generate_star_field, StarField, StarPoint};
pub use visibility::{filter_objects, DifficultyFilter, TypeFilter};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog contains no objects")]
    Empty,
    #[error("Invalid catalog entry {name:?}: {reason}")]
    InvalidEntry { name: String, reason: String },
    #[error("Duplicate catalog entry: {0}")]
    DuplicateName(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Broad object classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    Planet,
    Star,
    DeepSky,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planet => "planet",
            Self::Star => "star",
            Self::DeepSky => "deep-sky",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How hard an object is to find and see, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Challenging,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Challenging => "challenging",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry
///
/// Field names on the wire follow the catalog file format
/// (`type`, `bestMonths`, `altitudeHint`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelestialObject {
    pub name: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Calendar months (1-12) in which the object is well placed
    pub best_months: Vec<u8>,
    pub difficulty: Difficulty,
    pub altitude_hint: String,
    pub note: String,
}

impl CelestialObject {
    pub fn new(
        name: &str,
        object_type: ObjectType,
        best_months: &[u8],
        difficulty: Difficulty,
        altitude_hint: &str,
        note: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            object_type,
            best_months: best_months.to_vec(),
            difficulty,
            altitude_hint: altitude_hint.to_string(),
            note: note.to_string(),
        }
    }

    /// True when `month` is one of the object's best months
    pub fn is_well_placed_in(&self, month: u32) -> bool {
        self.best_months.iter().any(|&m| u32::from(m) == month)
    }
}
