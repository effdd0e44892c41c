//! Seasonal visibility filtering

use crate::{CelestialObject, Difficulty, ObjectType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} filter {value:?} (expected one of: {expected})")]
pub struct FilterParseError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Object type constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ObjectType),
}

impl TypeFilter {
    pub fn matches(&self, object_type: ObjectType) -> bool {
        match self {
            Self::All => true,
            Self::Only(t) => *t == object_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "planet" => Ok(Self::Only(ObjectType::Planet)),
            "star" => Ok(Self::Only(ObjectType::Star)),
            "deep-sky" => Ok(Self::Only(ObjectType::DeepSky)),
            _ => Err(FilterParseError {
                kind: "type",
                value: s.to_string(),
                expected: "all, planet, star, deep-sky",
            }),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(t) => fmt::Display::fmt(t, f),
        }
    }
}

/// Difficulty constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn matches(&self, difficulty: Difficulty) -> bool {
        match self {
            Self::All => true,
            Self::Only(d) => *d == difficulty,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "easy" => Ok(Self::Only(Difficulty::Easy)),
            "moderate" => Ok(Self::Only(Difficulty::Moderate)),
            "challenging" => Ok(Self::Only(Difficulty::Challenging)),
            _ => Err(FilterParseError {
                kind: "difficulty",
                value: s.to_string(),
                expected: "all, easy, moderate, challenging",
            }),
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(d) => fmt::Display::fmt(d, f),
        }
    }
}

/// Select the catalog objects that are well placed in `month` and pass both
/// filters. Catalog order is preserved; an empty result is not an error.
pub fn filter_objects(
    catalog: &[CelestialObject],
    month: u32,
    type_filter: TypeFilter,
    difficulty_filter: DifficultyFilter,
) -> Vec<CelestialObject> {
    let visible: Vec<CelestialObject> = catalog
        .iter()
        .filter(|obj| {
            obj.is_well_placed_in(month)
                && type_filter.matches(obj.object_type)
                && difficulty_filter.matches(obj.difficulty)
        })
        .cloned()
        .collect();

    debug!(
        "Month {} type={} difficulty={}: {} of {} objects visible",
        month,
        type_filter,
        difficulty_filter,
        visible.len(),
        catalog.len()
    );

    visible
}
