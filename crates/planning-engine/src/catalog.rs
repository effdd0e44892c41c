//! Embedded object catalog and catalog file loading

use crate::{CatalogError, CelestialObject, Difficulty, ObjectType, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// The built-in catalog, in display order
pub fn builtin_catalog() -> Vec<CelestialObject> {
    let mut objects = Vec::with_capacity(13);
    objects.extend(planets());
    objects.extend(deep_sky_and_stars());
    objects
}

fn planets() -> Vec<CelestialObject> {
    use Difficulty::*;
    use ObjectType::Planet;

    vec![
        CelestialObject::new(
            "Mercury",
            Planet,
            &[2, 3, 4, 9, 10, 11],
            Moderate,
            "Very low after sunset or before sunrise",
            "Look near the horizon during twilight with unobstructed views.",
        ),
        CelestialObject::new(
            "Venus",
            Planet,
            &[1, 2, 3, 4, 10, 11, 12],
            Easy,
            "Bright in the west or east twilight",
            "Use a moon filter to reduce glare and look for phases.",
        ),
        CelestialObject::new(
            "Mars",
            Planet,
            &[11, 12, 1, 2, 3],
            Moderate,
            "Reddish object in the eastern to southern sky",
            "Best detail appears near opposition with steady seeing.",
        ),
        CelestialObject::new(
            "Jupiter",
            Planet,
            &[8, 9, 10, 11, 12],
            Easy,
            "High in the southeast",
            "Great cloud bands and Galilean moons.",
        ),
        CelestialObject::new(
            "Saturn",
            Planet,
            &[7, 8, 9, 10],
            Easy,
            "South after dusk",
            "Try 120x+ to reveal rings and Cassini division.",
        ),
        CelestialObject::new(
            "Uranus",
            Planet,
            &[9, 10, 11, 12, 1],
            Challenging,
            "Aquarius/Aries region, use a chart",
            "Appears as a tiny blue-green disk at higher magnification.",
        ),
        CelestialObject::new(
            "Neptune",
            Planet,
            &[8, 9, 10, 11, 12],
            Challenging,
            "Low in Pisces/Aquarius, very dim",
            "Star-hopping and dark skies are essential.",
        ),
    ]
}

fn deep_sky_and_stars() -> Vec<CelestialObject> {
    use Difficulty::*;
    use ObjectType::{DeepSky, Star};

    vec![
        CelestialObject::new(
            "Andromeda Galaxy (M31)",
            DeepSky,
            &[9, 10, 11, 12],
            Moderate,
            "Northeast, overhead later",
            "Use low magnification and dark skies.",
        ),
        CelestialObject::new(
            "Orion Nebula (M42)",
            DeepSky,
            &[11, 12, 1, 2, 3],
            Easy,
            "South around midnight in winter",
            "A UHC filter can improve contrast.",
        ),
        CelestialObject::new(
            "Pleiades (M45)",
            Star,
            &[10, 11, 12, 1, 2],
            Easy,
            "East to southwest arc",
            "Best viewed with binoculars or a wide eyepiece.",
        ),
        CelestialObject::new(
            "Ring Nebula (M57)",
            DeepSky,
            &[5, 6, 7, 8, 9],
            Challenging,
            "Near zenith in summer",
            "Try medium magnification and steady seeing.",
        ),
        CelestialObject::new(
            "Albireo",
            Star,
            &[6, 7, 8, 9],
            Easy,
            "Cygnus high in summer",
            "Beautiful gold and blue double star.",
        ),
        CelestialObject::new(
            "Triangulum Galaxy (M33)",
            DeepSky,
            &[9, 10, 11, 12],
            Challenging,
            "High in autumn",
            "Requires dark sky and low magnification.",
        ),
    ]
}

/// Check the catalog invariants: non-empty, unique names, and every object
/// has at least one best month in 1..=12
pub fn validate_catalog(objects: &[CelestialObject]) -> Result<()> {
    if objects.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::with_capacity(objects.len());
    for obj in objects {
        if obj.name.trim().is_empty() {
            return Err(CatalogError::InvalidEntry {
                name: obj.name.clone(),
                reason: "name is empty".to_string(),
            });
        }
        if obj.best_months.is_empty() {
            return Err(CatalogError::InvalidEntry {
                name: obj.name.clone(),
                reason: "bestMonths is empty".to_string(),
            });
        }
        if let Some(bad) = obj.best_months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(CatalogError::InvalidEntry {
                name: obj.name.clone(),
                reason: format!("month {} outside 1-12", bad),
            });
        }
        if !seen.insert(obj.name.as_str()) {
            return Err(CatalogError::DuplicateName(obj.name.clone()));
        }
    }

    Ok(())
}

/// Load a catalog from a JSON array of objects
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CelestialObject>> {
    let path = path.as_ref();
    info!("Loading catalog from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let objects: Vec<CelestialObject> = serde_json::from_reader(reader)?;

    validate_catalog(&objects)?;

    for obj in &objects {
        debug!("  {} ({}, {})", obj.name, obj.object_type, obj.difficulty);
    }
    info!("Loaded {} catalog objects", objects.len());

    Ok(objects)
}
