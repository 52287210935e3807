//! Body catalog loaded from `assets/bodies.toml`.
//!
//! The catalog is the single startup input that defines the scene: one
//! `[star]` table and any number of `[[planets]]` entries, each carrying
//! display metadata (name, description, fun fact) alongside the simulation
//! parameters (size, orbit radius, mass, hit points).
//!
//! ## Validation policy
//!
//! `orbit > 0`, `size > 0`, and `mass > 0` are fatal-to-that-body: an entry
//! that fails is skipped with an `error!` log and the rest of the catalog is
//! used (partial-load tolerance).  A zero-radius orbit in particular must
//! never reach the registry: it would put NaN into the body's position on
//! the first frame.  A missing or unparseable file degrades to the compiled
//! default catalog, also with a log line.

use crate::error::{SimError, SimResult};
use bevy::prelude::*;
use serde::Deserialize;

// ── Serde model ───────────────────────────────────────────────────────────────

/// One planet entry from `assets/bodies.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanetEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fun_fact: String,
    /// Linear RGB triplet used for the body's material.
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    /// Visual sphere radius; doubles as the collision radius.
    pub size: f32,
    /// Scripted orbit radius around the sun (world units).
    pub orbit: f32,
    /// Gravity-source weight.  A design constant, not kilograms.
    #[serde(default = "default_planet_mass")]
    pub mass: f32,
    /// Probe hits this body absorbs before it is depleted.
    #[serde(default = "default_planet_hp")]
    pub max_hp: u32,
}

/// The `[star]` entry from `assets/bodies.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StarEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fun_fact: String,
    #[serde(default = "default_star_color")]
    pub color: [f32; 3],
    pub size: f32,
    #[serde(default = "default_star_mass")]
    pub mass: f32,
    #[serde(default = "default_star_hp")]
    pub max_hp: u32,
}

/// Top-level document shape of `assets/bodies.toml`.
#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    star: StarEntry,
    #[serde(default)]
    planets: Vec<PlanetEntry>,
}

fn default_color() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}

fn default_star_color() -> [f32; 3] {
    [1.0, 0.85, 0.1]
}

fn default_planet_mass() -> f32 {
    40.0
}

fn default_star_mass() -> f32 {
    900.0
}

fn default_planet_hp() -> u32 {
    8
}

fn default_star_hp() -> u32 {
    20
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// Validated scene catalog: the star plus the planets that passed validation,
/// in file order.  Registry iteration order (sun first, then planets in this
/// order) is derived from it.
#[derive(Resource, Debug, Clone)]
pub struct BodyCatalog {
    pub star: StarEntry,
    pub planets: Vec<PlanetEntry>,
}

impl Default for BodyCatalog {
    /// The compiled-in scene: the Sun plus the four inner planets.
    fn default() -> Self {
        let planet = |name: &str, description: &str, fun_fact: &str, color, size, orbit, mass| {
            PlanetEntry {
                name: name.into(),
                description: description.into(),
                fun_fact: fun_fact.into(),
                color,
                size,
                orbit,
                mass,
                max_hp: default_planet_hp(),
            }
        };
        Self {
            star: StarEntry {
                name: "Sun".into(),
                description: "The star at the center of the system, providing light and heat to every planet.".into(),
                fun_fact: "The Sun holds about 99.8% of the system's mass; its core fuses hydrogen into helium every second.".into(),
                color: default_star_color(),
                size: 1.5,
                mass: default_star_mass(),
                max_hp: default_star_hp(),
            },
            planets: vec![
                planet(
                    "Mercury",
                    "The smallest and innermost planet in the Solar System.",
                    "A year on Mercury lasts only 88 Earth days, yet a single day lasts two of its years.",
                    [0.90, 0.90, 0.90],
                    0.5,
                    6.0,
                    30.0,
                ),
                planet(
                    "Venus",
                    "Often called Earth's sister planet due to similar size.",
                    "Venus spins backwards: its sun rises in the west and sets in the east.",
                    [1.0, 0.65, 0.0],
                    0.6,
                    8.0,
                    45.0,
                ),
                planet(
                    "Earth",
                    "Our home planet, the only known planet to harbor life.",
                    "Earth is the densest planet in the Solar System and the only one not named after a deity.",
                    [0.25, 0.41, 0.88],
                    0.65,
                    10.0,
                    60.0,
                ),
                planet(
                    "Mars",
                    "The Red Planet, named after the Roman god of war.",
                    "Mars hosts Olympus Mons, a volcano nearly three times the height of Everest.",
                    [1.0, 0.27, 0.0],
                    0.55,
                    12.0,
                    40.0,
                ),
            ],
        }
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Reject a planet entry whose simulation parameters would poison the
/// registry or the solver.
pub fn validate_planet(entry: &PlanetEntry) -> SimResult<()> {
    if entry.orbit <= 0.0 {
        return Err(SimError::InvalidOrbitRadius {
            name: entry.name.clone(),
            radius: entry.orbit,
        });
    }
    if entry.size <= 0.0 {
        return Err(SimError::InvalidSize {
            name: entry.name.clone(),
            size: entry.size,
        });
    }
    if entry.mass <= 0.0 {
        return Err(SimError::InvalidMass {
            name: entry.name.clone(),
            mass: entry.mass,
        });
    }
    Ok(())
}

/// Reject a star entry with a non-positive size or mass.
pub fn validate_star(entry: &StarEntry) -> SimResult<()> {
    if entry.size <= 0.0 {
        return Err(SimError::InvalidSize {
            name: entry.name.clone(),
            size: entry.size,
        });
    }
    if entry.mass <= 0.0 {
        return Err(SimError::InvalidMass {
            name: entry.name.clone(),
            mass: entry.mass,
        });
    }
    Ok(())
}

/// Build a validated catalog from parsed file contents.
///
/// Invalid planets are dropped (each with an `error!` line); an invalid star
/// is replaced by the compiled default star.  Surfacing every rejection is
/// the point; a silently-skipped body reads as a loading bug.
fn validate_catalog(file: CatalogFile) -> BodyCatalog {
    let star = match validate_star(&file.star) {
        Ok(()) => file.star,
        Err(e) => {
            error!("Rejecting configured star: {e}; using the default star");
            BodyCatalog::default().star
        }
    };

    let mut planets = Vec::with_capacity(file.planets.len());
    for entry in file.planets {
        match validate_planet(&entry) {
            Ok(()) => planets.push(entry),
            Err(e) => error!("Skipping catalog entry: {e}"),
        }
    }

    BodyCatalog { star, planets }
}

// ── Startup system ────────────────────────────────────────────────────────────

/// Startup system: load and validate `assets/bodies.toml`, overwriting the
/// compiled default catalog.  Runs before `registry::spawn_bodies`.
pub fn load_body_catalog(mut catalog: ResMut<BodyCatalog>) {
    let path = "assets/bodies.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<CatalogFile>(&contents) {
            Ok(file) => {
                let loaded = validate_catalog(file);
                info!(
                    "Loaded body catalog from {path}: {} + {} planet(s)",
                    loaded.star.name,
                    loaded.planets.len()
                );
                *catalog = loaded;
            }
            Err(e) => {
                error!("Failed to parse {path}: {e}; using the default catalog");
            }
        },
        Err(_) => {
            info!("No {path} found; using the default catalog");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(orbit: f32, size: f32, mass: f32) -> PlanetEntry {
        PlanetEntry {
            name: "Test".into(),
            description: String::new(),
            fun_fact: String::new(),
            color: default_color(),
            size,
            orbit,
            mass,
            max_hp: 8,
        }
    }

    #[test]
    fn default_catalog_is_fully_valid() {
        let catalog = BodyCatalog::default();
        assert!(validate_star(&catalog.star).is_ok());
        assert_eq!(catalog.planets.len(), 4);
        for entry in &catalog.planets {
            assert!(validate_planet(entry).is_ok(), "{}", entry.name);
        }
    }

    #[test]
    fn zero_or_negative_orbit_is_rejected() {
        assert!(validate_planet(&planet(0.0, 0.5, 40.0)).is_err());
        assert!(validate_planet(&planet(-3.0, 0.5, 40.0)).is_err());
        assert!(validate_planet(&planet(6.0, 0.5, 40.0)).is_ok());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(validate_planet(&planet(6.0, 0.0, 40.0)).is_err());
    }

    #[test]
    fn invalid_planets_are_dropped_but_valid_ones_survive() {
        let file = CatalogFile {
            star: BodyCatalog::default().star,
            planets: vec![planet(6.0, 0.5, 40.0), planet(-1.0, 0.5, 40.0)],
        };
        let catalog = validate_catalog(file);
        assert_eq!(catalog.planets.len(), 1);
    }

    #[test]
    fn minimal_toml_parses_with_defaults() {
        let doc = r#"
            [star]
            name = "Sol"
            size = 2.0

            [[planets]]
            name = "Minimal"
            size = 0.5
            orbit = 7.0
        "#;
        let file: CatalogFile = toml::from_str(doc).unwrap();
        assert_eq!(file.star.mass, default_star_mass());
        assert_eq!(file.planets[0].max_hp, default_planet_hp());
    }
}
