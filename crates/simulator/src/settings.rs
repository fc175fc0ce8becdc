//! File-based configuration and town definitions.
//!
//! # Config file
//!
//! ```toml
//! [simulation]
//! location_count = 5
//! round_count = 2
//! context_window = 10
//!
//! [simulation.pace]
//! between_bots = 300
//!
//! [ollama]
//! url = "http://localhost:11434"
//! model = "gemma3:1b"
//! ```
//!
//! # Town file
//!
//! ```toml
//! [[location]]
//! name = "Old Mill"
//! kind = "community"
//! capacity = { min = 2, max = 6 }
//! glyph = "🏚️"
//!
//! [[resident]]
//! name = "Ada"
//! default_weight = 0.25
//! affinities = { "Old Mill" = 0.7 }
//! persona = "You are Ada, the miller."
//! ```

use crate::error::SettingsError;
use crate::generators::OllamaConfig;
use rand::Rng;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::Path;
use townsim_allocation::{presets, Assignment, LocationCatalog};
use townsim_simulation::{allocate_population, SimulationConfig};
use townsim_types::{Bot, Location};
use tracing::debug;

/// Locations a run may use.
pub const LOCATION_COUNT: RangeInclusive<usize> = 4..=6;

/// Conversation rounds a run may request.
pub const ROUND_COUNT: RangeInclusive<u32> = 1..=10;

fn read(path: &Path) -> Result<String, SettingsError> {
    std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: for<'de> Deserialize<'de>>(path: &Path, text: &str) -> Result<T, SettingsError> {
    toml::from_str(text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Contents of a `--config` file. Absent keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub simulation: SimulationConfig,
    pub ollama: OllamaConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let config: Self = parse(path, &read(path)?)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

/// Reject location and round counts outside the accepted ranges.
pub fn check_bounds(config: &SimulationConfig) -> Result<(), SettingsError> {
    if !LOCATION_COUNT.contains(&config.location_count) {
        return Err(SettingsError::OutOfRange {
            field: "location_count",
            value: config.location_count as u64,
            min: *LOCATION_COUNT.start() as u64,
            max: *LOCATION_COUNT.end() as u64,
        });
    }
    if !ROUND_COUNT.contains(&config.round_count) {
        return Err(SettingsError::OutOfRange {
            field: "round_count",
            value: u64::from(config.round_count),
            min: u64::from(*ROUND_COUNT.start()),
            max: u64::from(*ROUND_COUNT.end()),
        });
    }
    Ok(())
}

/// Raw `--town` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TownFile {
    #[serde(default, rename = "location")]
    pub locations: Vec<Location>,

    #[serde(default, rename = "resident")]
    pub residents: Vec<Bot>,
}

/// A catalog and the population staged in it.
#[derive(Debug, Clone)]
pub struct Town {
    pub catalog: LocationCatalog,
    pub population: Vec<Bot>,
}

impl Town {
    /// The built-in coastal town.
    pub fn coastal() -> Self {
        Self {
            catalog: presets::coastal_town_catalog(),
            population: presets::coastal_town_population(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let file: TownFile = parse(path, &read(path)?)?;
        let town = Self::from_file(file)?;
        debug!(
            path = %path.display(),
            locations = town.catalog.len(),
            residents = town.population.len(),
            "Loaded town file"
        );
        Ok(town)
    }

    pub fn from_file(file: TownFile) -> Result<Self, SettingsError> {
        Ok(Self {
            catalog: LocationCatalog::new(file.locations)?,
            population: file.residents,
        })
    }

    /// Select `location_count` locations and allocate the whole population.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        location_count: usize,
        rng: &mut R,
    ) -> Result<Assignment, SettingsError> {
        Ok(allocate_population(
            &self.catalog,
            &self.population,
            location_count,
            rng,
        )?)
    }
}
