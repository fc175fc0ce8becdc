//! Small towns and populations.

use townsim_allocation::LocationCatalog;
use townsim_types::{Bot, CapacityRange, Location, LocationKind};

/// A public location with the given capacity.
pub fn location(name: &str, min: usize, max: usize) -> Location {
    Location::new(name, LocationKind::Public, CapacityRange::new(min, max))
}

/// A bot with uniform weights whose persona is `"You are <name>."`.
pub fn bot(name: &str) -> Bot {
    Bot::new(name, 1.0).with_persona(format!("You are {}.", name))
}

/// `count` bots named `resident-0`, `resident-1`, ...
pub fn numbered_population(count: usize) -> Vec<Bot> {
    (0..count).map(|i| bot(&format!("resident-{}", i))).collect()
}

/// Catalog of `(name, min, max)` locations.
///
/// # Panics
///
/// Panics if two names repeat.
pub fn town(locations: &[(&str, usize, usize)]) -> LocationCatalog {
    LocationCatalog::new(
        locations
            .iter()
            .map(|(name, min, max)| location(name, *min, *max))
            .collect(),
    )
    .expect("fixture town has distinct names")
}
