//! Catalog of candidate locations.

use crate::error::AllocationError;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use townsim_types::{CapacityRange, Location};
use tracing::debug;

/// The set of venues a simulation may be staged in.
///
/// Names are unique; [`LocationCatalog::new`] rejects duplicates.
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    /// Create a catalog from distinct locations.
    pub fn new(locations: Vec<Location>) -> Result<Self, AllocationError> {
        ensure_distinct(&locations)?;
        Ok(Self { locations })
    }

    /// Wrap locations already known to have distinct names.
    pub(crate) fn from_distinct(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// Pick `count` distinct locations uniformly at random.
    ///
    /// The returned order is the order locations are processed in for the
    /// rest of the run.
    pub fn select_locations<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Location>, AllocationError> {
        if count > self.locations.len() {
            return Err(AllocationError::InsufficientCatalog {
                requested: count,
                available: self.locations.len(),
            });
        }

        let mut shuffled: Vec<&Location> = self.locations.iter().collect();
        shuffled.shuffle(rng);
        let selected: Vec<Location> = shuffled.into_iter().take(count).cloned().collect();

        debug!(
            count,
            selected = ?selected.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            "Selected locations"
        );
        Ok(selected)
    }

    /// Look up a location by name.
    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.name == name)
    }

    /// All catalog entries in declaration order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Fail on the first location whose name was already seen.
pub(crate) fn ensure_distinct(locations: &[Location]) -> Result<(), AllocationError> {
    let mut seen = HashSet::new();
    for location in locations {
        if !seen.insert(location.name.as_str()) {
            return Err(AllocationError::DuplicateLocation {
                name: location.name.clone(),
            });
        }
    }
    Ok(())
}

/// Sum the capacity bounds of a list of locations.
pub fn total_capacity(locations: &[Location]) -> CapacityRange {
    locations.iter().map(|l| l.capacity).sum()
}
