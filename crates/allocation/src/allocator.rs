//! Weighted bot allocation.
//!
//! Bots are placed one at a time, in population order. For each bot the
//! engine weighs every location that still has room, normalizes the weights
//! into a distribution, and draws once:
//!
//! ```text
//! available = chosen locations
//! for bot in population:
//!     weights  = [bot.weight_for(loc) for loc in available]
//!     probs    = weights / sum(weights)
//!     draw     = uniform [0, 1)
//!     selected = first loc with cumulative(probs) >= draw   (else last loc)
//!     place bot; drop selected from available once it reaches capacity.max
//! ```
//!
//! Population order decides which bots compete for the remaining capacity,
//! so the result is reproducible for a fixed order and seeded random source.

use crate::assignment::Assignment;
use crate::catalog::ensure_distinct;
use crate::error::AllocationError;
use rand::Rng;
use townsim_types::{Bot, Location};
use tracing::{debug, warn};

/// Assigns a fixed population to a chosen set of locations.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    locations: Vec<Location>,
}

impl AllocationEngine {
    /// Create an engine over the chosen locations, in processing order.
    ///
    /// Names must be distinct; each one keys a roster.
    pub fn new(locations: Vec<Location>) -> Result<Self, AllocationError> {
        ensure_distinct(&locations)?;
        Ok(Self { locations })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Weight of each location for `bot`: explicit affinity, else the default.
    pub fn location_weights<'a>(bot: &Bot, locations: &[&'a Location]) -> Vec<(&'a Location, f64)> {
        locations
            .iter()
            .map(|l| (*l, bot.weight_for(&l.name)))
            .collect()
    }

    /// Place every bot in exactly one location without exceeding any maximum.
    pub fn assign<R: Rng + ?Sized>(
        &self,
        bots: &[Bot],
        rng: &mut R,
    ) -> Result<Assignment, AllocationError> {
        let mut assignment = Assignment::empty(&self.locations);
        let mut available: Vec<&Location> = self
            .locations
            .iter()
            .filter(|l| l.capacity.max > 0)
            .collect();

        for bot in bots {
            if available.is_empty() {
                return Err(AllocationError::NoAvailableLocation {
                    bot: bot.name.clone(),
                });
            }

            let weights = Self::location_weights(bot, &available);
            let probabilities = normalize(bot, &weights)?;
            let draw: f64 = rng.gen();
            let index = select_index(&probabilities, draw);
            let selected = available[index];

            let full = assignment.place(&selected.name, bot.clone()).ok_or_else(|| {
                AllocationError::UnknownLocation {
                    location: selected.name.clone(),
                }
            })?;
            debug!(bot = %bot.name, location = %selected.name, draw, "Placed bot");

            if full {
                debug!(location = %selected.name, "Location reached capacity");
                available.remove(index);
            }
        }

        Ok(assignment)
    }

    /// Assign, then enforce the post-conditions.
    ///
    /// Validation errors fail the allocation; warnings are logged.
    pub fn allocate<R: Rng + ?Sized>(
        &self,
        bots: &[Bot],
        rng: &mut R,
    ) -> Result<Assignment, AllocationError> {
        let assignment = self.assign(bots, rng)?;
        let report = assignment.validate(bots, &self.locations);

        for warning in &report.warnings {
            warn!(%warning, "Allocation warning");
        }
        if !report.is_valid() {
            return Err(AllocationError::InvalidAssignment {
                errors: report.errors,
            });
        }
        Ok(assignment)
    }
}

/// Turn weights into probabilities summing to 1.
fn normalize(bot: &Bot, weights: &[(&Location, f64)]) -> Result<Vec<f64>, AllocationError> {
    for (location, weight) in weights {
        if weight.is_nan() || *weight < 0.0 {
            return Err(AllocationError::NegativeWeight {
                bot: bot.name.clone(),
                location: location.name.clone(),
                weight: *weight,
            });
        }
    }

    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(AllocationError::DegenerateWeight {
            bot: bot.name.clone(),
        });
    }

    Ok(weights.iter().map(|(_, w)| w / total).collect())
}

/// First index whose cumulative probability reaches `draw`.
///
/// Falls back to the last index when rounding leaves the cumulative sum
/// just below the draw.
fn select_index(probabilities: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, probability) in probabilities.iter().enumerate() {
        cumulative += probability;
        if cumulative >= draw {
            return index;
        }
    }
    probabilities.len().saturating_sub(1)
}
