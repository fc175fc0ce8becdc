//! Error types for location selection and allocation.

use thiserror::Error;

/// Construction-time failures. Any of these prevents a run from starting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// More locations requested than the catalog holds.
    #[error("Requested {requested} locations but only {available} are available")]
    InsufficientCatalog { requested: usize, available: usize },

    /// The population does not fit in the chosen locations.
    #[error("Not enough capacity: {bots} bots need room but chosen locations hold {min}-{max}")]
    InsufficientCapacity { bots: usize, min: usize, max: usize },

    /// Every chosen location is full before this bot was placed.
    #[error("No available locations for bot {bot}: all locations at capacity")]
    NoAvailableLocation { bot: String },

    /// The bot's weights over the available locations sum to zero.
    #[error("Total weight for bot {bot} is zero: cannot normalize")]
    DegenerateWeight { bot: String },

    /// A weight was negative (or not a number).
    #[error("Bot {bot} has invalid weight {weight} for {location}")]
    NegativeWeight {
        bot: String,
        location: String,
        weight: f64,
    },

    /// Two catalog entries share a name.
    #[error("Duplicate location in catalog: {name}")]
    DuplicateLocation { name: String },

    /// A location the assignment holds no roster for.
    #[error("Location {location} is not part of this allocation")]
    UnknownLocation { location: String },

    /// Post-condition check failed.
    #[error("Bot assignment validation failed: {}", errors.join(", "))]
    InvalidAssignment { errors: Vec<String> },
}
