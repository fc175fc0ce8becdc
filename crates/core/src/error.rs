//! Error types for record mutation and the run store.

use crate::status::SimulationStatus;
use thiserror::Error;
use townsim_types::SimulationId;

/// Rejected mutation of a [`SimulationRecord`](crate::SimulationRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The location is not part of this simulation.
    #[error("Location {location} not found in simulation")]
    UnknownLocation { location: String },

    /// The lifecycle does not allow this status change.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: SimulationStatus,
        to: SimulationStatus,
    },

    /// A location's completed round may only move forward.
    #[error("Round for {location} cannot move back from {current} to {requested}")]
    RoundRegression {
        location: String,
        current: u32,
        requested: u32,
    },

    /// A round number beyond the requested round count.
    #[error("Round {requested} for {location} exceeds round count {round_count}")]
    RoundOutOfRange {
        location: String,
        requested: u32,
        round_count: u32,
    },

    /// Every requested round has already been completed.
    #[error("All {round_count} rounds already completed")]
    RoundsExhausted { round_count: u32 },
}

/// Failures of [`SimulationStore`](crate::SimulationStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Simulation {0} not found")]
    NotFound(SimulationId),

    #[error("Simulation {0} already exists")]
    AlreadyExists(SimulationId),

    /// Another scheduler holds the record.
    #[error("Simulation {0} is checked out by another runner")]
    CheckedOut(SimulationId),
}
