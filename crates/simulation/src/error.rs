//! Run-level errors.

use crate::provider::ProviderError;
use thiserror::Error;
use townsim_allocation::AllocationError;
use townsim_core::{SimulationError, SimulationStatus, StoreError};
use townsim_types::SimulationId;

/// Errors that abort a simulation before or during a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The simulation could not be constructed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// A record mutation was rejected.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Only a `created` record can be run.
    #[error("Simulation {simulation} is {status}, only created simulations can run")]
    NotCreated {
        simulation: SimulationId,
        status: SimulationStatus,
    },

    /// An external operation outside per-step containment failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A location was processed before its channel was established.
    #[error("Location {location} has no channel")]
    MissingChannel { location: String },
}
