//! Structured lifecycle events emitted by record mutations.

use crate::status::SimulationStatus;
use serde::Serialize;
use townsim_types::ChannelId;

/// One observable change to a simulation record.
///
/// Mutators queue these on the record; the runner drains them and forwards
/// them to a [`SimulationObserver`](crate::SimulationObserver).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    // ═══════════════════════════════════════════════════════════════════════
    // Setup
    // ═══════════════════════════════════════════════════════════════════════
    /// Record built from a validated allocation.
    Created { locations: usize, bots: usize },

    /// External channel recorded for a location.
    ChannelAssigned {
        location: String,
        channel: ChannelId,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Progress
    // ═══════════════════════════════════════════════════════════════════════
    /// Messages counted at a location.
    MessagesPosted {
        location: String,
        delta: u64,
        location_total: u64,
        total: u64,
    },

    /// A location finished a conversation round.
    LocationRoundCompleted { location: String, round: u32 },

    /// Every location has been processed for a round.
    RoundCompleted { round: u32, round_count: u32 },

    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// Status moved along the lifecycle.
    StatusChanged {
        from: SimulationStatus,
        to: SimulationStatus,
    },
}

impl LifecycleEvent {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            LifecycleEvent::Created { .. } => "Created",
            LifecycleEvent::ChannelAssigned { .. } => "ChannelAssigned",
            LifecycleEvent::MessagesPosted { .. } => "MessagesPosted",
            LifecycleEvent::LocationRoundCompleted { .. } => "LocationRoundCompleted",
            LifecycleEvent::RoundCompleted { .. } => "RoundCompleted",
            LifecycleEvent::StatusChanged { .. } => "StatusChanged",
        }
    }
}
