//! The aggregate tracked for one simulation run.

use crate::event::LifecycleEvent;
use crate::status::SimulationStatus;
use serde::Serialize;
use std::time::{Duration, SystemTime};
use townsim_types::{Bot, ChannelId, Location, SimulationId};

/// Progress of a single location.
#[derive(Debug, Clone, Serialize)]
pub struct LocationState {
    /// Catalog snapshot.
    pub location: Location,
    /// Assigned bots, in population order.
    pub bots: Vec<Bot>,
    /// External channel, set once channels are established.
    pub channel: Option<ChannelId>,
    /// Messages counted at this location.
    pub message_count: u64,
    /// Highest round completed here.
    pub current_round: u32,
}

impl LocationState {
    pub fn name(&self) -> &str {
        &self.location.name
    }
}

/// Run-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub total_bots: usize,
    pub total_locations: usize,
    pub total_rounds: u32,
    /// Always equals the sum of per-location message counts.
    pub messages_posted: u64,
    pub rounds_completed: u32,
}

/// One simulation's locations, rosters, counters and lifecycle status.
///
/// Mutated in place by the lifecycle operations in this crate; every
/// mutation queues a [`LifecycleEvent`] retrievable via [`drain_events`].
///
/// [`drain_events`]: SimulationRecord::drain_events
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRecord {
    pub(crate) id: SimulationId,
    pub(crate) emergency_message: String,
    pub(crate) round_count: u32,
    pub(crate) status: SimulationStatus,
    pub(crate) created_at: SystemTime,
    pub(crate) completed_at: Option<SystemTime>,
    pub(crate) locations: Vec<LocationState>,
    pub(crate) stats: SimulationStats,
    #[serde(skip)]
    pub(crate) pending_events: Vec<LifecycleEvent>,
}

impl SimulationRecord {
    /// Build a record in `created` status from allocated rosters.
    pub fn new(
        id: SimulationId,
        emergency_message: impl Into<String>,
        round_count: u32,
        rosters: impl IntoIterator<Item = (Location, Vec<Bot>)>,
        created_at: SystemTime,
    ) -> Self {
        let locations: Vec<LocationState> = rosters
            .into_iter()
            .map(|(location, bots)| LocationState {
                location,
                bots,
                channel: None,
                message_count: 0,
                current_round: 0,
            })
            .collect();

        let stats = SimulationStats {
            total_bots: locations.iter().map(|l| l.bots.len()).sum(),
            total_locations: locations.len(),
            total_rounds: round_count,
            messages_posted: 0,
            rounds_completed: 0,
        };

        let created = LifecycleEvent::Created {
            locations: stats.total_locations,
            bots: stats.total_bots,
        };

        Self {
            id,
            emergency_message: emergency_message.into(),
            round_count,
            status: SimulationStatus::Created,
            created_at,
            completed_at: None,
            locations,
            stats,
            pending_events: vec![created],
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> &SimulationId {
        &self.id
    }

    pub fn emergency_message(&self) -> &str {
        &self.emergency_message
    }

    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<SystemTime> {
        self.completed_at
    }

    /// Time from creation to completion, if complete.
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at
            .and_then(|done| done.duration_since(self.created_at).ok())
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Locations in processing order.
    pub fn locations(&self) -> &[LocationState] {
        &self.locations
    }

    pub fn location(&self, name: &str) -> Option<&LocationState> {
        self.locations.iter().find(|l| l.location.name == name)
    }

    /// Bots assigned to a location.
    pub fn bots_at(&self, name: &str) -> Option<&[Bot]> {
        self.location(name).map(|l| l.bots.as_slice())
    }

    /// Channel handle of a location, if established.
    pub fn location_channel(&self, name: &str) -> Option<&ChannelId> {
        self.location(name).and_then(|l| l.channel.as_ref())
    }

    /// Per-location breakdown plus run-level counters.
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            id: self.id.clone(),
            status: self.status,
            stats: self.stats,
            locations: self
                .locations
                .iter()
                .map(|l| LocationBreakdown {
                    name: l.location.name.clone(),
                    glyph: l.location.glyph.clone(),
                    bot_count: l.bots.len(),
                    message_count: l.message_count,
                    current_round: l.current_round,
                    channel: l.channel.clone(),
                })
                .collect(),
        }
    }

    /// Take the events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub(crate) fn location_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut LocationState, crate::SimulationError> {
        self.locations
            .iter_mut()
            .find(|l| l.location.name == name)
            .ok_or_else(|| crate::SimulationError::UnknownLocation {
                location: name.to_string(),
            })
    }
}

/// Read-only view of a record's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    pub id: SimulationId,
    pub status: SimulationStatus,
    pub stats: SimulationStats,
    pub locations: Vec<LocationBreakdown>,
}

/// Progress of one location within a [`SimulationSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationBreakdown {
    pub name: String,
    pub glyph: String,
    pub bot_count: usize,
    pub message_count: u64,
    pub current_round: u32,
    pub channel: Option<ChannelId>,
}
