//! Lifecycle mutations of a [`SimulationRecord`].
//!
//! These are the only writers of a record. They perform no I/O:
//!
//! - **Validated**: unknown locations, backwards rounds and illegal status
//!   changes are rejected without touching the record
//! - **Consistent**: `stats.messages_posted` moves in lockstep with the
//!   per-location counts
//! - **Observable**: each successful mutation queues a [`LifecycleEvent`]

use crate::error::SimulationError;
use crate::event::LifecycleEvent;
use crate::record::SimulationRecord;
use crate::status::SimulationStatus;
use std::time::SystemTime;
use townsim_types::ChannelId;

impl SimulationRecord {
    /// Record the external channel for a location.
    pub fn set_location_channel(
        &mut self,
        location: &str,
        channel: ChannelId,
    ) -> Result<(), SimulationError> {
        let state = self.location_mut(location)?;
        state.channel = Some(channel.clone());
        self.pending_events.push(LifecycleEvent::ChannelAssigned {
            location: location.to_string(),
            channel,
        });
        Ok(())
    }

    /// Add `delta` messages to a location and to the run total.
    pub fn increment_message_count(
        &mut self,
        location: &str,
        delta: u64,
    ) -> Result<(), SimulationError> {
        let state = self.location_mut(location)?;
        state.message_count += delta;
        let location_total = state.message_count;
        self.stats.messages_posted += delta;

        self.pending_events.push(LifecycleEvent::MessagesPosted {
            location: location.to_string(),
            delta,
            location_total,
            total: self.stats.messages_posted,
        });
        Ok(())
    }

    /// Record the highest round completed at a location.
    ///
    /// Re-recording the current round is accepted; moving backwards or past
    /// the round count is not.
    pub fn set_location_round(&mut self, location: &str, round: u32) -> Result<(), SimulationError> {
        let round_count = self.round_count;
        let state = self.location_mut(location)?;

        if round < state.current_round {
            return Err(SimulationError::RoundRegression {
                location: location.to_string(),
                current: state.current_round,
                requested: round,
            });
        }
        if round > round_count {
            return Err(SimulationError::RoundOutOfRange {
                location: location.to_string(),
                requested: round,
                round_count,
            });
        }

        state.current_round = round;
        self.pending_events.push(LifecycleEvent::LocationRoundCompleted {
            location: location.to_string(),
            round,
        });
        Ok(())
    }

    /// Count one fully processed round.
    ///
    /// No deduplication: callers invoke this exactly once per round, after
    /// every location in that round has been processed.
    pub fn complete_round(&mut self) -> Result<u32, SimulationError> {
        if self.stats.rounds_completed >= self.round_count {
            return Err(SimulationError::RoundsExhausted {
                round_count: self.round_count,
            });
        }

        self.stats.rounds_completed += 1;
        self.pending_events.push(LifecycleEvent::RoundCompleted {
            round: self.stats.rounds_completed,
            round_count: self.round_count,
        });
        Ok(self.stats.rounds_completed)
    }

    /// Move the lifecycle forward. Entering `complete` stamps `completed_at`.
    pub fn update_status(
        &mut self,
        status: SimulationStatus,
        now: SystemTime,
    ) -> Result<(), SimulationError> {
        let from = self.status;
        if !from.can_transition_to(status) {
            return Err(SimulationError::InvalidTransition { from, to: status });
        }

        self.status = status;
        if status == SimulationStatus::Complete {
            self.completed_at = Some(now);
        }
        self.pending_events
            .push(LifecycleEvent::StatusChanged { from, to: status });
        Ok(())
    }

    /// Move to `error` unless already terminal. Returns whether the status changed.
    pub fn fail(&mut self, now: SystemTime) -> bool {
        self.update_status(SimulationStatus::Error, now).is_ok()
    }
}
