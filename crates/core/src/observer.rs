//! Observability hooks for lifecycle events.

use crate::event::LifecycleEvent;
use townsim_types::SimulationId;
use tracing::{debug, info, warn};

/// Receives lifecycle events as the runner drains them from a record.
///
/// Observers must not block: they are called inline between scheduler steps.
pub trait SimulationObserver: Send + Sync {
    fn on_event(&self, simulation: &SimulationId, event: &LifecycleEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SimulationObserver for TracingObserver {
    fn on_event(&self, simulation: &SimulationId, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::Created { locations, bots } => {
                info!(%simulation, locations, bots, "Simulation created");
            }
            LifecycleEvent::ChannelAssigned { location, channel } => {
                info!(%simulation, %location, %channel, "Location channel assigned");
            }
            LifecycleEvent::MessagesPosted {
                location,
                delta,
                location_total,
                total,
            } => {
                debug!(%simulation, %location, delta, location_total, total, "Messages posted");
            }
            LifecycleEvent::LocationRoundCompleted { location, round } => {
                debug!(%simulation, %location, round, "Location round completed");
            }
            LifecycleEvent::RoundCompleted { round, round_count } => {
                info!(%simulation, round, round_count, "Round completed");
            }
            LifecycleEvent::StatusChanged { from, to } => {
                if *to == crate::SimulationStatus::Error {
                    warn!(%simulation, %from, %to, "Simulation status changed");
                } else {
                    info!(%simulation, %from, %to, "Simulation status changed");
                }
            }
        }
    }
}

/// Discards events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SimulationObserver for NoopObserver {
    fn on_event(&self, _simulation: &SimulationId, _event: &LifecycleEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulationStatus;
    use townsim_types::ChannelId;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_tracing_observer_logs_structured_fields() {
        let id = SimulationId::new("sim_observed");
        let observer = TracingObserver;

        observer.on_event(
            &id,
            &LifecycleEvent::ChannelAssigned {
                location: "Harbor Marina".to_string(),
                channel: ChannelId::new("ch-3"),
            },
        );
        observer.on_event(
            &id,
            &LifecycleEvent::StatusChanged {
                from: SimulationStatus::Running,
                to: SimulationStatus::Error,
            },
        );

        assert!(logs_contain("Location channel assigned"));
        assert!(logs_contain("location=Harbor Marina"));
        assert!(logs_contain("simulation=sim_observed"));
        assert!(logs_contain("WARN"));
    }

    #[test]
    #[traced_test]
    fn test_noop_observer_is_silent() {
        NoopObserver.on_event(
            &SimulationId::new("sim_quiet"),
            &LifecycleEvent::RoundCompleted {
                round: 1,
                round_count: 3,
            },
        );
        assert!(!logs_contain("sim_quiet"));
    }
}
