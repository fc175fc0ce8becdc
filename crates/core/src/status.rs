//! Lifecycle status of a simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `created -> ready -> running -> complete`, with `error` reachable from any
/// non-terminal state. `complete` and `error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    /// Allocated; no external channels yet.
    Created,
    /// Per-location channels established.
    Ready,
    /// Alert and round phases in progress.
    Running,
    /// All rounds finished.
    Complete,
    /// Aborted by a run-fatal error.
    Error,
}

impl SimulationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SimulationStatus::Complete | SimulationStatus::Error)
    }

    /// Check whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: SimulationStatus) -> bool {
        use SimulationStatus::*;
        match (self, next) {
            (Created, Ready) | (Ready, Running) | (Running, Complete) => true,
            (from, Error) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SimulationStatus::Created => "created",
            SimulationStatus::Ready => "ready",
            SimulationStatus::Running => "running",
            SimulationStatus::Complete => "complete",
            SimulationStatus::Error => "error",
        }
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SimulationStatus::*;
    use super::*;

    const ALL: [SimulationStatus; 5] = [Created, Ready, Running, Complete, Error];

    #[test]
    fn test_forward_path() {
        assert!(Created.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Running));
        assert!(Running.can_transition_to(Complete));
    }

    #[test]
    fn test_no_skipping_or_reversing() {
        assert!(!Created.can_transition_to(Running));
        assert!(!Created.can_transition_to(Complete));
        assert!(!Ready.can_transition_to(Created));
        assert!(!Running.can_transition_to(Ready));
        for status in ALL {
            assert!(!status.can_transition_to(status), "{} -> {}", status, status);
        }
    }

    #[test]
    fn test_error_reachable_from_non_terminal_only() {
        for status in [Created, Ready, Running] {
            assert!(status.can_transition_to(Error));
        }
        for next in ALL {
            assert!(!Complete.can_transition_to(next));
            assert!(!Error.can_transition_to(next));
        }
    }
}
