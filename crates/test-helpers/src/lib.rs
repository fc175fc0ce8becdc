//! Test fixtures shared by the townsim crates.
//!
//! - [`fixtures`]: small towns and populations
//! - [`generators`]: scripted and failing text generators
//! - [`channels`]: a channel provider with injectable failures
//! - [`RecordingObserver`]: captures lifecycle events

pub mod channels;
pub mod fixtures;
pub mod generators;

use parking_lot::Mutex;
use townsim_core::{LifecycleEvent, SimulationObserver};
use townsim_types::SimulationId;

pub use channels::FlakyChannels;
pub use fixtures::{bot, location, numbered_population, town};
pub use generators::{FailingGenerator, ScriptedGenerator};

/// Observer that keeps every event it sees.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(SimulationId, LifecycleEvent)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Event type names in arrival order.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|(_, e)| e.type_name()).collect()
    }

    pub fn count(&self, type_name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|(_, e)| e.type_name() == type_name)
            .count()
    }
}

impl SimulationObserver for RecordingObserver {
    fn on_event(&self, simulation: &SimulationId, event: &LifecycleEvent) {
        self.events.lock().push((simulation.clone(), event.clone()));
    }
}
