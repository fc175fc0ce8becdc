//! Simulation record and lifecycle state machine.
//!
//! # Lifecycle
//!
//! ```text
//! created ──► ready ──► running ──► complete
//!    │          │          │
//!    └──────────┴──────────┴──────► error
//! ```
//!
//! A [`SimulationRecord`] is mutated only through the operations in this
//! crate, which validate their inputs and queue a [`LifecycleEvent`] for each
//! change. None of them perform I/O. Runs are kept in a [`SimulationStore`]
//! that hands a record to at most one scheduler at a time.

mod error;
mod event;
mod observer;
mod record;
mod state;
mod status;
mod store;

pub use error::{SimulationError, StoreError};
pub use event::LifecycleEvent;
pub use observer::{NoopObserver, SimulationObserver, TracingObserver};
pub use record::{LocationBreakdown, LocationState, SimulationRecord, SimulationStats, SimulationSummary};
pub use status::SimulationStatus;
pub use store::SimulationStore;
