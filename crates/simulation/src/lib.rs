//! Round scheduling and run orchestration.
//!
//! # Architecture
//!
//! ```text
//! create_simulation ──► SimulationRecord (created)
//!                              │
//!                              ▼
//! SimulationRunner ── setup: summary + per-location channels
//!        │
//!        ├── RoundScheduler::run_alert_phase
//!        ├── RoundScheduler::run_round × round_count
//!        └── SimulationReport
//! ```
//!
//! External I/O goes through the [`ChannelProvider`] and [`TextGenerator`]
//! traits. [`MemoryChannels`] is an in-process provider for tests and dry
//! runs. Lifecycle events drained from the record are passed to a
//! [`SimulationObserver`](townsim_core::SimulationObserver).
//!
//! # Example
//!
//! ```ignore
//! let channels = Arc::new(MemoryChannels::new());
//! let parent = channels.open_root("town-square");
//! let mut record = create_simulation(&catalog, &residents, 4, 3, "Hurricane", &mut rng, now)?;
//!
//! let runner = SimulationRunner::new(channels, generator, SimulationConfig::new(4, 3));
//! let report = runner.run(&mut record, &parent).await?;
//! println!("{}", report);
//! ```

pub mod board;
mod config;
mod context;
mod error;
mod memory;
pub mod prompt;
mod provider;
mod report;
mod runner;
mod scheduler;
mod setup;

pub use config::{PacePolicy, Placeholders, SimulationConfig};
pub use context::build_context;
pub use error::RunError;
pub use memory::MemoryChannels;
pub use provider::{ChannelMessage, ChannelOptions, ChannelProvider, ProviderError, TextGenerator};
pub use report::{LocationReport, SimulationReport};
pub use runner::SimulationRunner;
pub use scheduler::RoundScheduler;
pub use setup::{allocate_population, create_simulation};
