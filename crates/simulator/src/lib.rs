//! Command-line driver for town emergency simulations.
//!
//! The `townsim` binary wires the simulation crates to concrete
//! collaborators:
//!
//! - **Settings**: TOML config file and custom town definitions, with the
//!   location and round bounds a run accepts
//! - **Validation**: screening of the emergency message before any run
//! - **Generators**: Ollama over HTTP, or canned offline responses
//!
//! Channels are always in-memory; the transcript is printed when the run
//! ends.

mod error;
mod generators;
mod settings;
mod validation;

pub use error::SettingsError;
pub use generators::{OfflineGenerator, OllamaConfig, OllamaGenerator};
pub use settings::{check_bounds, FileConfig, Town, TownFile, LOCATION_COUNT, ROUND_COUNT};
pub use validation::{
    message_problems, validate_emergency_message, MessageProblem, MessageRejected,
    MAX_MESSAGE_CHARS,
};
