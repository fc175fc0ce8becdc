//! Errors raised while preparing a run from files and flags.

use crate::validation::MessageRejected;
use std::path::PathBuf;
use thiserror::Error;
use townsim_allocation::AllocationError;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A count outside the range the command accepts.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Message(#[from] MessageRejected),
}
