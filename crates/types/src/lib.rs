//! Core types for town emergency simulations.
//!
//! Shared by the allocator, the simulation state machine, and the runner:
//!
//! - [`Bot`] - persona-bearing resident with location affinities
//! - [`Location`] - capacity-bounded venue
//! - [`SimulationId`], [`ChannelId`], [`MessageId`] - identifiers
//! - [`MessageOrigin`] - structured author tag for channel messages

mod bot;
mod identifiers;
mod location;

pub use bot::Bot;
pub use identifiers::{ChannelId, MessageId, MessageOrigin, SimulationId};
pub use location::{CapacityRange, Location, LocationKind};
