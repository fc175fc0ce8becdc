//! Location selection and capacity-bounded bot allocation.
//!
//! # Flow
//!
//! ```text
//! LocationCatalog::select_locations(n)   random subset, no duplicates
//!         │
//!         ▼
//! total_capacity(chosen)                 caller pre-checks population fits
//!         │
//!         ▼
//! AllocationEngine::allocate(bots)       weighted sampling without replacement
//!         │                              + post-condition validation
//!         ▼
//! Assignment                             location -> ordered roster
//! ```
//!
//! All randomness comes from a caller-supplied [`rand::Rng`], so a seeded
//! generator reproduces the same selection and assignment.

mod allocator;
mod assignment;
mod catalog;
mod error;
pub mod presets;

pub use allocator::AllocationEngine;
pub use assignment::{Assignment, AssignmentStats, Roster, ValidationReport};
pub use catalog::{total_capacity, LocationCatalog};
pub use error::AllocationError;
