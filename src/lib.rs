//! Stable Match - Gale-Shapley stable matching engine
//!
//! This library computes stable matchings between two equal-sized groups
//! that each rank the other group, generates preference lists with known
//! combinatorial properties, and verifies results by brute force on small
//! pools.

pub mod config;
pub mod core;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use crate::core::{run_matching, GaleShapley, MatchOutcome, Pool, PreferenceList, PreferenceStrategy, RejectionPolicy};
pub use error::MatchError;
pub use models::{CountReport, Group, MatchReport, ParticipantId, PoolReport};
