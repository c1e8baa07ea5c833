use thiserror::Error;

use crate::models::ParticipantId;

/// Errors surfaced by the matching engine and the preference generators
///
/// None of these are transient. Each one means an invariant was broken by the
/// caller's input or by a bug, so the engine never retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Candidates exhausted: no candidate left after rank {rank} of {len}")]
    Exhausted { rank: usize, len: usize },

    #[error("Precondition failed: {participant} cannot jilt while single")]
    NotEngaged { participant: ParticipantId },

    #[error("Precondition failed: {participant} is already engaged")]
    NotSingle { participant: ParticipantId },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unmatched participant: {participant} has no partner")]
    Unmatched { participant: ParticipantId },

    #[error("Matching stalled in round {round}: {single} proposers are single and no proposal was accepted")]
    Stalled { round: usize, single: usize },

    #[error("Custom preference file error: {0}")]
    CustomFile(String),
}

impl MatchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        MatchError::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
