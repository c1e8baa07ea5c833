// Model exports
pub mod domain;
pub mod names;
pub mod responses;

pub use domain::{Group, Matching, ParticipantId, Proposal};
pub use names::participant_name;
pub use responses::{CountReport, EngagementEntry, MatchReport, PoolReport};
