use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two disjoint sides of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    A,
    B,
}

impl Group {
    /// The group whose members this group ranks
    pub fn opposite(self) -> Self {
        match self {
            Group::A => Group::B,
            Group::B => Group::A,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::A => write!(f, "A"),
            Group::B => write!(f, "B"),
        }
    }
}

/// Position of a participant inside a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId {
    pub group: Group,
    pub index: usize,
}

impl ParticipantId {
    pub fn new(group: Group, index: usize) -> Self {
        Self { group, index }
    }

    /// Id of the member at `index` in the opposite group
    pub fn counterpart(self, index: usize) -> Self {
        Self::new(self.group.opposite(), index)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.group, self.index + 1)
    }
}

/// Outcome of a single proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proposal {
    Accepted,
    Rejected,
}

/// A complete assignment: entry `i` is the group B index matched to group A member `i`
pub type Matching = Vec<usize>;
