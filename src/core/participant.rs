use std::fmt;

use crate::core::preference::PreferenceList;
use crate::error::{MatchError, Result};
use crate::models::{participant_name, Group, ParticipantId, Proposal};

/// A member of one group with an engagement state and a preference list
///
/// The partner is stored as an index into the opposite group. The engagement
/// transitions below take both groups as slices so the symmetric update of
/// the two partners happens in one place.
#[derive(Debug, Clone)]
pub struct Participant {
    id: ParticipantId,
    name: String,
    partner: Option<usize>,
    preferences: PreferenceList,
}

impl Participant {
    /// A single participant ranking a group of `group_size` in index order
    pub fn new(group: Group, index: usize, group_size: usize) -> Self {
        Self {
            id: ParticipantId::new(group, index),
            name: participant_name(group, index),
            partner: None,
            preferences: PreferenceList::identity(group_size),
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partner(&self) -> Option<usize> {
        self.partner
    }

    pub fn is_single(&self) -> bool {
        self.partner.is_none()
    }

    pub fn preferences(&self) -> &PreferenceList {
        &self.preferences
    }

    pub(crate) fn preferences_mut(&mut self) -> &mut PreferenceList {
        &mut self.preferences
    }

    pub(crate) fn set_preferences(&mut self, preferences: PreferenceList) {
        self.preferences = preferences;
    }

    /// The candidate this participant would propose to next
    pub fn current_favorite(&self) -> usize {
        self.preferences.current_favorite()
    }

    /// Rank of the current partner in this participant's own list, `None` while single
    pub fn preference_distance(&self) -> Option<usize> {
        self.partner.map(|partner| self.preferences.rank_of(partner))
    }

    /// `true` if this participant would leave its current situation for `candidate`
    ///
    /// Lists are total, so a single participant prefers anyone to no one.
    pub fn would_leave_for(&self, candidate: usize) -> bool {
        match self.partner {
            Some(partner) => self.preferences.prefers(candidate, partner),
            None => true,
        }
    }

    pub(crate) fn engage(&mut self, partner: usize) {
        self.partner = Some(partner);
    }

    pub(crate) fn clear(&mut self) {
        self.partner = None;
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ({}) engaged_to=", self.name, self.id)?;
        match self.partner {
            Some(partner) => write!(f, "{}", self.id.counterpart(partner))?,
            None => write!(f, "--")?,
        }
        write!(f, " prefs={}>", self.preferences)
    }
}

/// `proposers[proposer]` offers to `reviewers[target]`
///
/// A single reviewer always accepts. An engaged reviewer accepts only if it
/// ranks the proposer strictly above its partner, in which case it jilts the
/// partner first. On rejection nothing changes.
///
/// # Errors
/// `MatchError::NotSingle` if the proposer is already engaged.
pub(crate) fn propose(
    proposers: &mut [Participant],
    reviewers: &mut [Participant],
    proposer: usize,
    target: usize,
) -> Result<Proposal> {
    if !proposers[proposer].is_single() {
        return Err(MatchError::NotSingle {
            participant: proposers[proposer].id,
        });
    }

    let reviewer = &reviewers[target];
    if !reviewer.is_single() {
        if !reviewer.would_leave_for(proposer) {
            return Ok(Proposal::Rejected);
        }
        jilt(reviewers, proposers, target)?;
    }

    proposers[proposer].engage(target);
    reviewers[target].engage(proposer);
    Ok(Proposal::Accepted)
}

/// `own[index]` drops its partner in `other`
///
/// The dropped partner advances its own cursor past the participant that
/// just left it, then both engagement references are cleared.
///
/// # Errors
/// `MatchError::NotEngaged` if `own[index]` is single, or
/// `MatchError::Exhausted` if the dropped partner has no candidate left.
pub(crate) fn jilt(own: &mut [Participant], other: &mut [Participant], index: usize) -> Result<()> {
    let participant = &own[index];
    let engager = participant.partner.ok_or(MatchError::NotEngaged {
        participant: participant.id,
    })?;

    other[engager].preferences.advance()?;
    other[engager].clear();
    own[index].clear();
    Ok(())
}
