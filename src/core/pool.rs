use itertools::Itertools;

use crate::core::participant::{self, Participant};
use crate::core::preference::{inverse_permutation, PreferenceList};
use crate::error::{MatchError, Result};
use crate::models::{Group, Matching, ParticipantId, Proposal};

/// Two equal-sized groups of participants, each ranking the other
///
/// Participants refer to each other by index, so cloning a pool gives a
/// fully isolated copy of every engagement and cursor.
#[derive(Debug, Clone)]
pub struct Pool {
    group_a: Vec<Participant>,
    group_b: Vec<Participant>,
}

impl Pool {
    /// Pool of `size` single participants per group, each ranking the other
    /// group in index order until a strategy assigns real lists
    ///
    /// # Errors
    /// `MatchError::Configuration` if `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MatchError::configuration("pool size must be at least 1"));
        }

        Ok(Self {
            group_a: (0..size).map(|i| Participant::new(Group::A, i, size)).collect(),
            group_b: (0..size).map(|i| Participant::new(Group::B, i, size)).collect(),
        })
    }

    /// Number of participants in each group
    pub fn size(&self) -> usize {
        self.group_a.len()
    }

    pub fn group(&self, group: Group) -> &[Participant] {
        match group {
            Group::A => &self.group_a,
            Group::B => &self.group_b,
        }
    }

    /// # Panics
    /// If `id.index` is not below `size()`.
    pub fn participant(&self, id: ParticipantId) -> &Participant {
        &self.group(id.group)[id.index]
    }

    /// The member at `index` of the group opposite to `id`
    ///
    /// # Panics
    /// If `index` is not below `size()`.
    pub fn counterpart_of(&self, id: ParticipantId, index: usize) -> &Participant {
        self.participant(id.counterpart(index))
    }

    /// `MatchError::Configuration` unless `index` names a member of a group
    fn check_index(&self, group: Group, index: usize) -> Result<()> {
        if index >= self.size() {
            return Err(MatchError::configuration(format!(
                "group {} has no member {} in a pool of size {}",
                group,
                index + 1,
                self.size()
            )));
        }
        Ok(())
    }

    /// Split borrow: `(group, opposite group)`
    fn sides_mut(&mut self, group: Group) -> (&mut [Participant], &mut [Participant]) {
        match group {
            Group::A => (self.group_a.as_mut_slice(), self.group_b.as_mut_slice()),
            Group::B => (self.group_b.as_mut_slice(), self.group_a.as_mut_slice()),
        }
    }

    /// Replace the preference list of `id`
    ///
    /// # Errors
    /// `MatchError::Configuration` if the list does not rank exactly the
    /// members of the other group, or if `id` is out of range.
    pub fn set_preferences(&mut self, id: ParticipantId, preferences: PreferenceList) -> Result<()> {
        self.check_index(id.group, id.index)?;
        if preferences.len() != self.size() {
            return Err(MatchError::configuration(format!(
                "{} ranks {} candidates but the other group has {}",
                id,
                preferences.len(),
                self.size()
            )));
        }
        let (own, _) = self.sides_mut(id.group);
        own[id.index].set_preferences(preferences);
        Ok(())
    }

    /// `proposer` offers to member `target` of the opposite group
    ///
    /// # Errors
    /// `MatchError::NotSingle` if `proposer` is engaged, or
    /// `MatchError::Configuration` if either index is out of range.
    pub fn propose(&mut self, proposer: ParticipantId, target: usize) -> Result<Proposal> {
        self.check_index(proposer.group, proposer.index)?;
        self.check_index(proposer.group.opposite(), target)?;
        let (own, other) = self.sides_mut(proposer.group);
        participant::propose(own, other, proposer.index, target)
    }

    /// `id` drops its partner, whose cursor moves past `id`
    pub fn jilt(&mut self, id: ParticipantId) -> Result<()> {
        self.check_index(id.group, id.index)?;
        let (own, other) = self.sides_mut(id.group);
        participant::jilt(own, other, id.index)
    }

    /// Advance the cursor of `id` past its current favorite
    pub fn advance(&mut self, id: ParticipantId) -> Result<usize> {
        self.check_index(id.group, id.index)?;
        let (own, _) = self.sides_mut(id.group);
        own[id.index].preferences_mut().advance()
    }

    /// Members of `group` that are currently single
    pub fn single_members(&self, group: Group) -> Vec<ParticipantId> {
        self.group(group)
            .iter()
            .filter(|p| p.is_single())
            .map(|p| p.id())
            .collect()
    }

    /// `true` if some unmatched pair would both rather be with each other
    ///
    /// A single participant counts as preferring any partner to none.
    pub fn has_rogue_couples(&self) -> bool {
        self.group_a.iter().any(|a| {
            self.group_b.iter().enumerate().any(|(b_index, b)| {
                a.partner() != Some(b_index)
                    && a.would_leave_for(b_index)
                    && b.would_leave_for(a.id().index)
            })
        })
    }

    /// Sum of preference distances over `group`
    ///
    /// # Errors
    /// `MatchError::Unmatched` naming the first single member.
    pub fn aggregate_preference_distance(&self, group: Group) -> Result<usize> {
        self.group(group).iter().try_fold(0, |sum, p| {
            p.preference_distance()
                .map(|distance| sum + distance)
                .ok_or(MatchError::Unmatched { participant: p.id() })
        })
    }

    /// The current assignment, or `None` unless everyone is engaged
    pub fn matching(&self) -> Option<Matching> {
        self.group_a.iter().map(|a| a.partner()).collect()
    }

    /// Replace every engagement with `matching`. Cursors are untouched.
    ///
    /// # Errors
    /// `MatchError::Configuration` unless `matching` is a permutation of the
    /// group B indices.
    pub fn apply_matching(&mut self, matching: &[usize]) -> Result<()> {
        if matching.len() != self.size() {
            return Err(MatchError::configuration(format!(
                "matching pairs {} members but the pool has {}",
                matching.len(),
                self.size()
            )));
        }
        inverse_permutation(matching)?;

        for (a_index, &b_index) in matching.iter().enumerate() {
            self.group_a[a_index].engage(b_index);
            self.group_b[b_index].engage(a_index);
        }
        Ok(())
    }

    /// Every stable matching of this instance, by brute force over all N! assignments
    ///
    /// Works on a private copy, so the live engagements are never touched.
    pub fn stable_matchings(&self) -> Vec<Matching> {
        let mut trial = self.clone();
        let size = self.size();

        (0..size)
            .permutations(size)
            .filter(|assignment| {
                for (a_index, &b_index) in assignment.iter().enumerate() {
                    trial.group_a[a_index].engage(b_index);
                    trial.group_b[b_index].engage(a_index);
                }
                !trial.has_rogue_couples()
            })
            .collect()
    }

    pub fn count_stable_matchings(&self) -> usize {
        self.stable_matchings().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with(a: &[&[usize]], b: &[&[usize]]) -> Pool {
        let mut pool = Pool::new(a.len()).unwrap();
        for (i, list) in a.iter().enumerate() {
            pool.set_preferences(
                ParticipantId::new(Group::A, i),
                PreferenceList::new(list.to_vec()).unwrap(),
            )
            .unwrap();
        }
        for (i, list) in b.iter().enumerate() {
            pool.set_preferences(
                ParticipantId::new(Group::B, i),
                PreferenceList::new(list.to_vec()).unwrap(),
            )
            .unwrap();
        }
        pool
    }

    #[test]
    fn test_new_pool_is_single() {
        let pool = Pool::new(3).unwrap();
        assert_eq!(pool.size(), 3);
        assert_eq!(pool.single_members(Group::A).len(), 3);
        assert_eq!(pool.single_members(Group::B).len(), 3);
        assert_eq!(pool.matching(), None);
        assert!(Pool::new(0).is_err());
    }

    #[test]
    fn test_set_preferences_checks_length() {
        let mut pool = Pool::new(2).unwrap();
        let err = pool
            .set_preferences(
                ParticipantId::new(Group::A, 0),
                PreferenceList::new(vec![0, 1, 2]).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, MatchError::Configuration(_)));
    }

    #[test]
    fn test_engagement_is_symmetric() {
        let mut pool = pool_with(&[&[1, 0], &[1, 0]], &[&[0, 1], &[0, 1]]);

        pool.propose(ParticipantId::new(Group::A, 1), 1).unwrap();
        pool.propose(ParticipantId::new(Group::A, 0), 1).unwrap();

        for a in pool.group(Group::A) {
            if let Some(b_index) = a.partner() {
                assert_eq!(pool.group(Group::B)[b_index].partner(), Some(a.id().index));
            }
        }
        assert_eq!(pool.group(Group::B)[1].partner(), Some(0));
        assert!(pool.group(Group::A)[1].is_single());
        assert_eq!(pool.group(Group::A)[1].current_favorite(), 0);
    }

    #[test]
    fn test_rogue_couple_detected() {
        // Everyone ranks index 0 first; pairing 0-1 and 1-0 leaves A1 and B1 blocking
        let mut pool = pool_with(&[&[0, 1], &[0, 1]], &[&[0, 1], &[0, 1]]);
        pool.apply_matching(&[1, 0]).unwrap();
        assert!(pool.has_rogue_couples());
        assert!(pool.has_rogue_couples());

        pool.apply_matching(&[0, 1]).unwrap();
        assert!(!pool.has_rogue_couples());
    }

    #[test]
    fn test_aggregate_distance() {
        let mut pool = pool_with(&[&[0, 1], &[0, 1]], &[&[1, 0], &[0, 1]]);
        assert_eq!(
            pool.aggregate_preference_distance(Group::A),
            Err(MatchError::Unmatched {
                participant: ParticipantId::new(Group::A, 0)
            })
        );

        pool.apply_matching(&[1, 0]).unwrap();
        assert_eq!(pool.aggregate_preference_distance(Group::A), Ok(1));
        assert_eq!(pool.aggregate_preference_distance(Group::B), Ok(0));
    }

    #[test]
    fn test_apply_matching_rejects_non_permutation() {
        let mut pool = Pool::new(2).unwrap();
        assert!(pool.apply_matching(&[0, 0]).is_err());
        assert!(pool.apply_matching(&[0]).is_err());
    }

    #[test]
    fn test_out_of_range_ids_are_errors() {
        let mut pool = Pool::new(2).unwrap();
        let outside = ParticipantId::new(Group::A, 2);

        assert!(matches!(pool.propose(outside, 0), Err(MatchError::Configuration(_))));
        assert!(matches!(
            pool.propose(ParticipantId::new(Group::A, 0), 5),
            Err(MatchError::Configuration(_))
        ));
        assert!(matches!(pool.jilt(outside), Err(MatchError::Configuration(_))));
        assert!(matches!(pool.advance(outside), Err(MatchError::Configuration(_))));
        assert!(matches!(
            pool.set_preferences(outside, PreferenceList::new(vec![0, 1]).unwrap()),
            Err(MatchError::Configuration(_))
        ));
        assert_eq!(pool.single_members(Group::B).len(), 2);
    }

    #[test]
    fn test_engaged_proposer_is_refused() {
        let mut pool = Pool::new(2).unwrap();
        let first = ParticipantId::new(Group::A, 0);

        pool.propose(first, 0).unwrap();
        assert_eq!(
            pool.propose(first, 1),
            Err(MatchError::NotSingle { participant: first })
        );

        // One engagement, still symmetric
        assert_eq!(pool.group(Group::A)[0].partner(), Some(0));
        assert_eq!(pool.group(Group::B)[0].partner(), Some(0));
        assert!(pool.group(Group::B)[1].is_single());
    }

    #[test]
    fn test_counting_leaves_pool_untouched() {
        let mut pool = pool_with(&[&[0, 1], &[1, 0]], &[&[1, 0], &[0, 1]]);
        pool.propose(ParticipantId::new(Group::A, 0), 0).unwrap();

        assert_eq!(pool.count_stable_matchings(), 2);
        assert_eq!(pool.group(Group::A)[0].partner(), Some(0));
        assert!(pool.group(Group::A)[1].is_single());
        assert!(pool.group(Group::B)[1].is_single());
    }

    #[test]
    fn test_single_participant_pool_has_one_stable_matching() {
        let pool = Pool::new(1).unwrap();
        assert_eq!(pool.count_stable_matchings(), 1);
        assert_eq!(pool.stable_matchings(), vec![vec![0]]);
    }
}
