use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::core::pool::Pool;
use crate::error::{MatchError, Result};
use crate::models::{Group, Proposal};

/// What a proposer does after its proposal is rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Move on to the next candidate immediately (classical Gale-Shapley)
    #[default]
    Advance,
    /// Keep the same candidate; only a jilt moves the cursor
    Retry,
}

/// Result of a matcher run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub rounds: usize,
    pub proposals: usize,
    pub stable: bool,
}

/// Gale-Shapley deferred acceptance over a pool
///
/// # Algorithm
/// Each round, every member of the proposing group that is single at the
/// start of the round proposes to its current favorite. Rounds repeat until
/// no proposer is single. The result is the stable matching that is best for
/// every proposer and worst for every reviewer.
pub struct GaleShapley<'a> {
    pool: &'a mut Pool,
    proposing: Group,
    policy: RejectionPolicy,
    rounds: usize,
    proposals: usize,
}

impl<'a> GaleShapley<'a> {
    pub fn new(pool: &'a mut Pool, proposing: Group) -> Self {
        Self {
            pool,
            proposing,
            policy: RejectionPolicy::default(),
            rounds: 0,
            proposals: 0,
        }
    }

    pub fn with_policy(mut self, policy: RejectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn proposals(&self) -> usize {
        self.proposals
    }

    /// Run rounds until every proposer is engaged
    ///
    /// # Errors
    /// `MatchError::Stalled` under `RejectionPolicy::Retry` when a whole round
    /// passes without an accepted proposal, since every later round would
    /// repeat it. `MatchError::Exhausted` if a proposer runs out of candidates,
    /// which cannot happen with total preference lists.
    pub fn run(&mut self) -> Result<MatchOutcome> {
        loop {
            let single = self.pool.single_members(self.proposing);
            if single.is_empty() {
                break;
            }

            self.rounds += 1;
            debug!("Round {}: {} single proposers", self.rounds, single.len());

            let mut accepted = 0;
            for &proposer in &single {
                let target = self.pool.participant(proposer).current_favorite();
                self.proposals += 1;

                let outcome = self.pool.propose(proposer, target)?;
                trace!(
                    "{} proposes to {}: {:?}",
                    proposer,
                    proposer.counterpart(target),
                    outcome
                );

                match outcome {
                    Proposal::Accepted => accepted += 1,
                    Proposal::Rejected => {
                        if self.policy == RejectionPolicy::Advance {
                            self.pool.advance(proposer)?;
                        }
                    }
                }
            }

            if accepted == 0 && self.policy == RejectionPolicy::Retry {
                return Err(MatchError::Stalled {
                    round: self.rounds,
                    single: single.len(),
                });
            }
        }

        let stable = !self.pool.has_rogue_couples();
        info!(
            "Group {} matched in {} rounds with {} proposals, {}rogue couples",
            self.proposing,
            self.rounds,
            self.proposals,
            if stable { "no " } else { "" }
        );

        Ok(MatchOutcome {
            rounds: self.rounds,
            proposals: self.proposals,
            stable,
        })
    }
}

/// Match `pool` with group A proposing if `group_a_proposes`, else group B
///
/// Returns the number of rounds taken and whether the result is stable.
pub fn run_matching(pool: &mut Pool, group_a_proposes: bool) -> Result<(usize, bool)> {
    let proposing = if group_a_proposes { Group::A } else { Group::B };
    let outcome = GaleShapley::new(pool, proposing).run()?;
    Ok((outcome.rounds, outcome.stable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generators::{set_custom_lists, set_worst_case_lists};

    fn custom_pool(a: &[Vec<usize>], b: &[Vec<usize>]) -> Pool {
        let mut pool = Pool::new(a.len()).unwrap();
        set_custom_lists(&mut pool, a, b, true).unwrap();
        pool
    }

    #[test]
    fn test_single_round_when_favorites_differ() {
        let mut pool = custom_pool(&[vec![0, 1], vec![1, 0]], &[vec![0, 1], vec![1, 0]]);
        let outcome = GaleShapley::new(&mut pool, Group::A).run().unwrap();

        assert_eq!(
            outcome,
            MatchOutcome {
                rounds: 1,
                proposals: 2,
                stable: true
            }
        );
        assert_eq!(pool.matching(), Some(vec![0, 1]));
    }

    #[test]
    fn test_rejected_proposer_advances() {
        let mut pool = custom_pool(&[vec![0, 1], vec![0, 1]], &[vec![0, 1], vec![0, 1]]);
        let outcome = GaleShapley::new(&mut pool, Group::A).run().unwrap();

        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.proposals, 3);
        assert!(outcome.stable);
        assert_eq!(pool.matching(), Some(vec![0, 1]));
    }

    #[test]
    fn test_retry_policy_stalls_on_rejection() {
        let mut pool = custom_pool(&[vec![0, 1], vec![0, 1]], &[vec![0, 1], vec![0, 1]]);
        let err = GaleShapley::new(&mut pool, Group::A)
            .with_policy(RejectionPolicy::Retry)
            .run()
            .unwrap_err();

        assert_eq!(err, MatchError::Stalled { round: 2, single: 1 });
    }

    #[test]
    fn test_retry_policy_matches_advance_without_direct_rejections() {
        // Worst-case lists only ever displace proposers through jilts
        let mut retry = Pool::new(5).unwrap();
        set_worst_case_lists(&mut retry).unwrap();
        let mut advance = retry.clone();

        let retried = GaleShapley::new(&mut retry, Group::A)
            .with_policy(RejectionPolicy::Retry)
            .run()
            .unwrap();
        let advanced = GaleShapley::new(&mut advance, Group::A).run().unwrap();

        assert_eq!(retried, advanced);
        assert_eq!(retry.matching(), advance.matching());
    }

    #[test]
    fn test_already_matched_pool_takes_no_rounds() {
        let mut pool = custom_pool(&[vec![0, 1], vec![1, 0]], &[vec![0, 1], vec![1, 0]]);
        pool.apply_matching(&[0, 1]).unwrap();

        assert_eq!(run_matching(&mut pool, true).unwrap(), (0, true));
    }

    #[test]
    fn test_reviewers_can_propose() {
        let mut pool = custom_pool(&[vec![0, 1], vec![1, 0]], &[vec![1, 0], vec![0, 1]]);

        let (rounds, stable) = run_matching(&mut pool, false).unwrap();
        assert_eq!(rounds, 1);
        assert!(stable);
        // Group B gets its first choices
        assert_eq!(pool.matching(), Some(vec![1, 0]));
    }
}
