//! Preference-list strategies
//!
//! Every strategy leaves each participant with a permutation of the opposite
//! group. That is the only property the matcher relies on.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::core::pool::Pool;
use crate::core::preference::PreferenceList;
use crate::error::{MatchError, Result};
use crate::models::{Group, ParticipantId};

/// Explicit rank sequences for both groups
///
/// `group_a[i]` lists group B members for A member `i`, most preferred first,
/// and `group_b` likewise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLists {
    #[serde(default)]
    pub one_indexed: bool,
    pub group_a: Vec<Vec<usize>>,
    pub group_b: Vec<Vec<usize>>,
}

impl CustomLists {
    /// Parse lists from a TOML document
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| MatchError::CustomFile(e.to_string()))
    }

    /// Read and parse a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| MatchError::CustomFile(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&source)
    }

    pub fn apply(&self, pool: &mut Pool) -> Result<()> {
        set_custom_lists(pool, &self.group_a, &self.group_b, !self.one_indexed)
    }
}

/// Strategy names accepted by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceStrategy {
    WorstCase,
    Randomized,
    ManyStable,
    Custom,
}

impl PreferenceStrategy {
    /// Populate `pool` with this strategy
    ///
    /// `custom` is required by `Custom` and ignored otherwise.
    pub fn apply<R: Rng + ?Sized>(
        self,
        pool: &mut Pool,
        rng: &mut R,
        custom: Option<&CustomLists>,
    ) -> Result<()> {
        match self {
            PreferenceStrategy::WorstCase => set_worst_case_lists(pool),
            PreferenceStrategy::Randomized => set_randomized_lists(pool, rng),
            PreferenceStrategy::ManyStable => set_many_stable_matchings_lists(pool),
            PreferenceStrategy::Custom => custom
                .ok_or_else(|| MatchError::configuration("custom strategy requires preference lists"))?
                .apply(pool),
        }
    }
}

/// Lists that make group A proposing take N(N-1)+1 proposals
///
/// After Kapur & Krishnamoorthy, "Worst Case Choice for the Stable Marriage
/// Problem". A member `i` ranks the first N-1 members of B rotated by `i - 1`
/// and always puts the last member of B last. B member `i` ranks A rotated by
/// `i + 2`, except the last two rows which rotate by 1 and 0.
pub fn set_worst_case_lists(pool: &mut Pool) -> Result<()> {
    let n = pool.size();

    for i in 0..n {
        let mut ranking: Vec<usize> = (0..n - 1).collect();
        if !ranking.is_empty() {
            let len = ranking.len();
            ranking.rotate_right(1);
            ranking.rotate_left(i % len);
        }
        ranking.push(n - 1);
        pool.set_preferences(ParticipantId::new(Group::A, i), PreferenceList::new(ranking)?)?;
    }

    for i in 0..n {
        let mut ranking: Vec<usize> = (0..n).collect();
        let shift = if i + 3 <= n {
            i + 2
        } else if i + 2 == n {
            1
        } else {
            0
        };
        ranking.rotate_left(shift % n);
        pool.set_preferences(ParticipantId::new(Group::B, i), PreferenceList::new(ranking)?)?;
    }

    debug!("Assigned worst-case preference lists for {} participants", n);
    Ok(())
}

/// Independent uniformly random permutation for every participant
pub fn set_randomized_lists<R: Rng + ?Sized>(pool: &mut Pool, rng: &mut R) -> Result<()> {
    let n = pool.size();

    for group in [Group::A, Group::B] {
        for i in 0..n {
            let mut ranking: Vec<usize> = (0..n).collect();
            ranking.shuffle(rng);
            pool.set_preferences(ParticipantId::new(group, i), PreferenceList::new(ranking)?)?;
        }
    }

    debug!("Assigned randomized preference lists for {} participants", n);
    Ok(())
}

/// Lists intended to produce many stable matchings
///
/// Loosely after Thurber, "Concerning the maximum number of stable matchings
/// in the stable marriage problem". Row `i` of group A is `0..N` rotated by
/// `i` for even `i`, or reversed and rotated by `i + 1` for odd `i`; group B
/// row `i` is row `i` of group A reversed. Gives 2 stable matchings for N=2
/// and 10 for N=4. Not verified to match Thurber's counts for N > 4.
///
/// # Errors
/// `MatchError::Configuration` unless the pool size is a power of two.
pub fn set_many_stable_matchings_lists(pool: &mut Pool) -> Result<()> {
    let n = pool.size();
    if !n.is_power_of_two() {
        return Err(MatchError::configuration(format!(
            "many-stable-matchings lists need a power-of-two pool size, got {}",
            n
        )));
    }

    let rows: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            let mut row: Vec<usize> = (0..n).collect();
            if i % 2 == 0 {
                row.rotate_left(i % n);
            } else {
                row.reverse();
                row.rotate_left((i + 1) % n);
            }
            row
        })
        .collect();

    let reversed: Vec<Vec<usize>> = rows
        .iter()
        .map(|row| row.iter().rev().copied().collect())
        .collect();

    debug!("Many-stable-matchings lists: A={:?} B={:?}", rows, reversed);
    set_custom_lists(pool, &rows, &reversed, true)
}

/// Assign explicit rank sequences
///
/// # Errors
/// `MatchError::Configuration` if either group has the wrong number of lists
/// or any list is not a permutation of the other group.
pub fn set_custom_lists(
    pool: &mut Pool,
    group_a: &[Vec<usize>],
    group_b: &[Vec<usize>],
    zero_indexed: bool,
) -> Result<()> {
    let n = pool.size();

    for (group, lists) in [(Group::A, group_a), (Group::B, group_b)] {
        if lists.len() != n {
            return Err(MatchError::configuration(format!(
                "group {} has {} preference lists for a pool of size {}",
                group,
                lists.len(),
                n
            )));
        }

        for (i, list) in lists.iter().enumerate() {
            let ranking = list
                .iter()
                .map(|&rank| {
                    if zero_indexed {
                        Ok(rank)
                    } else {
                        rank.checked_sub(1).ok_or_else(|| {
                            MatchError::configuration(format!(
                                "{} lists 0 in a 1-indexed preference list",
                                ParticipantId::new(group, i)
                            ))
                        })
                    }
                })
                .collect::<Result<Vec<usize>>>()?;
            pool.set_preferences(ParticipantId::new(group, i), PreferenceList::new(ranking)?)?;
        }
    }

    Ok(())
}
