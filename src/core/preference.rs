use std::fmt;

use crate::error::{MatchError, Result};

/// A strict total ranking of the opposite group with a cursor over the
/// candidates not yet given up on
///
/// Candidates are stored as indices into the opposite group. The ranking is a
/// permutation of `0..len` and never changes after construction; only the
/// cursor moves, and only forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceList {
    ranking: Vec<usize>,
    ranks: Vec<usize>,
    cursor: usize,
}

impl PreferenceList {
    /// Build a list from candidates ordered most preferred first
    ///
    /// # Errors
    /// `MatchError::Configuration` if `ranking` is empty or is not a
    /// permutation of `0..ranking.len()`.
    pub fn new(ranking: Vec<usize>) -> Result<Self> {
        if ranking.is_empty() {
            return Err(MatchError::configuration(
                "candidates exhausted: preference list is empty",
            ));
        }

        let ranks = inverse_permutation(&ranking)?;
        Ok(Self {
            ranking,
            ranks,
            cursor: 0,
        })
    }

    /// Ranking `0, 1, .., len - 1`
    pub(crate) fn identity(len: usize) -> Self {
        Self {
            ranking: (0..len).collect(),
            ranks: (0..len).collect(),
            cursor: 0,
        }
    }

    /// The candidate at the cursor
    #[inline]
    pub fn current_favorite(&self) -> usize {
        self.ranking[self.cursor]
    }

    /// Give up on the current favorite and return the next one
    ///
    /// # Errors
    /// `MatchError::Exhausted` if the current favorite is the last candidate.
    /// The cursor is left where it was.
    pub fn advance(&mut self) -> Result<usize> {
        if self.cursor + 1 >= self.ranking.len() {
            return Err(MatchError::Exhausted {
                rank: self.cursor,
                len: self.ranking.len(),
            });
        }
        self.cursor += 1;
        Ok(self.current_favorite())
    }

    /// 0-based rank of `candidate`, lower is more preferred
    ///
    /// # Panics
    /// If `candidate` is not a member of the opposite group.
    #[inline]
    pub fn rank_of(&self, candidate: usize) -> usize {
        self.ranks[candidate]
    }

    /// `true` if `a` is strictly preferred to `b`
    #[inline]
    pub fn prefers(&self, a: usize, b: usize) -> bool {
        self.rank_of(a) < self.rank_of(b)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }
}

/// Inverse of `items`, which must be a permutation of `0..items.len()`
///
/// # Errors
/// `MatchError::Configuration` naming the first out-of-range or repeated entry.
pub(crate) fn inverse_permutation(items: &[usize]) -> Result<Vec<usize>> {
    let len = items.len();
    let mut inverse = vec![usize::MAX; len];
    for (position, &item) in items.iter().enumerate() {
        if item >= len {
            return Err(MatchError::configuration(format!(
                "candidate {} is out of range for a list of {}",
                item, len
            )));
        }
        if inverse[item] != usize::MAX {
            return Err(MatchError::configuration(format!(
                "candidate {} is ranked twice",
                item
            )));
        }
        inverse[item] = position;
    }
    Ok(inverse)
}

/// Renders the ranking 1-based, with the current favorite marked by `!`
impl fmt::Display for PreferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (rank, candidate) in self.ranking.iter().enumerate() {
            if rank > 0 {
                write!(f, ", ")?;
            }
            if rank == self.cursor {
                write!(f, "!")?;
            }
            write!(f, "{}", candidate + 1)?;
        }
        write!(f, "]")
    }
}
