use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Pool;
use crate::models::{Group, ParticipantId};

/// Engagement summary for one group A member and its partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementEntry {
    pub id: ParticipantId,
    pub name: String,
    #[serde(rename = "preferenceDistance")]
    pub preference_distance: Option<usize>,
    pub partner: Option<String>,
    #[serde(rename = "partnerPreferenceDistance")]
    pub partner_preference_distance: Option<usize>,
}

/// Snapshot of a pool's engagements and aggregate queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolReport {
    pub size: usize,
    pub engagements: Vec<EngagementEntry>,
    #[serde(rename = "groupADistance")]
    pub group_a_distance: Option<usize>,
    #[serde(rename = "groupBDistance")]
    pub group_b_distance: Option<usize>,
    #[serde(rename = "rogueCouples")]
    pub rogue_couples: bool,
}

impl PoolReport {
    pub fn from_pool(pool: &Pool) -> Self {
        let engagements = pool
            .group(Group::A)
            .iter()
            .map(|member| {
                let partner = member.partner().map(|index| pool.counterpart_of(member.id(), index));
                EngagementEntry {
                    id: member.id(),
                    name: member.name().to_string(),
                    preference_distance: member.preference_distance(),
                    partner: partner.map(|p| p.name().to_string()),
                    partner_preference_distance: partner.and_then(|p| p.preference_distance()),
                }
            })
            .collect();

        Self {
            size: pool.size(),
            engagements,
            group_a_distance: pool.aggregate_preference_distance(Group::A).ok(),
            group_b_distance: pool.aggregate_preference_distance(Group::B).ok(),
            rogue_couples: pool.has_rogue_couples(),
        }
    }
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.engagements {
            write!(f, "{}(pd={}) is engaged to ", entry.name, display_distance(entry.preference_distance))?;
            match &entry.partner {
                Some(partner) => writeln!(
                    f,
                    "{}(pd={})",
                    partner,
                    display_distance(entry.partner_preference_distance)
                )?,
                None => writeln!(f, "--")?,
            }
        }
        writeln!(f, "Group A pd={}", display_distance(self.group_a_distance))?;
        writeln!(f, "Group B pd={}", display_distance(self.group_b_distance))?;
        write!(
            f,
            "There are {}rogue couples",
            if self.rogue_couples { "" } else { "no " }
        )
    }
}

fn display_distance(distance: Option<usize>) -> String {
    distance.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Result of a matcher run together with the final pool state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(rename = "proposingGroup")]
    pub proposing_group: Group,
    pub rounds: usize,
    pub proposals: usize,
    pub stable: bool,
    pub pool: PoolReport,
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.pool)?;
        write!(
            f,
            "Group {} proposed: took {} rounds and {} proposals.",
            self.proposing_group, self.rounds, self.proposals
        )
    }
}

/// Result of brute-force stable matching enumeration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountReport {
    pub size: usize,
    #[serde(rename = "stableMatchings")]
    pub stable_matchings: usize,
}

impl fmt::Display for CountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool of size {} has {} stable matchings",
            self.size, self.stable_matchings
        )
    }
}
