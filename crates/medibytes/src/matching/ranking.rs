use serde::{Deserialize, Serialize};

use super::domain::CompatibilityResult;

/// A scored candidate, pairing the caller's identity handle with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch<C> {
    pub candidate: C,
    pub compatibility: CompatibilityResult,
}

/// Ranking output with the leading candidate split out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary<C> {
    pub best_match: Option<RankedMatch<C>>,
    pub all_matches: Vec<RankedMatch<C>>,
}

impl<C: Clone> MatchSummary<C> {
    pub(crate) fn from_ranked(all_matches: Vec<RankedMatch<C>>) -> Self {
        Self {
            best_match: all_matches.first().cloned(),
            all_matches,
        }
    }
}

/// Orders matches by score, highest first. `sort_by` is stable, so tied candidates keep
/// the order in which they were supplied.
pub(crate) fn order_by_score<C>(matches: &mut [RankedMatch<C>]) {
    matches.sort_by(|left, right| {
        right
            .compatibility
            .score
            .total_cmp(&left.compatibility.score)
    });
}
