//! Deterministic donor/recipient compatibility scoring.
//!
//! The engine is a pure function of its inputs and an immutable weight table: it performs
//! no I/O, keeps no state between calls and never fails for well-typed input.

pub mod domain;
mod ranking;
pub mod rules;
mod weights;

#[cfg(test)]
mod tests;

pub use domain::{
    BloodType, CompatibilityFactors, CompatibilityResult, DonorProfile, OrganList, OrganType,
    Recommendation, RecipientProfile, Reported, UnrecognizedValue,
};
pub use ranking::{MatchSummary, RankedMatch};
pub use weights::{CompatibilityWeights, WeightsError};

use std::borrow::Borrow;

use ranking::order_by_score;
use rules::round2;
use tracing::debug;

/// Stateless scorer applying a weight table to donor/recipient pairs.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEngine {
    weights: CompatibilityWeights,
}

impl CompatibilityEngine {
    pub fn new(weights: CompatibilityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CompatibilityWeights {
        &self.weights
    }

    /// Score a donor against an optional recipient. Without a recipient every factor
    /// falls back to its "no constraint" default.
    pub fn score(
        &self,
        donor: &DonorProfile,
        recipient: Option<&RecipientProfile>,
    ) -> CompatibilityResult {
        let unconstrained = RecipientProfile::default();
        let recipient = recipient.unwrap_or(&unconstrained);

        let blood =
            rules::blood_type_score(donor.blood_type.as_ref(), recipient.blood_type.as_ref());
        let tissue = rules::tissue_score(
            donor.tissue_type.as_deref(),
            recipient.tissue_type.as_deref(),
        );
        let age = rules::age_score(donor.age, recipient.age);
        let urgency = rules::urgency_factor(recipient.urgency_score);

        let weighted = blood * self.weights.blood_type()
            + tissue * self.weights.tissue_match()
            + age * self.weights.age_compatibility()
            + urgency * self.weights.urgency();
        let score = round2(weighted.clamp(0.0, 100.0));

        debug!(blood, tissue, age, urgency, score, "scored donor compatibility");

        CompatibilityResult {
            score,
            factors: CompatibilityFactors {
                blood_type_match: round2(blood),
                tissue_match: round2(tissue),
                age_compatibility: round2(age),
                urgency_factor: round2(urgency),
            },
            recommendation: Recommendation::for_score(score),
        }
    }

    /// Score independent pairs. Output is index-aligned with the input.
    pub fn score_batch<'a, I>(&self, pairs: I) -> Vec<CompatibilityResult>
    where
        I: IntoIterator<Item = (&'a DonorProfile, Option<&'a RecipientProfile>)>,
    {
        pairs
            .into_iter()
            .map(|(donor, recipient)| self.score(donor, recipient))
            .collect()
    }

    /// Rank donor candidates for a fixed recipient, best first. Ties keep input order.
    pub fn rank_donors<C, D, I>(
        &self,
        recipient: Option<&RecipientProfile>,
        candidates: I,
    ) -> Vec<RankedMatch<C>>
    where
        I: IntoIterator<Item = (C, D)>,
        D: Borrow<DonorProfile>,
    {
        let mut matches: Vec<RankedMatch<C>> = candidates
            .into_iter()
            .map(|(candidate, donor)| RankedMatch {
                compatibility: self.score(donor.borrow(), recipient),
                candidate,
            })
            .collect();
        order_by_score(&mut matches);
        matches
    }

    /// Rank recipient candidates for a fixed donor, best first. Ties keep input order.
    pub fn rank_recipients<C, R, I>(
        &self,
        donor: &DonorProfile,
        candidates: I,
    ) -> Vec<RankedMatch<C>>
    where
        I: IntoIterator<Item = (C, R)>,
        R: Borrow<RecipientProfile>,
    {
        let mut matches: Vec<RankedMatch<C>> = candidates
            .into_iter()
            .map(|(candidate, recipient)| RankedMatch {
                compatibility: self.score(donor, Some(recipient.borrow())),
                candidate,
            })
            .collect();
        order_by_score(&mut matches);
        matches
    }

    /// Rank donors and split out the leading candidate.
    pub fn best_match<C, D, I>(
        &self,
        recipient: Option<&RecipientProfile>,
        candidates: I,
    ) -> MatchSummary<C>
    where
        C: Clone,
        I: IntoIterator<Item = (C, D)>,
        D: Borrow<DonorProfile>,
    {
        MatchSummary::from_ranked(self.rank_donors(recipient, candidates))
    }
}
