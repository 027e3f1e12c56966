//! Per-factor scoring rules. Every rule returns a sub-score on a 0-100 scale and resolves
//! missing or unrecognised input to a fixed default instead of failing.

use std::collections::HashSet;

use super::domain::{BloodType, Reported};

/// Sub-score used when a factor cannot be assessed from the supplied data.
pub const NEUTRAL_SCORE: f64 = 50.0;

const EXACT_BLOOD_MATCH: f64 = 100.0;
const COMPATIBLE_BLOOD_MATCH: f64 = 80.0;
const AGE_GAP_FLOOR: f64 = 20.0;

/// Blood-type sub-score.
///
/// A recipient without a blood type is a search without a blood-type filter, so every
/// donor earns full marks. Once the recipient names a group, a missing or unrecognised
/// group on either side scores 0.
pub fn blood_type_score(
    donor: Option<&Reported<BloodType>>,
    recipient: Option<&Reported<BloodType>>,
) -> f64 {
    let Some(recipient) = recipient else {
        return EXACT_BLOOD_MATCH;
    };

    let (Some(donor), Some(recipient)) = (donor.and_then(Reported::known), recipient.known())
    else {
        return 0.0;
    };

    if donor == recipient {
        EXACT_BLOOD_MATCH
    } else if donor.can_donate_to(*recipient) {
        COMPATIBLE_BLOOD_MATCH
    } else {
        0.0
    }
}

/// HLA sub-score: Jaccard similarity of the two antigen sets, scaled to 0-100.
pub fn tissue_score(donor: Option<&str>, recipient: Option<&str>) -> f64 {
    let (Some(donor), Some(recipient)) = (donor, recipient) else {
        return NEUTRAL_SCORE;
    };

    let donor_antigens = antigen_set(donor);
    let recipient_antigens = antigen_set(recipient);
    if donor_antigens.is_empty() || recipient_antigens.is_empty() {
        return NEUTRAL_SCORE;
    }

    let shared = donor_antigens.intersection(&recipient_antigens).count();
    let union = donor_antigens.union(&recipient_antigens).count();

    shared as f64 / union as f64 * 100.0
}

/// Comma-separated HLA antigens as a set of trimmed, non-empty tokens.
pub(crate) fn antigen_set(raw: &str) -> HashSet<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Age sub-score, a step function of the absolute age gap.
///
/// An age of zero is treated as not reported.
pub fn age_score(donor: Option<u32>, recipient: Option<u32>) -> f64 {
    let (Some(donor), Some(recipient)) = (
        donor.filter(|age| *age > 0),
        recipient.filter(|age| *age > 0),
    ) else {
        return NEUTRAL_SCORE;
    };

    match donor.abs_diff(recipient) {
        0..=5 => 100.0,
        6..=10 => 90.0,
        11..=15 => 75.0,
        16..=20 => 60.0,
        gap => (40.0 - (gap - 20) as f64).max(AGE_GAP_FLOOR),
    }
}

/// Urgency factor: the recipient's urgency clamped to 0-100, neutral when absent.
pub fn urgency_factor(urgency: Option<f64>) -> f64 {
    match urgency {
        Some(value) if !value.is_nan() => value.clamp(0.0, 100.0),
        _ => NEUTRAL_SCORE,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
