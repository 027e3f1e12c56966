use crate::matching::domain::{BloodType, DonorProfile, OrganType, RecipientProfile};
use crate::matching::{CompatibilityEngine, CompatibilityResult, CompatibilityWeights};

pub(super) fn engine() -> CompatibilityEngine {
    CompatibilityEngine::new(CompatibilityWeights::STANDARD)
}

pub(super) fn kidney_donor(blood_type: BloodType, age: u32) -> DonorProfile {
    DonorProfile::new(blood_type, age).with_organs([OrganType::Kidney])
}

/// Donor from the reference scenario: O+, 35, A*02:01, kidney.
pub(super) fn reference_donor() -> DonorProfile {
    kidney_donor(BloodType::OPositive, 35).with_tissue_type("A*02:01")
}

/// Recipient from the reference scenario: O+, 42, A*02:01, urgency 70.
pub(super) fn reference_recipient() -> RecipientProfile {
    RecipientProfile::default()
        .with_blood_type(BloodType::OPositive)
        .with_age(42)
        .with_tissue_type("A*02:01")
        .with_urgency(70.0)
}

pub(super) fn reconstructed_total(
    result: &CompatibilityResult,
    weights: &CompatibilityWeights,
) -> f64 {
    result.factors.blood_type_match * weights.blood_type()
        + result.factors.tissue_match * weights.tissue_match()
        + result.factors.age_compatibility * weights.age_compatibility()
        + result.factors.urgency_factor * weights.urgency()
}
