use std::ops::RangeInclusive;

use chrono::NaiveDate;

use super::config::MatchingConfig;
use super::domain::{DonorRecord, DonorRegistration, DonorSearchFilters};
use crate::matching::rules::antigen_set;
use crate::matching::{BloodType, DonorProfile, OrganType, RecipientProfile, Reported};

/// Donor ages accepted at registration.
pub const DONOR_AGE_RANGE: RangeInclusive<u32> = 18..=75;

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("donor id must not be empty")]
    MissingDonorId,
    #[error("invalid blood type '{0}' (expected one of A+, A-, B+, B-, AB+, AB-, O+, O-)")]
    InvalidBloodType(String),
    #[error("unknown organ type '{0}' (expected kidney, liver, heart, lung, pancreas or cornea)")]
    UnknownOrgan(String),
    #[error("at least one organ type is required")]
    MissingOrgan,
    #[error("donor age must be between 18 and 75 (got {0})")]
    AgeOutOfRange(u32),
    #[error("a medical clearance certificate id is required")]
    MissingClearance,
    #[error("search limit must be between 1 and 100 (got {0})")]
    InvalidLimit(usize),
    #[error("min_age {min} exceeds max_age {max}")]
    InvalidAgeRange { min: u32, max: u32 },
}

pub(crate) fn record_from_registration(
    registration: DonorRegistration,
    registered_on: NaiveDate,
) -> Result<DonorRecord, ValidationError> {
    let DonorRegistration {
        donor_id,
        blood_type,
        organ_type,
        age,
        tissue_type,
        health_score,
        clearance_cid,
    } = registration;

    if donor_id.0.trim().is_empty() {
        return Err(ValidationError::MissingDonorId);
    }

    let blood_type = known_blood_type(&blood_type)?;

    if let Some(unknown) = organ_type.unrecognized().next() {
        return Err(ValidationError::UnknownOrgan(unknown.to_string()));
    }
    if organ_type.is_empty() {
        return Err(ValidationError::MissingOrgan);
    }

    if !DONOR_AGE_RANGE.contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }

    let clearance_cid = clearance_cid.trim().to_string();
    if clearance_cid.is_empty() {
        return Err(ValidationError::MissingClearance);
    }

    let tissue_type = tissue_type
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok(DonorRecord {
        donor_id,
        profile: DonorProfile {
            blood_type: Some(Reported::Known(blood_type)),
            age: Some(age),
            tissue_type,
            organ_type,
            health_score,
        },
        clearance_cid,
        is_active: true,
        registered_on,
    })
}

fn known_blood_type(reported: &Reported<BloodType>) -> Result<BloodType, ValidationError> {
    reported
        .known()
        .copied()
        .ok_or_else(|| ValidationError::InvalidBloodType(reported.to_string()))
}

pub(crate) fn known_organ(reported: &Reported<OrganType>) -> Result<OrganType, ValidationError> {
    reported
        .known()
        .copied()
        .ok_or_else(|| ValidationError::UnknownOrgan(reported.to_string()))
}

/// Validated form of [`DonorSearchFilters`].
#[derive(Debug, Clone)]
pub(crate) struct SearchPlan {
    pub(crate) organ: OrganType,
    pub(crate) donor_blood_types: Option<Vec<BloodType>>,
    pub(crate) min_age: Option<u32>,
    pub(crate) max_age: Option<u32>,
    pub(crate) tissue_type: Option<String>,
    pub(crate) limit: usize,
    pub(crate) recipient: RecipientProfile,
}

impl SearchPlan {
    pub(crate) fn admits(&self, record: &DonorRecord) -> bool {
        let profile = &record.profile;

        if !record.is_active || !profile.organ_type.offers(self.organ) {
            return false;
        }

        if let Some(allowed) = &self.donor_blood_types {
            let donor_blood = profile.blood_type.as_ref().and_then(Reported::known);
            if !donor_blood.is_some_and(|blood| allowed.contains(blood)) {
                return false;
            }
        }

        if self.min_age.is_some() || self.max_age.is_some() {
            let Some(age) = profile.age else {
                return false;
            };
            if self.min_age.is_some_and(|min| age < min) || self.max_age.is_some_and(|max| age > max)
            {
                return false;
            }
        }

        match &self.tissue_type {
            Some(tissue) => profile
                .tissue_type
                .as_deref()
                .is_some_and(|donor| antigen_set(donor) == antigen_set(tissue)),
            None => true,
        }
    }
}

pub(crate) fn search_plan(
    filters: &DonorSearchFilters,
    config: &MatchingConfig,
) -> Result<SearchPlan, ValidationError> {
    let organ = known_organ(&filters.organ_type)?;

    let donor_blood_types = filters
        .blood_type
        .as_ref()
        .map(|reported| known_blood_type(reported).map(BloodType::compatible_donors))
        .transpose()?;

    if let (Some(min), Some(max)) = (filters.min_age, filters.max_age) {
        if min > max {
            return Err(ValidationError::InvalidAgeRange { min, max });
        }
    }

    let limit = filters.limit.unwrap_or(config.search_limit);
    if !MatchingConfig::SEARCH_LIMIT_RANGE.contains(&limit) {
        return Err(ValidationError::InvalidLimit(limit));
    }

    let tissue_type = filters
        .tissue_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(SearchPlan {
        organ,
        donor_blood_types,
        min_age: filters.min_age,
        max_age: filters.max_age,
        tissue_type,
        limit,
        recipient: filters.recipient_profile(),
    })
}
