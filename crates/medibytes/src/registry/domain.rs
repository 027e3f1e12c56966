use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::MatchingConfig;
use crate::matching::{
    BloodType, CompatibilityResult, DonorProfile, OrganList, OrganType, RecipientProfile,
    Reported,
};

/// Patient identifier of a registered donor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonorId(pub String);

impl fmt::Display for DonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Patient identifier of a transplant recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipientId(pub String);

/// Identifier assigned to a created organ match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(pub String);

/// Donor registration payload, validated before it becomes a [`DonorRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorRegistration {
    pub donor_id: DonorId,
    pub blood_type: Reported<BloodType>,
    pub organ_type: OrganList,
    pub age: u32,
    #[serde(default, alias = "tissue_type_hla")]
    pub tissue_type: Option<String>,
    #[serde(default)]
    pub health_score: Option<i32>,
    /// Content identifier of the medical clearance certificate, already pinned by the
    /// storage collaborator.
    #[serde(default)]
    pub clearance_cid: String,
}

/// Stored donor entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorRecord {
    pub donor_id: DonorId,
    pub profile: DonorProfile,
    pub clearance_cid: String,
    pub is_active: bool,
    pub registered_on: NaiveDate,
}

impl DonorRecord {
    pub fn view(&self, config: &MatchingConfig) -> DonorView {
        DonorView {
            donor_id: self.donor_id.clone(),
            blood_type: self
                .profile
                .blood_type
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            organ_type: self.profile.organ_type.to_string(),
            age: self.profile.age,
            tissue_type: self.profile.tissue_type.clone(),
            is_active: self.is_active,
            registered_on: self.registered_on,
            clearance_cid: self.clearance_cid.clone(),
            clearance_url: config.clearance_url(&self.clearance_cid),
        }
    }
}

/// Public representation of a donor returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorView {
    pub donor_id: DonorId,
    pub blood_type: String,
    pub organ_type: String,
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tissue_type: Option<String>,
    pub is_active: bool,
    pub registered_on: NaiveDate,
    pub clearance_cid: String,
    pub clearance_url: String,
}

/// Search criteria. The organ is required; blood type filters donors to those able to
/// give to that group, and the recipient fields shape the compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorSearchFilters {
    pub organ_type: Reported<OrganType>,
    #[serde(default)]
    pub blood_type: Option<Reported<BloodType>>,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default, alias = "tissue_type_hla")]
    pub tissue_type: Option<String>,
    #[serde(default)]
    pub recipient_age: Option<u32>,
    #[serde(default)]
    pub urgency_score: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl DonorSearchFilters {
    pub fn for_organ(organ: OrganType) -> Self {
        Self {
            organ_type: Reported::Known(organ),
            blood_type: None,
            min_age: None,
            max_age: None,
            tissue_type: None,
            recipient_age: None,
            urgency_score: None,
            limit: None,
        }
    }

    /// Recipient profile implied by the filters, used to score each candidate.
    pub fn recipient_profile(&self) -> RecipientProfile {
        RecipientProfile {
            blood_type: self.blood_type.clone(),
            age: self.recipient_age,
            tissue_type: self.tissue_type.clone(),
            organ_needed: Some(self.organ_type.clone()),
            urgency_score: self.urgency_score,
        }
    }
}

/// Search hit: the donor plus its compatibility with the searched recipient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDonor {
    #[serde(flatten)]
    pub donor: DonorView,
    pub compatibility: CompatibilityResult,
}

/// Request to pair a registered donor with a recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganMatchRequest {
    pub donor_id: DonorId,
    pub recipient_id: RecipientId,
    pub organ_type: Reported<OrganType>,
    #[serde(default)]
    pub recipient: RecipientProfile,
    /// Clinician (wallet address or staff id) creating the match.
    #[serde(default)]
    pub matched_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
        }
    }
}

/// Persisted donor/recipient pairing. The score is always computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganMatch {
    pub match_id: MatchId,
    pub donor_id: DonorId,
    pub recipient_id: RecipientId,
    pub organ_type: OrganType,
    pub compatibility: CompatibilityResult,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<String>,
    pub created_on: NaiveDate,
}
