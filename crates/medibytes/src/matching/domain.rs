use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "AB+")]
    AbPositive,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::ONegative,
        BloodType::OPositive,
        BloodType::ANegative,
        BloodType::APositive,
        BloodType::BNegative,
        BloodType::BPositive,
        BloodType::AbNegative,
        BloodType::AbPositive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BloodType::ONegative => "O-",
            BloodType::OPositive => "O+",
            BloodType::ANegative => "A-",
            BloodType::APositive => "A+",
            BloodType::BNegative => "B-",
            BloodType::BPositive => "B+",
            BloodType::AbNegative => "AB-",
            BloodType::AbPositive => "AB+",
        }
    }

    /// Whether a donor of this group can give to a recipient of `recipient` group.
    ///
    /// O- gives to everyone and AB+ receives from everyone.
    pub fn can_donate_to(self, recipient: BloodType) -> bool {
        use BloodType::*;

        match self {
            ONegative => true,
            OPositive => matches!(recipient, OPositive | APositive | BPositive | AbPositive),
            ANegative => matches!(recipient, ANegative | APositive | AbNegative | AbPositive),
            APositive => matches!(recipient, APositive | AbPositive),
            BNegative => matches!(recipient, BNegative | BPositive | AbNegative | AbPositive),
            BPositive => matches!(recipient, BPositive | AbPositive),
            AbNegative => matches!(recipient, AbNegative | AbPositive),
            AbPositive => recipient == AbPositive,
        }
    }

    /// Donor groups a recipient of this group can accept.
    pub fn compatible_donors(self) -> Vec<BloodType> {
        Self::ALL
            .into_iter()
            .filter(|donor| donor.can_donate_to(self))
            .collect()
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodType {
    type Err = UnrecognizedValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        // Accept the typographic minus sign as well as ASCII '-'.
        let normalized = raw.trim().replace('\u{2212}', "-").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|blood_type| blood_type.label() == normalized)
            .ok_or_else(|| UnrecognizedValue(raw.to_string()))
    }
}

/// Organs accepted by the donor registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganType {
    Kidney,
    Liver,
    Heart,
    Lung,
    Pancreas,
    Cornea,
}

impl OrganType {
    pub const ALL: [OrganType; 6] = [
        OrganType::Kidney,
        OrganType::Liver,
        OrganType::Heart,
        OrganType::Lung,
        OrganType::Pancreas,
        OrganType::Cornea,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrganType::Kidney => "kidney",
            OrganType::Liver => "liver",
            OrganType::Heart => "heart",
            OrganType::Lung => "lung",
            OrganType::Pancreas => "pancreas",
            OrganType::Cornea => "cornea",
        }
    }
}

impl fmt::Display for OrganType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrganType {
    type Err = UnrecognizedValue;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|organ| organ.label() == normalized)
            .ok_or_else(|| UnrecognizedValue(raw.to_string()))
    }
}

/// Raw text that did not parse into a known vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value '{0}'")]
pub struct UnrecognizedValue(pub String);

/// A caller-reported field: parsed when it names a known entry, otherwise kept verbatim so
/// the scoring rules can treat it as missing instead of rejecting the whole profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported<T> {
    Known(T),
    Unrecognized(String),
}

impl<T> Reported<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Reported::Known(value) => Some(value),
            Reported::Unrecognized(_) => None,
        }
    }
}

impl<T: FromStr> Reported<T> {
    pub fn parse(raw: &str) -> Self {
        match raw.parse() {
            Ok(value) => Reported::Known(value),
            Err(_) => Reported::Unrecognized(raw.trim().to_string()),
        }
    }
}

impl<T> From<T> for Reported<T> {
    fn from(value: T) -> Self {
        Reported::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Reported<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reported::Known(value) => value.fmt(f),
            Reported::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl<T: fmt::Display> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Reported<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Reported::parse(&raw))
    }
}

/// Organs offered by a donor, carried on the wire as a comma-joined list
/// (`"kidney,liver"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganList(Vec<Reported<OrganType>>);

impl OrganList {
    pub fn new(organs: impl IntoIterator<Item = OrganType>) -> Self {
        Self(organs.into_iter().map(Reported::Known).collect())
    }

    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(Reported::parse)
                .collect(),
        )
    }

    pub fn offers(&self, organ: OrganType) -> bool {
        self.0.iter().any(|entry| entry.known() == Some(&organ))
    }

    pub fn known(&self) -> impl Iterator<Item = OrganType> + '_ {
        self.0.iter().filter_map(|entry| entry.known().copied())
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().filter_map(|entry| match entry {
            Reported::Unrecognized(raw) => Some(raw.as_str()),
            Reported::Known(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OrganList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            entry.fmt(f)?;
        }
        Ok(())
    }
}

impl Serialize for OrganList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrganList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OrganList::parse(&raw))
    }
}

/// Donor attributes consumed by the compatibility engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    #[serde(default)]
    pub blood_type: Option<Reported<BloodType>>,
    #[serde(default)]
    pub age: Option<u32>,
    /// Comma-separated HLA antigens, e.g. `A*02:01,B*07:02`.
    #[serde(default, alias = "hla_type")]
    pub tissue_type: Option<String>,
    #[serde(default)]
    pub organ_type: OrganList,
    /// Clinical composite carried through for callers; not part of the score.
    #[serde(default)]
    pub health_score: Option<i32>,
}

impl DonorProfile {
    pub fn new(blood_type: BloodType, age: u32) -> Self {
        Self {
            blood_type: Some(Reported::Known(blood_type)),
            age: Some(age),
            ..Self::default()
        }
    }

    pub fn with_tissue_type(mut self, tissue_type: impl Into<String>) -> Self {
        self.tissue_type = Some(tissue_type.into());
        self
    }

    pub fn with_organs(mut self, organs: impl IntoIterator<Item = OrganType>) -> Self {
        self.organ_type = OrganList::new(organs);
        self
    }
}

/// Recipient attributes. Every field is optional; an empty profile means the caller is
/// searching without recipient constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipientProfile {
    #[serde(default)]
    pub blood_type: Option<Reported<BloodType>>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, alias = "hla_type")]
    pub tissue_type: Option<String>,
    #[serde(default)]
    pub organ_needed: Option<Reported<OrganType>>,
    /// Clinical urgency on a 0-100 scale, higher is more urgent.
    #[serde(default)]
    pub urgency_score: Option<f64>,
}

impl RecipientProfile {
    pub fn with_blood_type(mut self, blood_type: BloodType) -> Self {
        self.blood_type = Some(Reported::Known(blood_type));
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_tissue_type(mut self, tissue_type: impl Into<String>) -> Self {
        self.tissue_type = Some(tissue_type.into());
        self
    }

    pub fn with_urgency(mut self, urgency_score: f64) -> Self {
        self.urgency_score = Some(urgency_score);
        self
    }
}

/// Per-factor sub-scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityFactors {
    pub blood_type_match: f64,
    pub tissue_match: f64,
    pub age_compatibility: f64,
    /// Prioritisation nudge taken from the recipient, not a match-quality signal.
    pub urgency_factor: f64,
}

/// Qualitative band attached to every score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Excellent match - Highly recommended for transplant")]
    Excellent,
    #[serde(rename = "Good match - Recommended for transplant")]
    Good,
    #[serde(rename = "Moderate match - Consider with careful evaluation")]
    Moderate,
    #[serde(rename = "Fair match - Requires detailed medical assessment")]
    Fair,
    #[serde(rename = "Poor match - Not recommended without special circumstances")]
    Poor,
}

impl Recommendation {
    /// Bands use inclusive lower bounds: 85, 70, 55, 40.
    pub fn for_score(score: f64) -> Self {
        if score >= 85.0 {
            Recommendation::Excellent
        } else if score >= 70.0 {
            Recommendation::Good
        } else if score >= 55.0 {
            Recommendation::Moderate
        } else if score >= 40.0 {
            Recommendation::Fair
        } else {
            Recommendation::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::Excellent => "Excellent match - Highly recommended for transplant",
            Recommendation::Good => "Good match - Recommended for transplant",
            Recommendation::Moderate => "Moderate match - Consider with careful evaluation",
            Recommendation::Fair => "Fair match - Requires detailed medical assessment",
            Recommendation::Poor => "Poor match - Not recommended without special circumstances",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Engine output: weighted total, factor breakdown and recommendation band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: f64,
    pub factors: CompatibilityFactors,
    pub recommendation: Recommendation,
}
