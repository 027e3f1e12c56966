use std::str::FromStr;

use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Policy weights applied to the four compatibility factors. Construction validates that
/// every weight is non-negative and that they sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct CompatibilityWeights {
    blood_type: f64,
    tissue_match: f64,
    age_compatibility: f64,
    urgency: f64,
}

impl CompatibilityWeights {
    pub const STANDARD: CompatibilityWeights = CompatibilityWeights {
        blood_type: 0.40,
        tissue_match: 0.30,
        age_compatibility: 0.20,
        urgency: 0.10,
    };

    pub fn new(
        blood_type: f64,
        tissue_match: f64,
        age_compatibility: f64,
        urgency: f64,
    ) -> Result<Self, WeightsError> {
        let weights = Self {
            blood_type,
            tissue_match,
            age_compatibility,
            urgency,
        };

        for (factor, value) in [
            ("blood_type", blood_type),
            ("tissue_match", tissue_match),
            ("age_compatibility", age_compatibility),
            ("urgency", urgency),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Negative { factor, value });
            }
        }

        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(WeightsError::NotNormalized { sum });
        }

        Ok(weights)
    }

    pub fn blood_type(&self) -> f64 {
        self.blood_type
    }

    pub fn tissue_match(&self) -> f64 {
        self.tissue_match
    }

    pub fn age_compatibility(&self) -> f64 {
        self.age_compatibility
    }

    pub fn urgency(&self) -> f64 {
        self.urgency
    }

    pub fn sum(&self) -> f64 {
        self.blood_type + self.tissue_match + self.age_compatibility + self.urgency
    }
}

#[derive(Deserialize)]
struct RawWeights {
    blood_type: f64,
    tissue_match: f64,
    age_compatibility: f64,
    urgency: f64,
}

impl TryFrom<RawWeights> for CompatibilityWeights {
    type Error = WeightsError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        Self::new(
            raw.blood_type,
            raw.tissue_match,
            raw.age_compatibility,
            raw.urgency,
        )
    }
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Parses `blood,tissue,age,urgency`, e.g. `0.4,0.3,0.2,0.1`.
impl FromStr for CompatibilityWeights {
    type Err = WeightsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let values = raw
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| WeightsError::Malformed(raw.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [blood, tissue, age, urgency] => Self::new(*blood, *tissue, *age, *urgency),
            _ => Err(WeightsError::Malformed(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("weight for {factor} must be a non-negative number (got {value})")]
    Negative { factor: &'static str, value: f64 },
    #[error("compatibility weights must sum to 1.0 (got {sum:.4})")]
    NotNormalized { sum: f64 },
    #[error("expected four comma-separated weights (blood,tissue,age,urgency), got '{0}'")]
    Malformed(String),
}
