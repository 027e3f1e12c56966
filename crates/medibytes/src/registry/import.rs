use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use super::domain::{DonorId, DonorRegistration};
use crate::matching::{BloodType, OrganList, Reported};

#[derive(Debug, thiserror::Error)]
pub enum DonorImportError {
    #[error("failed to read donor export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid donor CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads donor registrations from a CSV export with the columns
/// `donor_id,blood_type,age,organ_type,tissue_type,clearance_cid` and an optional
/// `health_score`. Rows whose cells cannot be read (a non-numeric age, say) are logged and
/// skipped; everything else is left for registration to validate.
pub struct DonorCsvImporter;

impl DonorCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<DonorRegistration>, DonorImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<DonorRegistration>, DonorImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut registrations = Vec::new();

        for record in csv_reader.deserialize::<DonorRow>() {
            match record {
                Ok(row) => registrations.push(row.into_registration()),
                Err(err) if matches!(err.kind(), csv::ErrorKind::Deserialize { .. }) => {
                    warn!(
                        line = err.position().map(|position| position.line()),
                        error = %err,
                        "skipping unreadable donor row"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(registrations)
    }
}

#[derive(Debug, Deserialize)]
struct DonorRow {
    donor_id: String,
    blood_type: String,
    age: u32,
    organ_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    tissue_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    clearance_cid: Option<String>,
    #[serde(default)]
    health_score: Option<i32>,
}

impl DonorRow {
    fn into_registration(self) -> DonorRegistration {
        DonorRegistration {
            donor_id: DonorId(self.donor_id),
            blood_type: Reported::<BloodType>::parse(&self.blood_type),
            organ_type: OrganList::parse(&self.organ_type),
            age: self.age,
            tissue_type: self.tissue_type,
            health_score: self.health_score,
            clearance_cid: self.clearance_cid.unwrap_or_default(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
