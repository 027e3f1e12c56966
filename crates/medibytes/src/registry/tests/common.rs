use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::matching::{BloodType, OrganList, OrganType, RecipientProfile, Reported};
use crate::registry::domain::{
    DonorId, DonorRecord, DonorRegistration, OrganMatch, OrganMatchRequest, RecipientId,
};
use crate::registry::repository::{DonorRepository, MatchRepository, RepositoryError};
use crate::registry::{registry_router, DonorMatchingService, MatchingConfig};

pub(super) fn registration(donor_id: &str, blood_type: BloodType, age: u32) -> DonorRegistration {
    DonorRegistration {
        donor_id: DonorId(donor_id.to_string()),
        blood_type: Reported::Known(blood_type),
        organ_type: OrganList::new([OrganType::Kidney]),
        age,
        tissue_type: Some("A*02:01".to_string()),
        health_score: Some(82),
        clearance_cid: format!("bafy-{donor_id}"),
    }
}

/// Recipient from the reference scenario: O+, 42, A*02:01, urgency 70.
pub(super) fn reference_recipient() -> RecipientProfile {
    RecipientProfile::default()
        .with_blood_type(BloodType::OPositive)
        .with_age(42)
        .with_tissue_type("A*02:01")
        .with_urgency(70.0)
}

pub(super) fn match_request(donor_id: &str, organ: OrganType) -> OrganMatchRequest {
    OrganMatchRequest {
        donor_id: DonorId(donor_id.to_string()),
        recipient_id: RecipientId("R-900".to_string()),
        organ_type: Reported::Known(organ),
        recipient: reference_recipient(),
        matched_by: Some("dr-okafor".to_string()),
    }
}

pub(super) fn build_service() -> (
    DonorMatchingService<MemoryDonors, MemoryMatches>,
    Arc<MemoryDonors>,
    Arc<MemoryMatches>,
) {
    let donors = Arc::new(MemoryDonors::default());
    let matches = Arc::new(MemoryMatches::default());
    let service =
        DonorMatchingService::new(donors.clone(), matches.clone(), MatchingConfig::default());
    (service, donors, matches)
}

#[derive(Default, Clone)]
pub(super) struct MemoryDonors {
    records: Arc<Mutex<Vec<DonorRecord>>>,
}

impl MemoryDonors {
    pub(super) fn deactivate(&self, id: &DonorId) {
        let mut guard = self.records.lock().expect("donor mutex poisoned");
        for record in guard.iter_mut().filter(|record| &record.donor_id == id) {
            record.is_active = false;
        }
    }
}

impl DonorRepository for MemoryDonors {
    fn insert(&self, record: DonorRecord) -> Result<DonorRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("donor mutex poisoned");
        if guard.iter().any(|stored| stored.donor_id == record.donor_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DonorId) -> Result<Option<DonorRecord>, RepositoryError> {
        let guard = self.records.lock().expect("donor mutex poisoned");
        Ok(guard.iter().find(|record| &record.donor_id == id).cloned())
    }

    fn active_donors(&self, organ: OrganType) -> Result<Vec<DonorRecord>, RepositoryError> {
        let guard = self.records.lock().expect("donor mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.is_active && record.profile.organ_type.offers(organ))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMatches {
    records: Arc<Mutex<Vec<OrganMatch>>>,
}

impl MemoryMatches {
    pub(super) fn stored(&self) -> Vec<OrganMatch> {
        self.records.lock().expect("match mutex poisoned").clone()
    }
}

impl MatchRepository for MemoryMatches {
    fn insert(&self, record: OrganMatch) -> Result<OrganMatch, RepositoryError> {
        self.records
            .lock()
            .expect("match mutex poisoned")
            .push(record.clone());
        Ok(record)
    }
}

pub(super) struct UnavailableDonors;

impl DonorRepository for UnavailableDonors {
    fn insert(&self, _record: DonorRecord) -> Result<DonorRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn fetch(&self, _id: &DonorId) -> Result<Option<DonorRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn active_donors(&self, _organ: OrganType) -> Result<Vec<DonorRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn registry_router_with_service(
    service: DonorMatchingService<MemoryDonors, MemoryMatches>,
) -> axum::Router {
    registry_router(Arc::new(service))
}
