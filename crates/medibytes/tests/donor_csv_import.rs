use std::sync::{Arc, Mutex};

use medibytes::matching::{BloodType, OrganType, Reported};
use medibytes::registry::{
    DonorCsvImporter, DonorId, DonorMatchingService, DonorRecord, DonorRepository,
    DonorSearchFilters, MatchRepository, MatchingConfig, OrganMatch, RegistryError,
    RepositoryError, ValidationError,
};

#[derive(Default)]
struct Donors(Mutex<Vec<DonorRecord>>);

impl DonorRepository for Donors {
    fn insert(&self, record: DonorRecord) -> Result<DonorRecord, RepositoryError> {
        self.0.lock().expect("donor mutex poisoned").push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DonorId) -> Result<Option<DonorRecord>, RepositoryError> {
        let guard = self.0.lock().expect("donor mutex poisoned");
        Ok(guard.iter().find(|record| &record.donor_id == id).cloned())
    }

    fn active_donors(&self, organ: OrganType) -> Result<Vec<DonorRecord>, RepositoryError> {
        let guard = self.0.lock().expect("donor mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.profile.organ_type.offers(organ))
            .cloned()
            .collect())
    }
}

struct NoMatches;

impl MatchRepository for NoMatches {
    fn insert(&self, _record: OrganMatch) -> Result<OrganMatch, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

#[test]
fn imported_rows_register_and_invalid_rows_are_reported() {
    let csv = "donor_id,blood_type,age,organ_type,tissue_type,clearance_cid\n\
D-1,O-,33,\"kidney,lung\",A*02:01,bafy-1\n\
D-2,B+,81,kidney,,bafy-2\n\
D-3,A+,47,lung,B*07:02,\n\
D-4,A\u{2212},52,lung,,bafy-4\n";

    let registrations = DonorCsvImporter::from_reader(csv.as_bytes()).expect("import succeeds");
    assert_eq!(registrations.len(), 4);
    assert_eq!(
        registrations[3].blood_type,
        Reported::Known(BloodType::ANegative),
        "unicode minus is accepted"
    );

    let service = DonorMatchingService::new(
        Arc::new(Donors::default()),
        Arc::new(NoMatches),
        MatchingConfig::default(),
    );
    let outcomes: Vec<Result<_, RegistryError>> = registrations
        .into_iter()
        .map(|registration| service.register(registration))
        .collect();

    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1],
        Err(RegistryError::Validation(ValidationError::AgeOutOfRange(81)))
    ));
    assert!(matches!(
        outcomes[2],
        Err(RegistryError::Validation(ValidationError::MissingClearance))
    ));
    assert!(outcomes[3].is_ok());

    let lung_donors = service
        .search(&DonorSearchFilters::for_organ(OrganType::Lung))
        .expect("search succeeds");
    let ids: Vec<&str> = lung_donors
        .iter()
        .map(|hit| hit.donor.donor_id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["D-1", "D-4"]);
}
