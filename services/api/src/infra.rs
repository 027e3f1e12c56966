use medibytes::matching::OrganType;
use medibytes::registry::{
    DonorId, DonorMatchingService, DonorRecord, DonorRegistration, DonorRepository,
    MatchRepository, OrganMatch, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type RegistryService =
    DonorMatchingService<InMemoryDonorRepository, InMemoryMatchRepository>;

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} lock poisoned")))
}

/// Donor store kept in registration order so ranking ties stay stable.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDonorRepository {
    records: Arc<Mutex<Vec<DonorRecord>>>,
}

impl DonorRepository for InMemoryDonorRepository {
    fn insert(&self, record: DonorRecord) -> Result<DonorRecord, RepositoryError> {
        let mut guard = lock(&self.records, "donor store")?;
        if guard.iter().any(|stored| stored.donor_id == record.donor_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DonorId) -> Result<Option<DonorRecord>, RepositoryError> {
        let guard = lock(&self.records, "donor store")?;
        Ok(guard.iter().find(|record| &record.donor_id == id).cloned())
    }

    fn active_donors(&self, organ: OrganType) -> Result<Vec<DonorRecord>, RepositoryError> {
        let guard = lock(&self.records, "donor store")?;
        Ok(guard
            .iter()
            .filter(|record| record.is_active && record.profile.organ_type.offers(organ))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchRepository {
    records: Arc<Mutex<Vec<OrganMatch>>>,
}

impl MatchRepository for InMemoryMatchRepository {
    fn insert(&self, record: OrganMatch) -> Result<OrganMatch, RepositoryError> {
        lock(&self.records, "match store")?.push(record.clone());
        Ok(record)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeedSummary {
    pub(crate) registered: usize,
    pub(crate) skipped: usize,
}

/// Register imported donors, skipping rows the registry rejects.
pub(crate) fn seed_registry(
    service: &RegistryService,
    registrations: Vec<DonorRegistration>,
) -> SeedSummary {
    let mut summary = SeedSummary::default();
    for registration in registrations {
        let donor_id = registration.donor_id.clone();
        match service.register(registration) {
            Ok(_) => summary.registered += 1,
            Err(err) => {
                warn!(%donor_id, error = %err, "skipping donor row");
                summary.skipped += 1;
            }
        }
    }
    summary
}
