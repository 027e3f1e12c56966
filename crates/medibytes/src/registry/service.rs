use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use super::config::MatchingConfig;
use super::domain::{
    DonorId, DonorRecord, DonorRegistration, DonorSearchFilters, DonorView, MatchId,
    MatchStatus, OrganMatch, OrganMatchRequest, ScoredDonor,
};
use super::repository::{DonorRepository, MatchRepository, RepositoryError};
use super::validation::{self, ValidationError};
use crate::matching::{
    CompatibilityEngine, CompatibilityResult, DonorProfile, OrganType, RecipientProfile,
};

/// Service composing donor storage, match storage and the compatibility engine.
pub struct DonorMatchingService<R, M> {
    engine: Arc<CompatibilityEngine>,
    donors: Arc<R>,
    matches: Arc<M>,
    config: MatchingConfig,
}

static MATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_match_id() -> MatchId {
    let id = MATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MatchId(format!("match-{id:06}"))
}

impl<R, M> DonorMatchingService<R, M>
where
    R: DonorRepository + 'static,
    M: MatchRepository + 'static,
{
    pub fn new(donors: Arc<R>, matches: Arc<M>, config: MatchingConfig) -> Self {
        let engine = Arc::new(CompatibilityEngine::new(config.weights));
        Self {
            engine,
            donors,
            matches,
            config,
        }
    }

    pub fn engine(&self) -> &CompatibilityEngine {
        &self.engine
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn view(&self, record: &DonorRecord) -> DonorView {
        record.view(&self.config)
    }

    /// Validate and store a new donor.
    pub fn register(&self, registration: DonorRegistration) -> Result<DonorRecord, RegistryError> {
        let registered_on = Local::now().date_naive();
        let record = validation::record_from_registration(registration, registered_on)?;
        let stored = self.donors.insert(record)?;

        info!(
            donor_id = %stored.donor_id,
            organs = %stored.profile.organ_type,
            "registered organ donor"
        );
        Ok(stored)
    }

    /// Eligible donors for the searched organ, best compatibility first.
    pub fn search(&self, filters: &DonorSearchFilters) -> Result<Vec<ScoredDonor>, RegistryError> {
        let plan = validation::search_plan(filters, &self.config)?;

        let eligible: Vec<DonorRecord> = self
            .donors
            .active_donors(plan.organ)?
            .into_iter()
            .filter(|record| plan.admits(record))
            .collect();

        let ranked = self.engine.rank_donors(
            Some(&plan.recipient),
            eligible.iter().map(|record| (record, &record.profile)),
        );

        let results: Vec<ScoredDonor> = ranked
            .into_iter()
            .take(plan.limit)
            .map(|ranked| ScoredDonor {
                donor: ranked.candidate.view(&self.config),
                compatibility: ranked.compatibility,
            })
            .collect();

        info!(
            organ = %plan.organ,
            eligible = eligible.len(),
            returned = results.len(),
            "searched organ donors"
        );
        Ok(results)
    }

    pub fn get(&self, donor_id: &DonorId) -> Result<DonorRecord, RegistryError> {
        let record = self
            .donors
            .fetch(donor_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Pair a registered donor with a recipient, scoring the pair from stored data.
    pub fn create_match(&self, request: OrganMatchRequest) -> Result<OrganMatch, RegistryError> {
        let organ = validation::known_organ(&request.organ_type)?;
        let donor = self.get(&request.donor_id)?;

        if !donor.is_active {
            return Err(RegistryError::DonorInactive(donor.donor_id));
        }
        if !donor.profile.organ_type.offers(organ) {
            warn!(donor_id = %donor.donor_id, organ = %organ, "donor does not offer organ");
            return Err(RegistryError::OrganNotOffered {
                donor_id: donor.donor_id,
                organ,
            });
        }

        let compatibility = self.engine.score(&donor.profile, Some(&request.recipient));
        let record = OrganMatch {
            match_id: next_match_id(),
            donor_id: donor.donor_id,
            recipient_id: request.recipient_id,
            organ_type: organ,
            compatibility,
            status: MatchStatus::Pending,
            matched_by: request.matched_by,
            created_on: Local::now().date_naive(),
        };

        let stored = self.matches.insert(record)?;
        info!(
            match_id = %stored.match_id.0,
            donor_id = %stored.donor_id,
            score = stored.compatibility.score,
            status = stored.status.label(),
            "created organ match"
        );
        Ok(stored)
    }

    pub fn score(
        &self,
        donor: &DonorProfile,
        recipient: Option<&RecipientProfile>,
    ) -> CompatibilityResult {
        self.engine.score(donor, recipient)
    }

    pub fn score_batch<'a, I>(&self, pairs: I) -> Vec<CompatibilityResult>
    where
        I: IntoIterator<Item = (&'a DonorProfile, Option<&'a RecipientProfile>)>,
    {
        self.engine.score_batch(pairs)
    }
}

/// Error raised by the donor matching service.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("donor {donor_id} does not offer {organ}")]
    OrganNotOffered { donor_id: DonorId, organ: OrganType },
    #[error("donor {0} is no longer active")]
    DonorInactive(DonorId),
}
