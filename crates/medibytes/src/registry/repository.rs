use super::domain::{DonorId, DonorRecord, OrganMatch};
use crate::matching::OrganType;

/// Donor storage, kept behind a trait so the service can run against memory or a chain
/// adapter alike.
pub trait DonorRepository: Send + Sync {
    fn insert(&self, record: DonorRecord) -> Result<DonorRecord, RepositoryError>;
    fn fetch(&self, id: &DonorId) -> Result<Option<DonorRecord>, RepositoryError>;
    /// Active donors offering `organ`, in registration order.
    fn active_donors(&self, organ: OrganType) -> Result<Vec<DonorRecord>, RepositoryError>;
}

/// Persistence for created matches.
pub trait MatchRepository: Send + Sync {
    fn insert(&self, record: OrganMatch) -> Result<OrganMatch, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
