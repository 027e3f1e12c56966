//! Organ donor registry: registration, filtered search ranked by compatibility, and
//! match creation on top of pluggable storage collaborators.

mod config;
pub mod domain;
mod import;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use config::{MatchingConfig, MatchingConfigError};
pub use domain::{
    DonorId, DonorRecord, DonorRegistration, DonorSearchFilters, DonorView, MatchId,
    MatchStatus, OrganMatch, OrganMatchRequest, RecipientId, ScoredDonor,
};
pub use import::{DonorCsvImporter, DonorImportError};
pub use repository::{DonorRepository, MatchRepository, RepositoryError};
pub use router::registry_router;
pub use service::{DonorMatchingService, RegistryError};
pub use validation::ValidationError;
