use crate::config::ConfigError;
use crate::registry::{DonorImportError, RegistryError};
use crate::telemetry::TelemetryError;

/// Failures that stop the `serve` or `match` commands. HTTP handlers answer with
/// [`RegistryError::status_code`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("donor import error: {0}")]
    Import(#[from] DonorImportError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ValidationError;
    use std::error::Error;

    #[test]
    fn wraps_sources_with_context() {
        let error = AppError::from(RegistryError::from(ValidationError::InvalidLimit(0)));

        assert!(matches!(error, AppError::Registry(_)));
        assert!(error.to_string().starts_with("registry error: "));
        assert!(error.source().is_some());
    }

    #[test]
    fn missing_export_surfaces_as_import_error() {
        let error: AppError = DonorImportError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "donors.csv",
        ))
        .into();

        assert!(error.to_string().contains("failed to read donor export"));
    }
}
