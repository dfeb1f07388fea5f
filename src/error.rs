//! Error taxonomy shared by every public operation.
//!
//! Each module owns a `thiserror` enum. [`AnalyzerError`] gathers them at the
//! service boundary, where every variant maps to a stable [`ErrorType`] tag
//! and a recovery hint for the result envelope.

use crate::config::ConfigError;
use crate::enrichment::EnrichmentError;
use crate::stack::RegistryError;
use crate::state::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error tag carried in [`crate::result::ErrorInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    ValidationError,
    ProcessingError,
    DuplicateTechnologyError,
    TechnologyNotFoundError,
    StateLoadError,
    StateSaveError,
    EnrichmentError,
    ConfigError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::ValidationError => "ValidationError",
            ErrorType::ProcessingError => "ProcessingError",
            ErrorType::DuplicateTechnologyError => "DuplicateTechnologyError",
            ErrorType::TechnologyNotFoundError => "TechnologyNotFoundError",
            ErrorType::StateLoadError => "StateLoadError",
            ErrorType::StateSaveError => "StateSaveError",
            ErrorType::EnrichmentError => "EnrichmentError",
            ErrorType::ConfigError => "ConfigError",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Analysis failed: {0}")]
    Processing(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnalyzerError {
    pub fn error_type(&self) -> ErrorType {
        match self {
            AnalyzerError::Validation(_) => ErrorType::ValidationError,
            AnalyzerError::Processing(_) => ErrorType::ProcessingError,
            AnalyzerError::Registry(RegistryError::Duplicate(_)) => {
                ErrorType::DuplicateTechnologyError
            }
            AnalyzerError::Registry(RegistryError::NotFound(_)) => {
                ErrorType::TechnologyNotFoundError
            }
            AnalyzerError::Registry(RegistryError::InvalidRecord(_)) => ErrorType::ValidationError,
            AnalyzerError::State(StateError::Save { .. }) => ErrorType::StateSaveError,
            AnalyzerError::State(_) => ErrorType::StateLoadError,
            AnalyzerError::Enrichment(_) => ErrorType::EnrichmentError,
            AnalyzerError::Config(_) => ErrorType::ConfigError,
        }
    }

    /// Short advice on how the caller can recover.
    pub fn recovery_hint(&self) -> String {
        match self {
            AnalyzerError::Validation(_) => {
                "Check the input text size and that filter values are known types and categories"
                    .to_string()
            }
            AnalyzerError::Processing(_) => {
                "Retry the request; run with --log-level debug to see which stage failed"
                    .to_string()
            }
            AnalyzerError::Registry(RegistryError::Duplicate(name)) => format!(
                "'{}' is already registered; use a different name or remove the existing entry first",
                name
            ),
            AnalyzerError::Registry(RegistryError::NotFound(name)) => format!(
                "'{}' is not registered; run `stacklens list` to see known technologies",
                name
            ),
            AnalyzerError::Registry(RegistryError::InvalidRecord(_)) => {
                "Technology names need at least one letter or digit".to_string()
            }
            AnalyzerError::State(_) => {
                "Check that the state file is readable JSON and its directory is writable (STACKLENS_STATE_PATH)"
                    .to_string()
            }
            AnalyzerError::Enrichment(EnrichmentError::Timeout(_)) => {
                "The enrichment source did not answer in time; raise STACKLENS_ENRICHMENT_TIMEOUT or retry later"
                    .to_string()
            }
            AnalyzerError::Enrichment(_) => {
                "Check STACKLENS_ENRICHMENT_URL and network access; the registry was left unchanged"
                    .to_string()
            }
            AnalyzerError::Config(_) => {
                "Review STACKLENS_* environment variables".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
