//! stacklens - technology mention detection and stack analysis
//!
//! This library finds mentions of known technologies (languages, frameworks,
//! databases, tools) in free-form text, scores each match and reports how
//! complete the described stack is.
//!
//! # Core Concepts
//!
//! - **Registry**: canonical technology records plus the spelling variations
//!   that resolve to them
//! - **Matching**: whole-word, longest-first scan of normalized text against
//!   registry names
//! - **Scoring**: a confidence in `[0, 1]` from match form, frequency and
//!   registry membership
//! - **Stack analysis**: core category completeness and suggestions
//!
//! # Example Usage
//!
//! ```
//! use stacklens::{AnalysisRequest, StacklensConfig, TechAnalyzer};
//!
//! let analyzer = TechAnalyzer::new(StacklensConfig::builtin());
//! let result = analyzer.analyze(&AnalysisRequest::new("A React app with a Django API"));
//!
//! assert!(result.success);
//! let analysis = result.data.unwrap();
//! assert_eq!(analysis.names(), vec!["react", "django"]);
//! ```
//!
//! # Project Structure
//!
//! - [`stack`]: technology records, kinds and the registry
//! - [`text`]: normalization and matching
//! - [`scoring`]: confidence scoring
//! - [`analysis`]: the [`TechAnalyzer`] service, result cache and stack analysis
//! - [`state`]: registry persistence
//! - [`enrichment`]: registry refresh from remote lists

pub mod analysis;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod result;
pub mod scoring;
pub mod stack;
pub mod state;
pub mod text;
pub mod util;

pub use analysis::{
    AnalysisRequest, AnalysisResult, IdentifiedTechnology, Scale, StackAnalysis,
    StackRequirements, StackSuggestion, TechAnalyzer, TechnologyFilter,
};
pub use config::{ConfigError, StacklensConfig};
pub use enrichment::{AwesomeListEnricher, Enricher, EnrichmentError, RefreshSummary};
pub use error::{AnalyzerError, ErrorType};
pub use result::{ErrorInfo, OperationResult, ResultMetadata};
pub use stack::{Category, RegistryError, TechType, TechnologyRecord, TechnologyRegistry};
pub use state::{JsonFileStore, MemoryStore, StateError, StateSnapshot, StateStore};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_stacklens() {
        assert_eq!(NAME, "stacklens");
    }
}
