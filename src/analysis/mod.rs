//! Technology identification pipeline.
//!
//! [`TechAnalyzer`] owns the registry and result cache and runs each
//! request through validation, normalization, matching, scoring and stack
//! analysis.

pub mod cache;
pub mod orchestrator;
pub mod stack;
pub mod suggest;
pub mod types;

pub use cache::{CacheKey, ResultCache};
pub use orchestrator::TechAnalyzer;
pub use stack::StackAnalyzer;
pub use suggest::{
    suggest_stack, LearningResource, LearningStep, Scale, StackRequirements, StackSuggestion,
    SuggestedTechnology,
};
pub use types::{
    AnalysisRequest, AnalysisResult, Compatibility, IdentifiedTechnology, StackAnalysis,
    TechnologyFilter,
};
