use crate::stack::{Category, TechType, TechnologyRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A technology found in the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedTechnology {
    pub technology: TechnologyRecord,
    pub matched_text: String,
    pub confidence_score: f64,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub compatible: bool,
    pub issues: Vec<String>,
}

impl Default for Compatibility {
    fn default() -> Self {
        Self {
            compatible: true,
            issues: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackAnalysis {
    /// Core category -> whether any identified technology covers it.
    pub completeness: BTreeMap<Category, bool>,
    /// Core category -> canonical name of the technology covering it.
    #[serde(default)]
    pub coverage: BTreeMap<Category, String>,
    pub compatibility: Compatibility,
    pub suggestions: Vec<String>,
}

impl StackAnalysis {
    pub fn is_complete(&self) -> bool {
        self.completeness.values().all(|covered| *covered)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub identified_technologies: Vec<IdentifiedTechnology>,
    pub tech_types: Vec<TechType>,
    pub categories: Vec<Category>,
    pub timestamp: DateTime<Utc>,
    pub context: String,
    pub stack_analysis: StackAnalysis,
}

impl AnalysisResult {
    pub fn names(&self) -> Vec<&str> {
        self.identified_technologies
            .iter()
            .map(|t| t.technology.name.as_str())
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&IdentifiedTechnology> {
        self.identified_technologies
            .iter()
            .find(|t| t.technology.name.eq_ignore_ascii_case(name))
    }
}

/// Input to [`crate::TechAnalyzer::analyze`].
///
/// Filters are kept as raw strings and parsed during validation so unknown
/// values are reported as a validation failure rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub context: String,
    pub tech_types: Vec<String>,
    pub categories: Vec<String>,
    pub use_cache: bool,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: String::new(),
            tech_types: Vec::new(),
            categories: Vec::new(),
            use_cache: true,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_tech_types<S: AsRef<str>>(mut self, tech_types: &[S]) -> Self {
        self.tech_types = tech_types.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn with_categories<S: AsRef<str>>(mut self, categories: &[S]) -> Self {
        self.categories = categories.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

/// Filter for [`crate::TechAnalyzer::list_technologies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyFilter {
    pub tech_type: Option<TechType>,
    pub category: Option<Category>,
    pub min_stars: Option<u64>,
}

impl TechnologyFilter {
    pub fn matches(&self, record: &TechnologyRecord) -> bool {
        self.tech_type.map_or(true, |t| record.tech_type == t)
            && self.category.map_or(true, |c| record.category == c)
            && self
                .min_stars
                .map_or(true, |min| record.stars().map_or(false, |s| s >= min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = AnalysisRequest::new("react")
            .with_context("frontend rewrite")
            .with_tech_types(&["framework"])
            .with_categories(&["frontend", "backend"])
            .without_cache();

        assert_eq!(request.context, "frontend rewrite");
        assert_eq!(request.tech_types, vec!["framework"]);
        assert_eq!(request.categories.len(), 2);
        assert!(!request.use_cache);
    }

    #[test]
    fn test_filter_matches() {
        let record = TechnologyRecord::new("redis", TechType::Database, Category::Database, "kv")
            .with_stars(60_000);

        assert!(TechnologyFilter::default().matches(&record));
        assert!(TechnologyFilter {
            tech_type: Some(TechType::Database),
            min_stars: Some(50_000),
            ..Default::default()
        }
        .matches(&record));
        assert!(!TechnologyFilter {
            category: Some(Category::Frontend),
            ..Default::default()
        }
        .matches(&record));
        assert!(!TechnologyFilter {
            min_stars: Some(1),
            ..Default::default()
        }
        .matches(&TechnologyRecord::new("x", TechType::Tool, Category::Devops, "")));
    }

    #[test]
    fn test_completeness_map_serializes_with_string_keys() {
        let mut completeness = BTreeMap::new();
        completeness.insert(Category::Frontend, true);
        let analysis = StackAnalysis {
            completeness,
            coverage: BTreeMap::new(),
            compatibility: Compatibility::default(),
            suggestions: vec![],
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["completeness"]["frontend"], true);
        assert_eq!(json["compatibility"]["compatible"], true);
    }
}
