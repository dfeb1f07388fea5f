use super::types::{Compatibility, IdentifiedTechnology, StackAnalysis};
use crate::stack::Category;
use std::collections::BTreeMap;

/// Missing-category checks, in the order their suggestions are emitted.
const SUGGESTIONS: &[(Category, &str)] = &[
    (
        Category::Frontend,
        "Consider adding a frontend framework (e.g., React, Vue)",
    ),
    (
        Category::Backend,
        "Consider adding a backend framework (e.g., Django, Express)",
    ),
    (
        Category::Database,
        "Consider adding a database (e.g., PostgreSQL, MongoDB)",
    ),
    (
        Category::Testing,
        "Consider adding testing frameworks to your stack",
    ),
    (
        Category::Devops,
        "Consider adding DevOps tools for better deployment workflow",
    ),
];

/// Category coverage, compatibility and advice for a set of identified technologies.
pub struct StackAnalyzer;

impl StackAnalyzer {
    pub fn analyze(identified: &[IdentifiedTechnology]) -> StackAnalysis {
        let mut completeness = BTreeMap::new();
        let mut coverage = BTreeMap::new();

        for category in Category::CORE {
            let best = identified
                .iter()
                .enumerate()
                .filter(|(_, t)| t.technology.category == category)
                .min_by_key(|(pos, t)| (t.technology.tech_type.coverage_rank(), *pos))
                .map(|(_, t)| t.technology.name.clone());

            completeness.insert(category, best.is_some());
            if let Some(name) = best {
                coverage.insert(category, name);
            }
        }

        let present = |category: Category| {
            identified
                .iter()
                .any(|t| t.technology.category == category)
        };

        let suggestions = SUGGESTIONS
            .iter()
            .filter(|(category, _)| !present(*category))
            .map(|(_, text)| text.to_string())
            .collect();

        StackAnalysis {
            completeness,
            coverage,
            compatibility: Self::check_compatibility(identified),
            suggestions,
        }
    }

    /// No contradiction rules exist; every stack is reported compatible.
    fn check_compatibility(_identified: &[IdentifiedTechnology]) -> Compatibility {
        Compatibility::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{TechType, TechnologyRecord};

    fn identified(name: &str, tech_type: TechType, category: Category) -> IdentifiedTechnology {
        IdentifiedTechnology {
            technology: TechnologyRecord::new(name, tech_type, category, ""),
            matched_text: name.to_string(),
            confidence_score: 1.0,
            occurrences: 1,
        }
    }

    #[test]
    fn test_empty_stack() {
        let analysis = StackAnalyzer::analyze(&[]);

        assert_eq!(analysis.completeness.len(), 3);
        assert!(analysis.completeness.values().all(|v| !v));
        assert!(analysis.coverage.is_empty());
        assert!(analysis.compatibility.compatible);
        assert_eq!(analysis.suggestions.len(), 5);
        assert!(analysis.suggestions[0].contains("frontend"));
        assert!(analysis.suggestions[4].contains("DevOps"));
    }

    #[test]
    fn test_full_core_stack() {
        let stack = vec![
            identified("react", TechType::Framework, Category::Frontend),
            identified("node.js", TechType::Platform, Category::Backend),
            identified("mongodb", TechType::Database, Category::Database),
        ];
        let analysis = StackAnalyzer::analyze(&stack);

        assert!(analysis.is_complete());
        assert_eq!(
            analysis.suggestions,
            vec![
                "Consider adding testing frameworks to your stack",
                "Consider adding DevOps tools for better deployment workflow",
            ]
        );
    }

    #[test]
    fn test_language_only_covers_category() {
        let analysis =
            StackAnalyzer::analyze(&[identified("python", TechType::Language, Category::Backend)]);

        assert!(analysis.completeness[&Category::Backend]);
        assert_eq!(analysis.coverage[&Category::Backend], "python");
    }

    #[test]
    fn test_framework_preferred_over_language_for_coverage() {
        let stack = vec![
            identified("python", TechType::Language, Category::Backend),
            identified("node.js", TechType::Platform, Category::Backend),
            identified("django", TechType::Framework, Category::Backend),
        ];
        let analysis = StackAnalyzer::analyze(&stack);

        assert_eq!(analysis.coverage[&Category::Backend], "django");
    }

    #[test]
    fn test_informational_categories_not_in_completeness() {
        let analysis =
            StackAnalyzer::analyze(&[identified("jest", TechType::Tool, Category::Testing)]);

        assert!(!analysis.completeness.contains_key(&Category::Testing));
        assert!(!analysis
            .suggestions
            .iter()
            .any(|s| s.contains("testing frameworks")));
    }
}
