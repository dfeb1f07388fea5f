use crate::stack::{normalize_name, Category, TechnologyRecord, TechnologyRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

const BASE_SCORE: f64 = 1.0;
const EXPERTISE_MULTIPLIER: f64 = 1.2;
const SCALABLE_TAG: &str = "scalable";
const ESTIMATED_LEARNING_TIME: &str = "2-4 weeks";
const MAX_RESOURCES: usize = 3;

/// Categories a suggested stack is assembled from, in output order.
pub const SUGGESTION_CATEGORIES: [Category; 5] = [
    Category::Frontend,
    Category::Backend,
    Category::Database,
    Category::Testing,
    Category::Devops,
];

/// Expected size of the project. `Large` keeps only technologies tagged
/// `scalable`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Small,
    Medium,
    Large,
}

impl Scale {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "small" => Some(Scale::Small),
            "medium" => Some(Scale::Medium),
            "large" => Some(Scale::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Small => "small",
            Scale::Medium => "medium",
            Scale::Large => "large",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRequirements {
    /// Use case to build for, e.g. `web`, `api` or `mobile`.
    pub project_type: String,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub team_expertise: Vec<String>,
    /// Technologies carrying any of these tags are left out.
    #[serde(default)]
    pub exclude_tags: Vec<String>,
}

impl StackRequirements {
    pub fn new(project_type: impl Into<String>) -> Self {
        Self {
            project_type: project_type.into(),
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_expertise<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.team_expertise = names.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn excluding<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.exclude_tags = tags.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTechnology {
    pub name: String,
    pub description: String,
    pub score: f64,
    pub rationale: Vec<String>,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    /// `documentation` or `repository`.
    pub kind: String,
    pub title: String,
    pub url: String,
}

/// One technology the team has yet to learn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningStep {
    pub technology: String,
    pub estimated_time: String,
    pub prerequisites: Vec<String>,
    pub resources: Vec<LearningResource>,
}

impl LearningStep {
    fn for_record(record: &TechnologyRecord) -> Self {
        let mut resources = Vec::new();
        if let Some(url) = &record.ecosystem.documentation_url {
            resources.push(LearningResource {
                kind: "documentation".to_string(),
                title: format!("Official {} Documentation", record.name),
                url: url.clone(),
            });
        }
        if let Some(url) = &record.ecosystem.github_url {
            resources.push(LearningResource {
                kind: "repository".to_string(),
                title: format!("{} GitHub Repository", record.name),
                url: url.clone(),
            });
        }
        resources.truncate(MAX_RESOURCES);

        Self {
            technology: record.name.clone(),
            estimated_time: ESTIMATED_LEARNING_TIME.to_string(),
            prerequisites: record.ecosystem.requires.clone(),
            resources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSuggestion {
    pub project_type: String,
    pub scale: Scale,
    pub groups: BTreeMap<Category, Vec<SuggestedTechnology>>,
    /// Suggested technologies the team does not know yet, in group order.
    pub learning_path: Vec<LearningStep>,
}

impl StackSuggestion {
    pub fn top_pick(&self, category: Category) -> Option<&SuggestedTechnology> {
        self.groups.get(&category).and_then(|group| group.first())
    }

    pub fn learning_names(&self) -> Vec<&str> {
        self.learning_path
            .iter()
            .map(|step| step.technology.as_str())
            .collect()
    }
}

/// Picks registered technologies that fit `requirements`.
///
/// Groups are sorted by descending score, then by name.
pub fn suggest_stack(registry: &TechnologyRegistry, requirements: &StackRequirements) -> StackSuggestion {
    let project_type = requirements.project_type.trim();
    let expertise: HashSet<String> = requirements
        .team_expertise
        .iter()
        .filter_map(|name| registry.lookup(name).map(|r| r.key()))
        .collect();

    let mut groups: BTreeMap<Category, Vec<SuggestedTechnology>> = SUGGESTION_CATEGORIES
        .iter()
        .map(|c| (*c, Vec::new()))
        .collect();

    for record in registry.records() {
        if !record.supports_use_case(project_type) {
            continue;
        }
        if requirements.scale == Scale::Large && !record.has_tag(SCALABLE_TAG) {
            continue;
        }
        if requirements.exclude_tags.iter().any(|tag| record.has_tag(tag)) {
            continue;
        }
        let Some(group) = groups.get_mut(&record.category) else {
            continue;
        };

        let familiar = expertise.contains(&record.key());
        let score = if familiar {
            BASE_SCORE * EXPERTISE_MULTIPLIER
        } else {
            BASE_SCORE
        };

        group.push(SuggestedTechnology {
            name: record.name.clone(),
            description: record.description.clone(),
            score,
            rationale: vec![
                format!("Suitable for {} projects", project_type),
                if familiar {
                    "Familiar to team".to_string()
                } else {
                    "Learning opportunity".to_string()
                },
            ],
            alternatives: registry
                .alternatives(record)
                .into_iter()
                .map(|r| r.name)
                .collect(),
        });
    }

    for group in groups.values_mut() {
        group.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    }

    let learning_path = groups
        .values()
        .flatten()
        .filter(|t| !expertise.contains(&t.name.to_lowercase()))
        .filter_map(|t| registry.lookup(&t.name))
        .map(LearningStep::for_record)
        .collect();

    StackSuggestion {
        project_type: normalize_name(project_type),
        scale: requirements.scale,
        groups,
        learning_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_suggestion_groups() {
        let registry = TechnologyRegistry::with_defaults();
        let suggestion = suggest_stack(&registry, &StackRequirements::new("web"));

        let categories: Vec<Category> = suggestion.groups.keys().copied().collect();
        assert_eq!(categories, SUGGESTION_CATEGORIES.to_vec());

        let frontend = &suggestion.groups[&Category::Frontend];
        assert!(frontend.iter().any(|t| t.name == "react"));
        assert!(frontend.iter().all(|t| t.score == BASE_SCORE));
        let names: Vec<&str> = frontend.iter().map(|t| t.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_expertise_ranks_first() {
        let registry = TechnologyRegistry::with_defaults();
        let requirements = StackRequirements::new("web").with_expertise(&["Vue", "Flask"]);
        let suggestion = suggest_stack(&registry, &requirements);

        let vue = suggestion.top_pick(Category::Frontend).unwrap();
        assert_eq!(vue.name, "vue");
        assert!((vue.score - 1.2).abs() < 1e-9);
        assert_eq!(vue.rationale[1], "Familiar to team");
        assert_eq!(suggestion.top_pick(Category::Backend).unwrap().name, "flask");
        assert!(!suggestion.learning_names().contains(&"vue"));
        assert!(suggestion.learning_names().contains(&"react"));
    }

    #[test]
    fn test_large_scale_keeps_scalable_only() {
        let registry = TechnologyRegistry::with_defaults();
        let requirements = StackRequirements::new("web").with_scale(Scale::Large);
        let suggestion = suggest_stack(&registry, &requirements);

        let all: Vec<&str> = suggestion
            .groups
            .values()
            .flatten()
            .map(|t| t.name.as_str())
            .collect();
        assert!(all.contains(&"react"));
        assert!(all.contains(&"postgresql"));
        assert!(!all.contains(&"vue"));
        assert!(!all.contains(&"flask"));
        assert_eq!(suggestion.scale, Scale::Large);

        let medium = suggest_stack(&registry, &StackRequirements::new("web").with_scale(Scale::Medium));
        assert!(medium.groups[&Category::Frontend].iter().any(|t| t.name == "vue"));
    }

    #[test]
    fn test_learning_steps_are_structured() {
        let registry = TechnologyRegistry::with_defaults();
        let requirements = StackRequirements::new("web").with_expertise(&["javascript"]);
        let suggestion = suggest_stack(&registry, &requirements);

        let react = suggestion
            .learning_path
            .iter()
            .find(|step| step.technology == "react")
            .unwrap();
        assert_eq!(react.estimated_time, "2-4 weeks");
        assert_eq!(react.prerequisites, vec!["javascript"]);
        let kinds: Vec<&str> = react.resources.iter().map(|r| r.kind.as_str()).collect();
        assert_eq!(kinds, vec!["documentation", "repository"]);
        assert_eq!(react.resources[1].url, "https://github.com/facebook/react");
    }

    #[test]
    fn test_scale_parse() {
        assert_eq!(Scale::parse("LARGE"), Some(Scale::Large));
        assert_eq!(Scale::parse(" small "), Some(Scale::Small));
        assert_eq!(Scale::parse("huge"), None);
        assert_eq!(Scale::default(), Scale::Small);
    }

    #[test]
    fn test_excluded_tags_are_skipped() {
        let registry = TechnologyRegistry::with_defaults();
        let requirements = StackRequirements::new("web").excluding(&["legacy"]);
        let suggestion = suggest_stack(&registry, &requirements);

        let all: Vec<&str> = suggestion
            .groups
            .values()
            .flatten()
            .map(|t| t.name.as_str())
            .collect();
        assert!(!all.contains(&"jquery"));
        assert!(!all.contains(&"selenium"));
        assert!(all.contains(&"jest"));
    }

    #[test]
    fn test_unknown_project_type_is_empty() {
        let registry = TechnologyRegistry::with_defaults();
        let suggestion = suggest_stack(&registry, &StackRequirements::new("quantum"));
        assert!(suggestion.groups.values().all(|g| g.is_empty()));
        assert!(suggestion.learning_path.is_empty());
    }

    #[test]
    fn test_alternatives_are_listed() {
        let registry = TechnologyRegistry::with_defaults();
        let suggestion = suggest_stack(&registry, &StackRequirements::new("web"));
        let react = suggestion.groups[&Category::Frontend]
            .iter()
            .find(|t| t.name == "react")
            .unwrap();
        assert!(react.alternatives.contains(&"vue".to_string()));
    }
}
