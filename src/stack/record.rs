use super::{Category, TechType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Links into a technology's ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ecosystem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    /// Canonical names worth knowing before this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

impl Ecosystem {
    pub fn is_empty(&self) -> bool {
        self.github_url.is_none()
            && self.documentation_url.is_none()
            && self.package_manager.is_none()
            && self.package_name.is_none()
            && self.requires.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popularity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A registered technology. Keyed by its lowercase canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub tech_type: TechType,
    pub category: Category,
    pub description: String,
    #[serde(default, skip_serializing_if = "Ecosystem::is_empty")]
    pub ecosystem: Ecosystem,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<Popularity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
}

impl TechnologyRecord {
    pub fn new(
        name: impl Into<String>,
        tech_type: TechType,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tech_type,
            category,
            description: description.into(),
            ecosystem: Ecosystem::default(),
            use_cases: Vec::new(),
            tags: Vec::new(),
            popularity: None,
            latest_version: None,
        }
    }

    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    pub fn with_use_cases(mut self, use_cases: &[&str]) -> Self {
        self.use_cases = use_cases.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_github(mut self, url: impl Into<String>) -> Self {
        self.ecosystem.github_url = Some(url.into());
        self
    }

    pub fn with_docs(mut self, url: impl Into<String>) -> Self {
        self.ecosystem.documentation_url = Some(url.into());
        self
    }

    pub fn with_package(mut self, manager: &str, package: &str) -> Self {
        self.ecosystem.package_manager = Some(manager.to_string());
        self.ecosystem.package_name = Some(package.to_string());
        self
    }

    pub fn with_requires(mut self, names: &[&str]) -> Self {
        self.ecosystem.requires = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.popularity.get_or_insert_with(Popularity::default).stars = Some(stars);
        self
    }

    pub fn stars(&self) -> Option<u64> {
        self.popularity.as_ref().and_then(|p| p.stars)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn supports_use_case(&self, use_case: &str) -> bool {
        self.use_cases.iter().any(|u| u.eq_ignore_ascii_case(use_case))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = TechnologyRecord::new(
            "Svelte",
            TechType::Framework,
            Category::Frontend,
            "Compiled UI framework",
        )
        .with_use_cases(&["web"])
        .with_package("npm", "svelte")
        .with_requires(&["javascript"])
        .with_stars(80_000);

        assert_eq!(record.key(), "svelte");
        assert!(record.supports_use_case("WEB"));
        assert_eq!(record.stars(), Some(80_000));
        assert_eq!(record.ecosystem.package_manager.as_deref(), Some("npm"));
        assert_eq!(record.ecosystem.requires, vec!["javascript"]);
        assert!(!record.ecosystem.is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let record = TechnologyRecord::new("redis", TechType::Database, Category::Database, "Cache");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "database");
        assert_eq!(json["category"], "database");
        assert!(json.get("ecosystem").is_none());
        assert!(json.get("use_cases").is_none());
    }

    #[test]
    fn test_record_deserializes_with_missing_optionals() {
        let record: TechnologyRecord = serde_json::from_str(
            r#"{"name":"Deno","type":"platform","category":"backend","description":"JS runtime"}"#,
        )
        .unwrap();

        assert_eq!(record.tech_type, TechType::Platform);
        assert!(record.ecosystem.is_empty());
        assert!(record.tags.is_empty());
    }
}
