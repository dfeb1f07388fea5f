//! Optional registry enrichment from remote technology lists.
//!
//! An [`Enricher`] produces candidate records. The analyzer runs it under a
//! deadline during refresh and only registers names it does not know yet.

use crate::stack::{normalize_name, Category, TechType, TechnologyRecord};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Enrichment timed out after {0}s")]
    Timeout(u64),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse enrichment source: {0}")]
    Parse(String),
}

#[async_trait]
pub trait Enricher: Send + Sync {
    /// Short label for logs and refresh summaries.
    fn source(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<TechnologyRecord>, EnrichmentError>;
}

/// Reads a Markdown "awesome list" and turns its bullet entries into records.
///
/// Entries look like `- [Name](https://github.com/org/repo) - Description.`
/// Every record gets the configured type and category. The `##` heading an
/// entry sits under becomes a tag.
pub struct AwesomeListEnricher {
    url: String,
    tech_type: TechType,
    category: Category,
    client: Client,
}

impl AwesomeListEnricher {
    pub fn new(
        url: impl Into<String>,
        tech_type: TechType,
        category: Category,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stacklens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EnrichmentError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            url,
            tech_type,
            category,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Enricher for AwesomeListEnricher {
    fn source(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<TechnologyRecord>, EnrichmentError> {
        debug!(url = %self.url, "Fetching technology list");

        let network_error = |e: reqwest::Error| EnrichmentError::Network {
            url: self.url.clone(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(network_error)?;
        let records = parse_awesome_list(&body, self.tech_type, self.category)?;

        info!(url = %self.url, entries = records.len(), "Fetched technology list");
        Ok(records)
    }
}

/// Extracts records from awesome-list Markdown.
///
/// Bullets without a description are skipped, as are names with no
/// letters or digits. A document with bullets but no usable entry is a
/// parse error; an empty document yields an empty list.
pub fn parse_awesome_list(
    markdown: &str,
    tech_type: TechType,
    category: Category,
) -> Result<Vec<TechnologyRecord>, EnrichmentError> {
    let entry_re =
        Regex::new(r"^[-*] \[([^\]]+)\]\(([^)]*)\)\s*[-\u{2013}:]\s*(.+?)\.?\s*$").expect("valid regex");
    let github_re = Regex::new(r"^https://github\.com/[^/\s]+/[^/\s]+").expect("valid regex");

    let mut records = Vec::new();
    let mut bullets = 0usize;
    let mut section: Option<String> = None;

    for line in markdown.lines().map(str::trim) {
        if let Some(heading) = line.strip_prefix("##") {
            let heading = heading.trim_start_matches('#').trim().to_lowercase();
            section = (!heading.is_empty()).then_some(heading);
            continue;
        }
        if !(line.starts_with("- [") || line.starts_with("* [")) {
            continue;
        }
        bullets += 1;

        let Some(caps) = entry_re.captures(line) else {
            continue;
        };
        let name = caps[1].trim();
        if normalize_name(name).is_empty() {
            continue;
        }

        let mut record = TechnologyRecord::new(name, tech_type, category, caps[3].trim());
        if let Some(github) = github_re.find(&caps[2]) {
            record = record.with_github(github.as_str());
        }
        if let Some(section) = &section {
            record.tags.push(section.clone());
        }
        records.push(record);
    }

    if bullets > 0 && records.is_empty() {
        return Err(EnrichmentError::Parse(format!(
            "{} list entries found but none had the form '- [Name](url) - Description'",
            bullets
        )));
    }

    Ok(records)
}

/// Outcome of a registry refresh.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RefreshSummary {
    pub source: String,
    pub fetched: usize,
    pub added: Vec<String>,
    /// Set when the fetch failed or timed out and the registry was left as is.
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Awesome CSS Frameworks

## Base

- [Bulma](https://github.com/jgthms/bulma) - Modern CSS framework based on Flexbox.
- [Pure](https://purecss.io) - Set of small, responsive CSS modules
* [Skeleton](https://github.com/dhg/Skeleton/tree/main) - Dead simple boilerplate.

## Very Lightweight

- [Milligram](https://github.com/milligram/milligram) - Minimalist framework.
- [No description](https://example.com)
- [***](https://example.com) - Unnamed.
";

    #[test]
    fn test_parse_awesome_list() {
        let records = parse_awesome_list(SAMPLE, TechType::Library, Category::Frontend).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["Bulma", "Pure", "Skeleton", "Milligram"]);
        assert_eq!(records[0].description, "Modern CSS framework based on Flexbox");
        assert_eq!(
            records[0].ecosystem.github_url.as_deref(),
            Some("https://github.com/jgthms/bulma")
        );
        assert_eq!(records[1].ecosystem.github_url, None);
        assert_eq!(
            records[2].ecosystem.github_url.as_deref(),
            Some("https://github.com/dhg/Skeleton")
        );
        assert!(records[3].has_tag("very lightweight"));
        assert!(records.iter().all(|r| r.tech_type == TechType::Library));
    }

    #[test]
    fn test_parse_empty_document() {
        let records = parse_awesome_list("", TechType::Tool, Category::Testing).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_rejects_unusable_lists() {
        let result = parse_awesome_list("- [Only](x)\n- [Links](y)\n", TechType::Tool, Category::Testing);
        assert!(matches!(result, Err(EnrichmentError::Parse(_))));
    }
}
