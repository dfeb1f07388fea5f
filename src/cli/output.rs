//! Output formatting for multiple formats
//!
//! JSON and YAML render the full [`OperationResult`] envelope so scripts can
//! branch on `success`. Human output renders the payload, or the error and
//! its recovery hint.
//!
//! # Example
//!
//! ```ignore
//! use stacklens::cli::output::{OutputFormat, OutputFormatter};
//!
//! let result = analyzer.analyze(&AnalysisRequest::new("react and django"));
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! println!("{}", formatter.format_analysis(&result)?);
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{AnalysisResult, StackSuggestion};
use crate::enrichment::RefreshSummary;
use crate::result::{ErrorInfo, OperationResult};
use crate::stack::TechnologyRecord;

const RULE_WIDTH: usize = 42;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// `info` payload: a record plus, on request, its alternatives.
#[derive(Debug, Clone, Serialize)]
pub struct TechnologyInfo {
    pub technology: TechnologyRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<TechnologyRecord>>,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

fn rule() -> String {
    "\u{2501}".repeat(RULE_WIDTH)
}

fn confidence_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * 10.0) as usize).min(10);
    "\u{2588}".repeat(filled) + &"\u{2591}".repeat(10 - filled)
}

fn tree_connector(index: usize, len: usize) -> &'static str {
    if index + 1 == len {
        "\u{2514}\u{2500}"
    } else {
        "\u{251C}\u{2500}"
    }
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn structured<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => {
                serde_yaml::to_string(value).context("Failed to serialize output to YAML")
            }
            _ => serde_json::to_string_pretty(value).context("Failed to serialize output to JSON"),
        }
    }

    fn render<T, F>(&self, result: &OperationResult<T>, human: F) -> Result<String>
    where
        T: Serialize,
        F: FnOnce(&T) -> String,
    {
        match self.format {
            OutputFormat::Json | OutputFormat::Yaml => self.structured(result),
            OutputFormat::Human => match (&result.data, &result.error) {
                (Some(data), _) if result.success => Ok(human(data)),
                (_, Some(error)) => Ok(format_error_human(error)),
                _ => Ok("No result\n".to_string()),
            },
        }
    }

    pub fn format_analysis(&self, result: &OperationResult<AnalysisResult>) -> Result<String> {
        let cache_hit = result.metadata.cache_hit;
        let duration = result.metadata.duration_ms;
        self.render(result, |analysis| {
            format_analysis_human(analysis, cache_hit, duration)
        })
    }

    pub fn format_info(&self, result: &OperationResult<TechnologyInfo>) -> Result<String> {
        self.render(result, format_info_human)
    }

    /// Lists are plain sequences in JSON and YAML; there is no failure case.
    pub fn format_list(&self, records: &[TechnologyRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json | OutputFormat::Yaml => self.structured(&records),
            OutputFormat::Human => Ok(format_list_human(records)),
        }
    }

    pub fn format_search(
        &self,
        query: &str,
        result: &OperationResult<Vec<TechnologyRecord>>,
    ) -> Result<String> {
        self.render(result, |records| format_search_human(query, records))
    }

    pub fn format_suggestion(&self, result: &OperationResult<StackSuggestion>) -> Result<String> {
        self.render(result, format_suggestion_human)
    }

    pub fn format_refresh(&self, result: &OperationResult<RefreshSummary>) -> Result<String> {
        self.render(result, format_refresh_human)
    }
}

fn format_error_human(error: &ErrorInfo) -> String {
    let mut output = format!("\u{2717} {}: {}\n", error.error_type, error.message);
    if let Some(ref details) = error.details {
        output.push_str(&format!("  Details: {}\n", details));
    }
    if let Some(ref hint) = error.recovery_hint {
        output.push_str(&format!("  Hint: {}\n", hint));
    }
    output
}

fn format_analysis_human(result: &AnalysisResult, cache_hit: bool, duration_ms: Option<u64>) -> String {
    let mut output = String::new();

    if result.identified_technologies.is_empty() {
        output.push_str("\u{26A0} No Technologies Identified\n");
    } else {
        output.push_str(&format!(
            "\u{2713} {} Technolog{} Identified\n",
            result.identified_technologies.len(),
            if result.identified_technologies.len() == 1 { "y" } else { "ies" }
        ));
    }
    output.push_str(&rule());
    output.push_str("\n\n");

    if !result.context.is_empty() {
        output.push_str(&format!("Context: {}\n\n", result.context));
    }

    let len = result.identified_technologies.len();
    for (i, identified) in result.identified_technologies.iter().enumerate() {
        let tech = &identified.technology;
        output.push_str(&format!(
            "{} {} ({}, {})\n",
            tree_connector(i, len),
            tech.name,
            tech.tech_type,
            tech.category
        ));
        let indent = if i + 1 == len { "   " } else { "\u{2502}  " };
        output.push_str(&format!(
            "{}Confidence: {} {:.0}%\n",
            indent,
            confidence_bar(identified.confidence_score),
            identified.confidence_score * 100.0
        ));
        if identified.matched_text != tech.name || identified.occurrences > 1 {
            output.push_str(&format!(
                "{}Matched: \"{}\" x{}\n",
                indent, identified.matched_text, identified.occurrences
            ));
        }
    }
    if len > 0 {
        output.push('\n');
    }

    let stack = &result.stack_analysis;
    output.push_str("Stack Completeness:\n");
    for (category, covered) in &stack.completeness {
        let mark = if *covered { "\u{2713}" } else { "\u{2717}" };
        match stack.coverage.get(category) {
            Some(name) => output.push_str(&format!("  {} {:<10} {}\n", mark, category, name)),
            None => output.push_str(&format!("  {} {}\n", mark, category)),
        }
    }

    if !stack.compatibility.compatible {
        output.push_str("\n\u{26A0} Compatibility Issues:\n");
        for issue in &stack.compatibility.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    if !stack.suggestions.is_empty() {
        output.push_str("\nSuggestions:\n");
        for suggestion in &stack.suggestions {
            output.push_str(&format!("  - {}\n", suggestion));
        }
    }

    if let Some(ms) = duration_ms {
        output.push_str(&format!(
            "\nProcessed in {}ms{}\n",
            ms,
            if cache_hit { " (cached)" } else { "" }
        ));
    }

    output
}

fn format_record_human(output: &mut String, record: &TechnologyRecord) {
    output.push_str(&format!("{}\n", record.name));
    output.push_str(&rule());
    output.push_str("\n\n");
    output.push_str(&format!("Type:        {}\n", record.tech_type));
    output.push_str(&format!("Category:    {}\n", record.category));
    output.push_str(&format!("Description: {}\n", record.description));

    if let Some(ref version) = record.latest_version {
        output.push_str(&format!("Version:     {}\n", version));
    }
    if let Some(stars) = record.stars() {
        output.push_str(&format!("Stars:       {}\n", stars));
    }
    if !record.use_cases.is_empty() {
        output.push_str(&format!("Use Cases:   {}\n", record.use_cases.join(", ")));
    }
    if !record.tags.is_empty() {
        output.push_str(&format!("Tags:        {}\n", record.tags.join(", ")));
    }

    let eco = &record.ecosystem;
    if !eco.is_empty() {
        output.push_str("\nEcosystem:\n");
        let mut lines = Vec::new();
        if let Some(ref url) = eco.github_url {
            lines.push(format!("GitHub:  {}", url));
        }
        if let Some(ref url) = eco.documentation_url {
            lines.push(format!("Docs:    {}", url));
        }
        if let Some(ref manager) = eco.package_manager {
            match eco.package_name {
                Some(ref package) => lines.push(format!("Package: {} ({})", package, manager)),
                None => lines.push(format!("Package: {}", manager)),
            }
        }
        if !eco.requires.is_empty() {
            lines.push(format!("Requires: {}", eco.requires.join(", ")));
        }
        for (i, line) in lines.iter().enumerate() {
            output.push_str(&format!("{} {}\n", tree_connector(i, lines.len()), line));
        }
    }
}

fn format_info_human(info: &TechnologyInfo) -> String {
    let mut output = String::new();
    format_record_human(&mut output, &info.technology);

    if let Some(ref alternatives) = info.alternatives {
        output.push_str("\nAlternatives:\n");
        if alternatives.is_empty() {
            output.push_str("  (none registered)\n");
        }
        for alt in alternatives {
            output.push_str(&format!("  - {}: {}\n", alt.name, alt.description));
        }
    }

    output
}

fn format_list_human(records: &[TechnologyRecord]) -> String {
    let mut output = format!("{} Registered Technologies\n", records.len());
    output.push_str(&rule());
    output.push_str("\n\n");

    let width = records.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for record in records {
        output.push_str(&format!(
            "  {:<width$}  {:<10} {}\n",
            record.name,
            record.tech_type.as_str(),
            record.category.as_str(),
            width = width
        ));
    }

    output
}

fn format_search_human(query: &str, records: &[TechnologyRecord]) -> String {
    let mut output = format!("{} Matches for '{}'\n", records.len(), query);
    output.push_str(&rule());
    output.push_str("\n\n");

    for record in records {
        output.push_str(&format!("  {} ({}): {}\n", record.name, record.category, record.description));
    }

    output
}

fn format_suggestion_human(suggestion: &StackSuggestion) -> String {
    let mut output = format!(
        "Suggested Stack: {} ({} scale)\n",
        suggestion.project_type, suggestion.scale
    );
    output.push_str(&rule());
    output.push_str("\n");

    for (category, picks) in &suggestion.groups {
        output.push_str(&format!("\n{}:\n", category));
        if picks.is_empty() {
            output.push_str("  (no registered match)\n");
            continue;
        }
        for (i, pick) in picks.iter().enumerate() {
            output.push_str(&format!(
                "{} {} ({:.1}) {}\n",
                tree_connector(i, picks.len()),
                pick.name,
                pick.score,
                pick.rationale.join("; ")
            ));
        }
    }

    if !suggestion.learning_path.is_empty() {
        output.push_str("\nLearning Path:\n");
        for (i, step) in suggestion.learning_path.iter().enumerate() {
            output.push_str(&format!("  {}. {} ({})", i + 1, step.technology, step.estimated_time));
            if !step.prerequisites.is_empty() {
                output.push_str(&format!(", after {}", step.prerequisites.join(", ")));
            }
            output.push('\n');
        }
    }

    output
}

fn format_refresh_human(summary: &RefreshSummary) -> String {
    let mut output = String::new();

    if summary.degraded {
        output.push_str("\u{26A0} Registry Refresh Skipped\n");
    } else {
        output.push_str("\u{2713} Registry Refreshed\n");
    }
    output.push_str(&rule());
    output.push_str("\n\n");

    output.push_str(&format!("Source:  {}\n", summary.source));
    output.push_str(&format!("Fetched: {}\n", summary.fetched));
    output.push_str(&format!("Added:   {}\n", summary.added.len()));
    for name in &summary.added {
        output.push_str(&format!("  + {}\n", name));
    }
    if let Some(ref reason) = summary.reason {
        output.push_str(&format!("Reason:  {}\n", reason));
    }

    output
}
