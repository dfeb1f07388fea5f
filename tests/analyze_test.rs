//! Analysis pipeline integration tests
//!
//! These tests drive `TechAnalyzer::analyze` end to end, covering:
//! - Empty input and filter validation
//! - Caching, filters and cache invalidation
//! - Matching rules (case, word boundaries, variations, longest match)
//! - Stack completeness and suggestions

use stacklens::analysis::StackRequirements;
use stacklens::{
    AnalysisRequest, Category, ErrorType, StacklensConfig, TechAnalyzer, TechType,
    TechnologyRecord,
};
use yare::parameterized;

fn analyzer() -> TechAnalyzer {
    TechAnalyzer::new(StacklensConfig::builtin())
}

fn names(analyzer: &TechAnalyzer, text: &str) -> Vec<String> {
    let result = analyzer.analyze(&AnalysisRequest::new(text));
    assert!(result.success, "analysis failed: {:?}", result.error);
    result
        .data
        .unwrap()
        .identified_technologies
        .into_iter()
        .map(|t| t.technology.name)
        .collect()
}

#[test]
fn test_empty_text_is_valid() {
    let result = analyzer().analyze(&AnalysisRequest::new(""));

    assert!(result.success);
    let data = result.data.unwrap();
    assert!(data.identified_technologies.is_empty());
    assert_eq!(result.metadata.tech_count, Some(0));
    assert!(!data.stack_analysis.is_complete());
}

#[test]
fn test_second_call_hits_cache() {
    let analyzer = analyzer();
    let request = AnalysisRequest::new("Vue frontend talking to a FastAPI service");

    let first = analyzer.analyze(&request);
    let second = analyzer.analyze(&request);

    assert!(!first.metadata.cache_hit);
    assert!(second.metadata.cache_hit);
    assert_eq!(first.data, second.data);
    assert_eq!(analyzer.cached_results(), 1);
}

#[test]
fn test_no_cache_request_skips_cache() {
    let analyzer = analyzer();
    let request = AnalysisRequest::new("redis").without_cache();

    analyzer.analyze(&request);
    let second = analyzer.analyze(&request);

    assert!(!second.metadata.cache_hit);
    assert_eq!(analyzer.cached_results(), 0);
}

#[test]
fn test_filter_order_shares_cache_entry() {
    let analyzer = analyzer();
    let text = "django react postgres";

    let first = analyzer.analyze(
        &AnalysisRequest::new(text).with_categories(&["frontend", "backend"]),
    );
    let second = analyzer.analyze(
        &AnalysisRequest::new(text).with_categories(&["backend", "frontend", "backend"]),
    );

    assert!(!first.metadata.cache_hit);
    assert!(second.metadata.cache_hit);
    assert_eq!(
        second.data.unwrap().categories,
        vec![Category::Frontend, Category::Backend]
    );
}

#[test]
fn test_context_is_part_of_cache_key() {
    let analyzer = analyzer();

    analyzer.analyze(&AnalysisRequest::new("rust").with_context("a"));
    let other = analyzer.analyze(&AnalysisRequest::new("rust").with_context("b"));

    assert!(!other.metadata.cache_hit);
    assert_eq!(other.data.unwrap().context, "b");
}

#[parameterized(
    upper = { "PYTHON" },
    title = { "Python" },
    lower = { "python" },
    sentence = { "We write Python, mostly." },
)]
fn test_case_insensitive_match(text: &str) {
    let result = analyzer().analyze(&AnalysisRequest::new(text));
    let data = result.data.unwrap();

    assert_eq!(data.names(), vec!["python"]);
    let python = data.find("python").unwrap();
    assert!(python.confidence_score >= 0.9);
    assert!(python.confidence_score <= 1.0);
}

#[parameterized(
    inside_word = { "reactive programming", false },
    standalone = { "I love react", true },
    prefix = { "reacting to events", false },
    punctuated = { "(react)", true },
    hyphenated = { "react-based UI", true },
)]
fn test_word_boundaries(text: &str, expect_react: bool) {
    let found = names(&analyzer(), text);
    assert_eq!(found.contains(&"react".to_string()), expect_react, "text: {}", text);
}

#[test]
fn test_repeated_mentions_collapse() {
    let result = analyzer().analyze(&AnalysisRequest::new("python python python"));
    let data = result.data.unwrap();

    assert_eq!(data.identified_technologies.len(), 1);
    assert_eq!(data.identified_technologies[0].occurrences, 3);
}

#[test]
fn test_first_seen_order() {
    let found = names(&analyzer(), "docker then django then docker and jest");
    assert_eq!(found, vec!["docker", "django", "jest"]);
}

#[parameterized(
    nodejs = { "nodejs" },
    node_dot_js = { "Node.js" },
    node_space_js = { "node js" },
    node_alone = { "node" },
)]
fn test_node_variations(text: &str) {
    assert_eq!(names(&analyzer(), text), vec!["node.js"]);
}

#[test]
fn test_longest_match_wins() {
    let found = names(&analyzer(), "mobile app in react native");
    assert_eq!(found, vec!["react native"]);

    let found = names(&analyzer(), "Ruby on Rails monolith");
    assert_eq!(found, vec!["rails"]);
}

#[test]
fn test_variation_scores_below_exact() {
    let result = analyzer().analyze(&AnalysisRequest::new("k8s and docker"));
    let data = result.data.unwrap();

    let k8s = data.find("kubernetes").unwrap();
    let docker = data.find("docker").unwrap();
    assert_eq!(k8s.matched_text, "k8s");
    assert!(docker.confidence_score > k8s.confidence_score);
}

#[test]
fn test_type_filter() {
    let result = analyzer().analyze(
        &AnalysisRequest::new("react and python").with_tech_types(&["language"]),
    );
    let data = result.data.unwrap();

    assert_eq!(data.names(), vec!["python"]);
    assert!(data
        .identified_technologies
        .iter()
        .all(|t| t.technology.tech_type == TechType::Language));
    assert_eq!(data.tech_types, vec![TechType::Language]);
}

#[test]
fn test_unknown_type_filter_is_rejected() {
    let result = analyzer().analyze(&AnalysisRequest::new("react").with_tech_types(&["gizmo"]));

    assert!(!result.success);
    assert!(result.data.is_none());
    let error = result.error.unwrap();
    assert_eq!(error.error_type, ErrorType::ValidationError);
    assert!(error.recovery_hint.is_some());
    assert_eq!(error.details.unwrap()["unknown_tech_types"][0], "gizmo");
}

#[test]
fn test_core_stack_is_complete() {
    let result = analyzer().analyze(&AnalysisRequest::new("react node.js mongodb"));
    let stack = result.data.unwrap().stack_analysis;

    assert!(stack.is_complete());
    assert!(stack.completeness[&Category::Frontend]);
    assert!(stack.completeness[&Category::Backend]);
    assert!(stack.completeness[&Category::Database]);
    assert!(stack.compatibility.compatible);
    assert!(stack.compatibility.issues.is_empty());
    assert_eq!(
        stack.suggestions,
        vec![
            "Consider adding testing frameworks to your stack",
            "Consider adding DevOps tools for better deployment workflow",
        ]
    );
}

#[test]
fn test_language_covers_backend_as_fallback() {
    let result = analyzer().analyze(&AnalysisRequest::new("just python"));
    let stack = result.data.unwrap().stack_analysis;

    assert!(stack.completeness[&Category::Backend]);
    assert_eq!(stack.coverage[&Category::Backend], "python");
    assert!(!stack.completeness[&Category::Frontend]);
}

#[test]
fn test_framework_preferred_over_language() {
    let result = analyzer().analyze(&AnalysisRequest::new("python with flask"));
    let stack = result.data.unwrap().stack_analysis;
    assert_eq!(stack.coverage[&Category::Backend], "flask");
}

#[test]
fn test_code_input_ignores_comments() {
    let code = "\
use std::io;
/* legacy: this used to call redis */
fn main() {
    // switch to mongodb later
    let x = 1;
}
";
    let found = names(&analyzer(), code);
    assert!(found.is_empty(), "found {:?}", found);
}

#[tokio::test]
async fn test_add_technology_invalidates_cache() {
    let analyzer = analyzer();
    let request = AnalysisRequest::new("we use htmx and django");

    let before = analyzer.analyze(&request);
    assert_eq!(before.data.unwrap().names(), vec!["django"]);

    let record = TechnologyRecord::new(
        "htmx",
        TechType::Library,
        Category::Frontend,
        "Hypermedia-driven frontend library",
    );
    assert!(analyzer.add_technology(record).await.success);
    assert_eq!(analyzer.cached_results(), 0);

    let after = analyzer.analyze(&request);
    assert!(!after.metadata.cache_hit);
    assert_eq!(after.data.unwrap().names(), vec!["htmx", "django"]);
}

#[tokio::test]
async fn test_remove_technology_drops_variations() {
    let analyzer = analyzer();
    assert_eq!(names(&analyzer, "postgres"), vec!["postgresql"]);

    let removed = analyzer.remove_technology("PostgreSQL").await;
    assert!(removed.success);

    assert!(names(&analyzer, "postgres postgresql psql").is_empty());
    let missing = analyzer.remove_technology("postgresql").await;
    assert_eq!(
        missing.error.unwrap().error_type,
        ErrorType::TechnologyNotFoundError
    );
}

#[test]
fn test_cache_capacity_is_bounded() {
    let config = StacklensConfig {
        cache_max_size: 2,
        ..StacklensConfig::builtin()
    };
    let analyzer = TechAnalyzer::new(config);

    analyzer.analyze(&AnalysisRequest::new("react"));
    analyzer.analyze(&AnalysisRequest::new("vue"));
    analyzer.analyze(&AnalysisRequest::new("svelte"));
    assert_eq!(analyzer.cached_results(), 2);

    assert!(!analyzer.analyze(&AnalysisRequest::new("react")).metadata.cache_hit);
    assert!(analyzer.analyze(&AnalysisRequest::new("svelte")).metadata.cache_hit);
}

#[test]
fn test_suggest_stack_prefers_team_expertise() {
    let result = analyzer().suggest_stack(
        &StackRequirements::new("api").with_expertise(&["python", "postgres"]),
    );
    let suggestion = result.data.unwrap();

    assert!(!suggestion.groups[&Category::Backend].is_empty());
    assert_eq!(
        suggestion.top_pick(Category::Database).unwrap().name,
        "postgresql"
    );
    assert!(!suggestion.learning_names().contains(&"postgresql"));
}

fn htmx() -> TechnologyRecord {
    TechnologyRecord::new(
        "htmx",
        TechType::Library,
        Category::Frontend,
        "HTML over the wire",
    )
}

#[test]
fn test_add_during_analysis_leaves_no_stale_cache() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    for _ in 0..300 {
        let analyzer = analyzer();
        let stop = AtomicBool::new(false);

        std::thread::scope(|scope| {
            let worker = scope.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    analyzer.analyze(&AnalysisRequest::new("we use htmx"));
                }
            });

            assert!(runtime.block_on(analyzer.add_technology(htmx())).success);
            stop.store(true, Ordering::Relaxed);
            worker.join().unwrap();
        });

        assert_eq!(names(&analyzer, "we use htmx"), vec!["htmx"]);
    }
}
