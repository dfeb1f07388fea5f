use super::cache::{CacheKey, ResultCache};
use super::stack::StackAnalyzer;
use super::suggest::{suggest_stack, StackRequirements, StackSuggestion};
use super::types::{AnalysisRequest, AnalysisResult, IdentifiedTechnology, TechnologyFilter};
use crate::config::StacklensConfig;
use crate::enrichment::{Enricher, EnrichmentError, RefreshSummary};
use crate::error::AnalyzerError;
use crate::result::{ErrorInfo, OperationResult, ResultMetadata};
use crate::scoring;
use crate::stack::{Category, RegistryError, TechType, TechnologyRecord, TechnologyRegistry};
use crate::state::{JsonFileStore, StateSnapshot, StateStore};
use crate::text::{looks_like_code, normalize, strip_code_noise, Matcher};
use chrono::Utc;
use serde_json::json;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

/// Steps of one analysis call, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validate,
    CacheLookup,
    Normalize,
    Match,
    Score,
    StackAnalyze,
    Assemble,
    CacheStore,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "Validate",
            Stage::CacheLookup => "CacheLookup",
            Stage::Normalize => "Normalize",
            Stage::Match => "Match",
            Stage::Score => "Score",
            Stage::StackAnalyze => "StackAnalyze",
            Stage::Assemble => "Assemble",
            Stage::CacheStore => "CacheStore",
        };
        f.write_str(name)
    }
}

/// A pipeline failure plus optional structured details for the envelope.
struct Failure {
    error: AnalyzerError,
    details: Option<serde_json::Value>,
}

impl From<AnalyzerError> for Failure {
    fn from(error: AnalyzerError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Technology identification service: registry, result cache and optional
/// state store behind one handle.
///
/// Analysis is synchronous. Registry mutations are async only because they
/// persist state afterwards; the registry lock is never held across that
/// await.
pub struct TechAnalyzer {
    config: StacklensConfig,
    registry: RwLock<TechnologyRegistry>,
    cache: ResultCache<AnalysisResult>,
    store: Option<Box<dyn StateStore>>,
    /// Orders mutate-snapshot-save sequences so saves land in mutation order.
    persist_lock: AsyncMutex<()>,
}

impl TechAnalyzer {
    /// Analyzer over the built-in registry, without persistence.
    pub fn new(config: StacklensConfig) -> Self {
        Self::with_registry(config, TechnologyRegistry::with_defaults())
    }

    pub fn with_registry(config: StacklensConfig, registry: TechnologyRegistry) -> Self {
        let cache = ResultCache::new(config.cache_ttl(), config.cache_max_size);
        Self {
            config,
            registry: RwLock::new(registry),
            cache,
            store: None,
            persist_lock: AsyncMutex::new(()),
        }
    }

    /// Analyzer backed by `store`. Saved records override built-in ones with
    /// the same name; a failed load keeps the built-in registry.
    pub async fn open(config: StacklensConfig, store: Box<dyn StateStore>) -> Self {
        let mut registry = TechnologyRegistry::with_defaults();

        match store.load().await {
            Ok(Some(snapshot)) => {
                let mut restored = 0usize;
                for record in snapshot.technologies.into_values() {
                    match registry.upsert(record) {
                        Ok(()) => restored += 1,
                        Err(e) => warn!(error = %e, "Skipping saved technology"),
                    }
                }
                info!(
                    store = %store.describe(),
                    restored,
                    saved_at = %snapshot.last_updated,
                    "Loaded technology state"
                );
            }
            Ok(None) => debug!(store = %store.describe(), "No saved technology state"),
            Err(e) => warn!(
                store = %store.describe(),
                error = %e,
                "Failed to load technology state, using built-in registry"
            ),
        }

        let mut analyzer = Self::with_registry(config, registry);
        analyzer.store = Some(store);
        analyzer
    }

    /// Opens with a JSON file store at `config.state_path`, or in memory
    /// when no path is configured.
    pub async fn from_config(config: StacklensConfig) -> Self {
        match config.state_path.clone() {
            Some(path) => Self::open(config, Box::new(JsonFileStore::new(path))).await,
            None => Self::new(config),
        }
    }

    pub fn config(&self) -> &StacklensConfig {
        &self.config
    }

    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, TechnologyRegistry> {
        self.registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_registry(&self) -> RwLockWriteGuard<'_, TechnologyRegistry> {
        self.registry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Identifies technologies mentioned in `request.text`.
    ///
    /// Always returns an envelope; internal faults, panics included, become
    /// a `ProcessingError` failure.
    pub fn analyze(&self, request: &AnalysisRequest) -> OperationResult<AnalysisResult> {
        let start = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(request)))
            .unwrap_or_else(|payload| {
                Err(AnalyzerError::Processing(panic_message(payload.as_ref())).into())
            });
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok((result, cache_hit)) => {
                let tech_count = result.identified_technologies.len();
                info!(
                    technologies = tech_count,
                    cache_hit,
                    duration_ms,
                    "Analysis complete"
                );
                OperationResult::ok(result).with_metadata(ResultMetadata {
                    cache_hit,
                    tech_count: Some(tech_count),
                    duration_ms: Some(duration_ms),
                    state_persisted: None,
                })
            }
            Err(failure) => {
                warn!(
                    error = %failure.error,
                    error_type = %failure.error.error_type(),
                    "Analysis failed"
                );
                let mut error = ErrorInfo::from(&failure.error);
                error.details = failure.details;
                OperationResult::failure(error).with_metadata(ResultMetadata {
                    duration_ms: Some(duration_ms),
                    ..Default::default()
                })
            }
        }
    }

    fn run_pipeline(&self, request: &AnalysisRequest) -> Result<(AnalysisResult, bool), Failure> {
        debug!("Stage: {}", Stage::Validate);
        let (tech_types, categories) = self.validate(request)?;

        let use_cache = self.config.cache_enabled && request.use_cache;
        let key = CacheKey::new(&request.text, &request.context, &tech_types, &categories);
        if use_cache {
            debug!("Stage: {}", Stage::CacheLookup);
            if let Some(hit) = self.cache.get(&key) {
                debug!("Cache hit");
                return Ok((hit, true));
            }
        }

        debug!("Stage: {}", Stage::Normalize);
        let normalized = if self.config.strip_code_comments && looks_like_code(&request.text) {
            debug!("Input looks like code, stripping comments");
            normalize(&strip_code_noise(&request.text))
        } else {
            normalize(&request.text)
        };

        // Held through CacheStore. Mutations clear the cache under the write
        // lock, so a result built from an older registry can never be stored
        // after that clear.
        let registry = self.read_registry();

        debug!("Stage: {}", Stage::Match);
        let matches = Matcher::new(&registry).find_matches(&normalized);
        debug!(candidates = matches.len(), "Matching complete");

        debug!("Stage: {}", Stage::Score);
        let identified: Vec<IdentifiedTechnology> = matches
            .into_iter()
            .filter(|m| tech_types.is_empty() || tech_types.contains(&m.record.tech_type))
            .filter(|m| categories.is_empty() || categories.contains(&m.record.category))
            .map(|m| IdentifiedTechnology {
                confidence_score: scoring::score(
                    &m.matched_text,
                    &m.record.name,
                    m.occurrences,
                    true,
                ),
                technology: m.record.clone(),
                matched_text: m.matched_text,
                occurrences: m.occurrences,
            })
            .collect();

        debug!("Stage: {}", Stage::StackAnalyze);
        let stack_analysis = StackAnalyzer::analyze(&identified);

        debug!("Stage: {}", Stage::Assemble);
        let result = AnalysisResult {
            identified_technologies: identified,
            tech_types,
            categories,
            timestamp: Utc::now(),
            context: request.context.clone(),
            stack_analysis,
        };

        if use_cache {
            debug!("Stage: {}", Stage::CacheStore);
            self.cache.set(key, result.clone());
        }
        drop(registry);

        Ok((result, false))
    }

    /// Parses filters and checks the input size. Any text, the empty string
    /// included, is acceptable content.
    fn validate(&self, request: &AnalysisRequest) -> Result<(Vec<TechType>, Vec<Category>), Failure> {
        if request.text.len() > self.config.max_input_bytes {
            return Err(Failure {
                error: AnalyzerError::Validation(format!(
                    "input is {} bytes, limit is {}",
                    request.text.len(),
                    self.config.max_input_bytes
                )),
                details: Some(json!({
                    "input_bytes": request.text.len(),
                    "max_input_bytes": self.config.max_input_bytes,
                })),
            });
        }

        let unknown_types: Vec<&str> = request
            .tech_types
            .iter()
            .filter(|t| TechType::parse(t).is_none())
            .map(String::as_str)
            .collect();
        let unknown_categories: Vec<&str> = request
            .categories
            .iter()
            .filter(|c| Category::parse(c).is_none())
            .map(String::as_str)
            .collect();

        if !unknown_types.is_empty() || !unknown_categories.is_empty() {
            return Err(Failure {
                error: AnalyzerError::Validation("unknown filter values".to_string()),
                details: Some(json!({
                    "unknown_tech_types": unknown_types,
                    "unknown_categories": unknown_categories,
                    "valid_tech_types": TechType::all_variants().iter().map(|t| t.as_str()).collect::<Vec<_>>(),
                    "valid_categories": Category::all_variants().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                })),
            });
        }

        let mut tech_types: Vec<TechType> =
            request.tech_types.iter().filter_map(|t| TechType::parse(t)).collect();
        tech_types.sort();
        tech_types.dedup();

        let mut categories: Vec<Category> =
            request.categories.iter().filter_map(|c| Category::parse(c)).collect();
        categories.sort();
        categories.dedup();

        Ok((tech_types, categories))
    }

    /// Registers a new technology, clears the result cache and saves state.
    pub async fn add_technology(&self, record: TechnologyRecord) -> OperationResult<bool> {
        let _persist = self.persist_lock.lock().await;
        let snapshot = {
            let mut registry = self.write_registry();
            let name = record.name.clone();
            if let Err(e) = registry.register(record) {
                return self.registry_failure(e);
            }
            info!(technology = %name, "Technology added");
            self.cache.clear();
            StateSnapshot::from_records(registry.records())
        };

        let state_persisted = self.persist(&snapshot).await;
        OperationResult::ok(true).with_metadata(ResultMetadata {
            state_persisted,
            ..Default::default()
        })
    }

    /// Removes a technology and its variations, clears the result cache and
    /// saves state.
    pub async fn remove_technology(&self, name: &str) -> OperationResult<bool> {
        let _persist = self.persist_lock.lock().await;
        let snapshot = {
            let mut registry = self.write_registry();
            match registry.remove(name) {
                Ok(removed) => info!(technology = %removed.name, "Technology removed"),
                Err(e) => return self.registry_failure(e),
            }
            self.cache.clear();
            StateSnapshot::from_records(registry.records())
        };

        let state_persisted = self.persist(&snapshot).await;
        OperationResult::ok(true).with_metadata(ResultMetadata {
            state_persisted,
            ..Default::default()
        })
    }

    fn registry_failure<T>(&self, error: RegistryError) -> OperationResult<T> {
        let error = AnalyzerError::from(error);
        debug!(error = %error, "Registry operation rejected");
        OperationResult::from_error(&error)
    }

    /// `None` without a store, otherwise whether the save succeeded.
    async fn persist(&self, snapshot: &StateSnapshot) -> Option<bool> {
        let store = self.store.as_ref()?;
        match store.save(snapshot).await {
            Ok(()) => Some(true),
            Err(e) => {
                let error = AnalyzerError::from(e);
                warn!(
                    store = %store.describe(),
                    error = %error,
                    error_type = %error.error_type(),
                    "Failed to save technology state"
                );
                Some(false)
            }
        }
    }

    /// Looks a technology up by canonical name or variation.
    pub fn get_technology(&self, name: &str) -> OperationResult<TechnologyRecord> {
        let registry = self.read_registry();
        if let Some(record) = registry.lookup(name) {
            return OperationResult::ok(record.clone());
        }

        let error = AnalyzerError::from(RegistryError::NotFound(name.to_string()));
        let mut info = ErrorInfo::from(&error);
        if let Some(closest) = registry.closest_name(name) {
            info = info
                .with_hint(format!("Did you mean '{}'?", closest))
                .with_details(json!({ "closest_match": closest }));
        }
        OperationResult::failure(info)
    }

    /// Other technologies sharing type and category with `name`.
    pub fn alternatives(&self, name: &str) -> OperationResult<Vec<TechnologyRecord>> {
        let registry = self.read_registry();
        match registry.lookup(name) {
            Some(record) => OperationResult::ok(registry.alternatives(record)),
            None => self.registry_failure(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Registered technologies matching `filter`, sorted by name.
    pub fn list_technologies(&self, filter: &TechnologyFilter) -> Vec<TechnologyRecord> {
        self.read_registry()
            .all()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// Technologies whose name or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> OperationResult<Vec<TechnologyRecord>> {
        if query.trim().is_empty() {
            let error = AnalyzerError::Validation("search query is required".to_string());
            return OperationResult::from_error(&error);
        }

        let found = self.read_registry().search(query);
        debug!(query, matches = found.len(), "Registry search complete");
        let count = found.len();
        OperationResult::ok(found).with_metadata(ResultMetadata {
            tech_count: Some(count),
            ..Default::default()
        })
    }

    pub fn categories(&self, tech_type: Option<TechType>) -> Vec<Category> {
        self.read_registry().categories(tech_type)
    }

    pub fn tech_types(&self) -> Vec<TechType> {
        self.read_registry().tech_types()
    }

    pub fn suggest_stack(&self, requirements: &StackRequirements) -> OperationResult<StackSuggestion> {
        if requirements.project_type.trim().is_empty() {
            let error = AnalyzerError::Validation("project type is required".to_string());
            return OperationResult::from_error(&error);
        }

        let suggestion = suggest_stack(&self.read_registry(), requirements);
        let picked: usize = suggestion.groups.values().map(Vec::len).sum();
        OperationResult::ok(suggestion).with_metadata(ResultMetadata {
            tech_count: Some(picked),
            ..Default::default()
        })
    }

    /// Pulls candidate records from `enricher` under the configured deadline
    /// and registers the ones not known yet.
    ///
    /// A failed or timed-out fetch leaves the registry untouched and is
    /// reported as a degraded summary, not an error.
    pub async fn refresh(&self, enricher: &dyn Enricher) -> OperationResult<RefreshSummary> {
        let source = enricher.source().to_string();
        let timeout = self.config.enrichment_timeout();

        let fetched = match tokio::time::timeout(timeout, enricher.fetch()).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => return self.degraded_refresh(source, e),
            Err(_) => {
                return self.degraded_refresh(source, EnrichmentError::Timeout(timeout.as_secs()))
            }
        };

        let fetched_count = fetched.len();
        let _persist = self.persist_lock.lock().await;
        let (added, snapshot) = {
            let mut registry = self.write_registry();
            let mut added = Vec::new();
            for record in fetched {
                if registry.contains(&record.name) {
                    continue;
                }
                let name = record.name.clone();
                match registry.register(record) {
                    Ok(()) => added.push(name),
                    Err(e) => debug!(technology = %name, error = %e, "Skipping fetched technology"),
                }
            }

            let snapshot = (!added.is_empty()).then(|| {
                self.cache.clear();
                StateSnapshot::from_records(registry.records())
            });
            (added, snapshot)
        };

        let mut metadata = ResultMetadata {
            tech_count: Some(added.len()),
            ..Default::default()
        };
        if let Some(snapshot) = snapshot {
            metadata.state_persisted = self.persist(&snapshot).await;
        }

        info!(
            source = %source,
            fetched = fetched_count,
            added = added.len(),
            "Registry refresh complete"
        );
        OperationResult::ok(RefreshSummary {
            source,
            fetched: fetched_count,
            added,
            degraded: false,
            reason: None,
        })
        .with_metadata(metadata)
    }

    fn degraded_refresh(&self, source: String, error: EnrichmentError) -> OperationResult<RefreshSummary> {
        warn!(source = %source, error = %error, "Enrichment failed, keeping current registry");
        OperationResult::ok(RefreshSummary {
            source,
            fetched: 0,
            added: Vec::new(),
            degraded: true,
            reason: Some(error.to_string()),
        })
        .with_metadata(ResultMetadata {
            tech_count: Some(0),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::state::MemoryStore;

    fn analyzer() -> TechAnalyzer {
        TechAnalyzer::new(StacklensConfig::builtin())
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::CacheLookup.to_string(), "CacheLookup");
        assert_eq!(Stage::StackAnalyze.to_string(), "StackAnalyze");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_oversized_input_is_validation_error() {
        let config = StacklensConfig {
            max_input_bytes: 8,
            ..StacklensConfig::builtin()
        };
        let analyzer = TechAnalyzer::new(config);
        let result = analyzer.analyze(&AnalysisRequest::new("react and python"));

        assert!(!result.success);
        let error = result.error.unwrap();
        assert_eq!(error.error_type, ErrorType::ValidationError);
        assert_eq!(error.details.unwrap()["max_input_bytes"], 8);
    }

    #[test]
    fn test_unknown_filter_is_validation_error() {
        let result = analyzer()
            .analyze(&AnalysisRequest::new("react").with_categories(&["frontend", "kitchen"]));

        assert!(!result.success);
        let details = result.error.unwrap().details.unwrap();
        assert_eq!(details["unknown_categories"][0], "kitchen");
    }

    #[test]
    fn test_cache_disabled_by_config() {
        let config = StacklensConfig {
            cache_enabled: false,
            ..StacklensConfig::builtin()
        };
        let analyzer = TechAnalyzer::new(config);
        let request = AnalysisRequest::new("django");

        assert!(!analyzer.analyze(&request).metadata.cache_hit);
        assert!(!analyzer.analyze(&request).metadata.cache_hit);
        assert_eq!(analyzer.cached_results(), 0);
    }

    #[test]
    fn test_code_comments_are_stripped() {
        let code = "import os;\n// TODO: migrate to django\nfn main() {\n    run();\n}\n";
        let result = analyzer().analyze(&AnalysisRequest::new(code));
        assert!(result.data.unwrap().identified_technologies.is_empty());

        let config = StacklensConfig {
            strip_code_comments: false,
            ..StacklensConfig::builtin()
        };
        let result = TechAnalyzer::new(config).analyze(&AnalysisRequest::new(code));
        assert_eq!(result.data.unwrap().names(), vec!["django"]);
    }

    #[test]
    fn test_get_technology_suggests_closest() {
        let result = analyzer().get_technology("djanga");
        assert!(!result.success);

        let error = result.error.unwrap();
        assert_eq!(error.error_type, ErrorType::TechnologyNotFoundError);
        assert_eq!(error.recovery_hint.as_deref(), Some("Did you mean 'django'?"));
    }

    #[test]
    fn test_suggest_requires_project_type() {
        let result = analyzer().suggest_stack(&StackRequirements::new("  "));
        assert_eq!(result.error.unwrap().error_type, ErrorType::ValidationError);
    }

    #[test]
    fn test_search() {
        let result = analyzer().search("Relational");
        assert!(result.success);
        assert_eq!(result.metadata.tech_count, Some(3));
        let names: Vec<String> = result.data.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["mysql", "postgresql", "sqlite"]);

        let empty = analyzer().search("   ");
        assert_eq!(empty.error.unwrap().error_type, ErrorType::ValidationError);
    }

    #[tokio::test]
    async fn test_search_sees_added_technology() {
        let analyzer = analyzer();
        assert!(analyzer.search("hypermedia").data.unwrap().is_empty());

        analyzer
            .add_technology(TechnologyRecord::new("htmx", TechType::Library, Category::Frontend, "Hypermedia over HTML"))
            .await;
        assert_eq!(analyzer.search("hypermedia").data.unwrap()[0].name, "htmx");
    }

    #[tokio::test]
    async fn test_open_skips_saved_record_shadowing_another_name() {
        let saved = vec![TechnologyRecord::new("nodejs", TechType::Platform, Category::Backend, "Shadow")];
        let store = MemoryStore::with_snapshot(StateSnapshot::from_records(&saved));
        let analyzer = TechAnalyzer::open(StacklensConfig::builtin(), Box::new(store)).await;

        let record = analyzer.get_technology("nodejs").data.unwrap();
        assert_eq!(record.name, "node.js");
        assert_ne!(record.description, "Shadow");
    }

    #[tokio::test]
    async fn test_open_restores_saved_records() {
        let saved = vec![
            TechnologyRecord::new("deno", TechType::Platform, Category::Backend, "JS runtime"),
            TechnologyRecord::new("react", TechType::Framework, Category::Frontend, "Saved copy"),
        ];
        let store = MemoryStore::with_snapshot(StateSnapshot::from_records(&saved));
        let analyzer = TechAnalyzer::open(StacklensConfig::builtin(), Box::new(store)).await;

        assert!(analyzer.get_technology("deno").success);
        assert_eq!(
            analyzer.get_technology("reactjs").data.unwrap().description,
            "Saved copy"
        );
    }

    #[tokio::test]
    async fn test_add_reports_persistence() {
        let analyzer = TechAnalyzer::open(StacklensConfig::builtin(), Box::new(MemoryStore::new())).await;
        let record = TechnologyRecord::new("htmx", TechType::Library, Category::Frontend, "HTML over the wire");

        let result = analyzer.add_technology(record).await;
        assert!(result.success);
        assert_eq!(result.metadata.state_persisted, Some(true));

        let duplicate = analyzer
            .add_technology(TechnologyRecord::new("HTMX", TechType::Library, Category::Frontend, ""))
            .await;
        assert_eq!(duplicate.error.unwrap().error_type, ErrorType::DuplicateTechnologyError);

        let without_store = self::analyzer()
            .add_technology(TechnologyRecord::new("htmx", TechType::Library, Category::Frontend, ""))
            .await;
        assert_eq!(without_store.metadata.state_persisted, None);
    }
}
