//! Registry integration tests through the public API

use stacklens::stack::normalize_name;
use stacklens::{Category, RegistryError, TechType, TechnologyRecord, TechnologyRegistry};
use yare::parameterized;

#[parameterized(
    plain = { "python", "python" },
    mixed_case = { "PostgreSQL", "postgresql" },
    dotted = { "Node.js", "nodejs" },
    hyphenated = { "tailwind-css", "tailwind css" },
    underscored = { "github_actions", "github actions" },
    padded = { "  Spring   Boot  ", "spring boot" },
    punctuation_only = { "?!", "" },
    empty = { "", "" },
)]
fn test_normalize_name(input: &str, expected: &str) {
    assert_eq!(normalize_name(input), expected);
}

#[parameterized(
    canonical = { "tailwind" },
    joined = { "tailwindcss" },
    spaced = { "Tailwind CSS" },
    hyphenated = { "tailwind-css" },
)]
fn test_variations_resolve(name: &str) {
    let registry = TechnologyRegistry::with_defaults();
    assert_eq!(registry.lookup(name).map(|r| r.name.as_str()), Some("tailwind"));
}

#[test]
fn test_lookup_miss_is_none() {
    let registry = TechnologyRegistry::with_defaults();
    assert!(registry.lookup("").is_none());
    assert!(registry.lookup("cobol").is_none());
}

#[test]
fn test_snapshot_is_detached() {
    let mut registry = TechnologyRegistry::with_defaults();
    let mut snapshot = registry.all();
    snapshot.clear();

    assert!(!registry.is_empty());
    registry
        .register(TechnologyRecord::new(
            "zig",
            TechType::Language,
            Category::Backend,
            "Systems language",
        ))
        .unwrap();
    assert!(snapshot.is_empty());
}

#[test]
fn test_duplicate_canonical_name_is_rejected() {
    let mut registry = TechnologyRegistry::with_defaults();
    let err = registry
        .register(TechnologyRecord::new(
            "Django",
            TechType::Framework,
            Category::Backend,
            "Again",
        ))
        .unwrap_err();
    assert_eq!(err, RegistryError::Duplicate("Django".to_string()));
}

#[test]
fn test_core_categories_present() {
    let registry = TechnologyRegistry::with_defaults();
    let categories = registry.categories(None);
    for core in Category::CORE {
        assert!(categories.contains(&core));
    }
    assert_eq!(
        registry.categories(Some(TechType::Database)),
        vec![Category::Database]
    );
}
