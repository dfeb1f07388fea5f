use super::seed::{seed_records, VARIATIONS};
use super::{Category, TechType, TechnologyRecord};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::{debug, warn};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Technology '{0}' is already registered")]
    Duplicate(String),

    #[error("Technology '{0}' not found")]
    NotFound(String),

    #[error("Invalid technology record: {0}")]
    InvalidRecord(String),
}

/// Reduces a technology name to its lookup key.
///
/// Lowercases, keeps ASCII letters and digits, turns runs of whitespace,
/// hyphens and underscores into a single space, and drops every other
/// character. `"Node.js"`, `"nodejs"` and `" NODEJS "` share the key
/// `"nodejs"`; `"Semantic-UI"` becomes `"semantic ui"`.
pub fn normalize_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push(' ');
            }
            pending_separator = false;
            key.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }

    key
}

/// Canonical technologies plus the variation index used for lookups.
#[derive(Debug, Clone, Default)]
pub struct TechnologyRegistry {
    records: HashMap<String, TechnologyRecord>,
    /// Normalized name or variation -> record key.
    index: HashMap<String, String>,
}

impl TechnologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated from the built-in catalog and variation table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for record in seed_records() {
            if let Err(e) = registry.register(record) {
                warn!(error = %e, "Skipping seed record");
            }
        }

        for (variation, canonical) in VARIATIONS {
            if let Err(e) = registry.register_variation(variation, canonical) {
                warn!(variation, canonical, error = %e, "Skipping seed variation");
            }
        }

        debug!(
            technologies = registry.records.len(),
            names = registry.index.len(),
            "Technology registry initialized"
        );
        registry
    }

    pub fn register(&mut self, record: TechnologyRecord) -> Result<(), RegistryError> {
        let key = record.key();
        let name_key = normalize_name(&record.name);

        if name_key.is_empty() {
            return Err(RegistryError::InvalidRecord(format!(
                "name '{}' has no letters or digits",
                record.name
            )));
        }
        if self.records.contains_key(&key) || self.index.contains_key(&name_key) {
            return Err(RegistryError::Duplicate(record.name));
        }

        self.index.insert(name_key, key.clone());
        self.records.insert(key, record);
        Ok(())
    }

    /// Inserts or replaces a record, taking over its name key if a
    /// variation of another record held it.
    ///
    /// Fails with `Duplicate` when the name key is the canonical name of a
    /// different record, e.g. `nodejs` against `node.js`.
    pub fn upsert(&mut self, record: TechnologyRecord) -> Result<(), RegistryError> {
        let key = record.key();
        let name_key = normalize_name(&record.name);

        if name_key.is_empty() {
            return Err(RegistryError::InvalidRecord(format!(
                "name '{}' has no letters or digits",
                record.name
            )));
        }

        let held_by_other = self
            .index
            .get(&name_key)
            .filter(|holder| **holder != key)
            .and_then(|holder| self.records.get(holder))
            .is_some_and(|holder| normalize_name(&holder.name) == name_key);
        if held_by_other {
            return Err(RegistryError::Duplicate(record.name));
        }

        self.index.insert(name_key, key.clone());
        self.records.insert(key, record);
        Ok(())
    }

    pub fn register_variation(
        &mut self,
        variation: &str,
        canonical: &str,
    ) -> Result<(), RegistryError> {
        let target = canonical.trim().to_lowercase();
        if !self.records.contains_key(&target) {
            return Err(RegistryError::NotFound(canonical.to_string()));
        }

        let name_key = normalize_name(variation);
        if name_key.is_empty() {
            return Err(RegistryError::InvalidRecord(format!(
                "variation '{}' has no letters or digits",
                variation
            )));
        }

        match self.index.get(&name_key) {
            Some(existing) if *existing == target => Ok(()),
            Some(_) => Err(RegistryError::Duplicate(variation.to_string())),
            None => {
                self.index.insert(name_key, target);
                Ok(())
            }
        }
    }

    /// Resolves a canonical name or any registered variation. Never fails;
    /// absence is `None`.
    pub fn lookup(&self, name: &str) -> Option<&TechnologyRecord> {
        self.lookup_normalized(&normalize_name(name))
    }

    /// Lookup for a string that is already a name key.
    pub fn lookup_normalized(&self, name_key: &str) -> Option<&TechnologyRecord> {
        self.index
            .get(name_key)
            .and_then(|key| self.records.get(key))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Snapshot of every record, sorted by canonical name.
    pub fn all(&self) -> Vec<TechnologyRecord> {
        let mut records: Vec<TechnologyRecord> = self.records.values().cloned().collect();
        records.sort_by_key(|r| r.key());
        records
    }

    pub fn records(&self) -> impl Iterator<Item = &TechnologyRecord> {
        self.records.values()
    }

    /// Removes a record and every variation that resolved to it.
    pub fn remove(&mut self, name: &str) -> Result<TechnologyRecord, RegistryError> {
        let key = self
            .lookup(name)
            .map(|r| r.key())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        self.index.retain(|_, target| *target != key);
        self.records
            .remove(&key)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Records whose name or description contains `query`, ignoring case,
    /// sorted by name.
    pub fn search(&self, query: &str) -> Vec<TechnologyRecord> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<TechnologyRecord> = self
            .records
            .values()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        found.sort_by_key(|r| r.key());
        found
    }

    /// Other technologies with the same type and category, sorted by name.
    pub fn alternatives(&self, record: &TechnologyRecord) -> Vec<TechnologyRecord> {
        let key = record.key();
        let mut alternatives: Vec<TechnologyRecord> = self
            .records
            .values()
            .filter(|r| {
                r.key() != key && r.tech_type == record.tech_type && r.category == record.category
            })
            .cloned()
            .collect();
        alternatives.sort_by_key(|r| r.key());
        alternatives
    }

    pub fn categories(&self, tech_type: Option<TechType>) -> Vec<Category> {
        self.records
            .values()
            .filter(|r| tech_type.map_or(true, |t| r.tech_type == t))
            .map(|r| r.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn tech_types(&self) -> Vec<TechType> {
        self.records
            .values()
            .map(|r| r.tech_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Word count of the longest registered name or variation.
    pub fn max_name_words(&self) -> usize {
        self.index
            .keys()
            .map(|k| k.split(' ').count())
            .max()
            .unwrap_or(0)
    }

    /// Closest registered canonical name to `name`, if similar enough.
    pub fn closest_name(&self, name: &str) -> Option<String> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }

        self.index
            .iter()
            .map(|(candidate, key)| (strsim::jaro_winkler(&wanted, candidate), key))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .and_then(|(_, key)| self.records.get(key))
            .map(|r| r.name.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
