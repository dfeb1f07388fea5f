//! In-memory result cache bounded by entry count and age.
//!
//! Expiry is lazy: a stale entry is dropped when it is read. When an insert
//! pushes the cache past its maximum size, the oldest-inserted entry goes,
//! regardless of how recently it was read.

use crate::stack::{Category, TechType};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::trace;

/// Deterministic key over raw text, context and sorted filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Text and context are length-prefixed so no choice of content can
    /// collide with another split of the same bytes. Filters are sorted and
    /// deduplicated, making `[a, b]` and `[b, a]` the same key.
    pub fn new(text: &str, context: &str, tech_types: &[TechType], categories: &[Category]) -> Self {
        let mut types: Vec<&str> = tech_types.iter().map(|t| t.as_str()).collect();
        types.sort_unstable();
        types.dedup();

        let mut cats: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        cats.sort_unstable();
        cats.dedup();

        Self(format!(
            "{}:{}|{}:{}|{}|{}",
            text.len(),
            text,
            context.len(),
            context,
            types.join(","),
            cats.join(",")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct Entry<V> {
    value: V,
    created_at: Instant,
}

struct CacheState<V> {
    entries: HashMap<CacheKey, Entry<V>>,
    order: VecDeque<CacheKey>,
}

impl<V> CacheState<V> {
    fn forget(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

pub struct ResultCache<V> {
    state: Mutex<CacheState<V>>,
    ttl: Duration,
    max_size: usize,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            ttl,
            max_size: max_size.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let mut state = self.lock();
        let expired = match state.entries.get(key) {
            None => return None,
            Some(entry) => entry.created_at.elapsed() > self.ttl,
        };

        if expired {
            trace!(key = key.as_str(), "Evicting expired cache entry");
            state.forget(key);
            return None;
        }

        state.entries.get(key).map(|e| e.value.clone())
    }

    pub fn set(&self, key: CacheKey, value: V) {
        let mut state = self.lock();

        if state.entries.contains_key(&key) {
            state.order.retain(|k| *k != key);
        }
        state.order.push_back(key.clone());
        state.entries.insert(
            key,
            Entry {
                value,
                created_at: Instant::now(),
            },
        );

        while state.entries.len() > self.max_size {
            match state.order.pop_front() {
                Some(oldest) => {
                    trace!(key = oldest.as_str(), "Evicting oldest cache entry");
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
