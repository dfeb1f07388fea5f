//! Best-effort persistence of the technology registry.
//!
//! A snapshot holds every registered record. It is read once when the
//! analyzer opens and written after each registry mutation. Failures on
//! either side are logged by the caller and never abort an operation.

use crate::stack::TechnologyRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Distinguishes temp files of overlapping saves within one process.
static SAVE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to load state from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Failed to save state to {path}: {reason}")]
    Save { path: String, reason: String },

    #[error("State I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub technologies: BTreeMap<String, TechnologyRecord>,
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

impl StateSnapshot {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TechnologyRecord>,
    {
        Self {
            technologies: records
                .into_iter()
                .map(|r| (r.key(), r.clone()))
                .collect(),
            last_updated: Utc::now(),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }
}

#[async_trait]
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<StateSnapshot>, StateError>;

    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), StateError>;

    fn describe(&self) -> String;
}

/// Pretty-printed JSON file, replaced atomically on save.
///
/// Each save writes its own temp file next to the target and renames it into
/// place, so overlapping saves never share a temp path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let sequence = SAVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{}.tmp", std::process::id(), sequence));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<StateSnapshot>, StateError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved state");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StateError::Load {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }

    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), StateError> {
        let save_error = |reason: String| StateError::Save {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| save_error(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| save_error(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(save_error(e.to_string()));
        }

        debug!(
            path = %self.path.display(),
            technologies = snapshot.technologies.len(),
            "State saved"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<StateSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StateSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Option<StateSnapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Option<StateSnapshot>, StateError> {
        Ok(self.snapshot())
    }

    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), StateError> {
        *self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
