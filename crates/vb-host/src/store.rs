//! Session persistence stores
//!
//! The bridge only produces restoration entries; where they live
//! between runs is the host's business, behind `SessionStore`.

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vb_core::RestorationEntry;

/// A timestamped snapshot of the open-widget session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub saved_at: DateTime<Utc>,
    pub entries: Vec<RestorationEntry>,
}

impl SessionSnapshot {
    /// Snapshot the given entries as of now
    pub fn new(entries: Vec<RestorationEntry>) -> Self {
        Self {
            saved_at: Utc::now(),
            entries,
        }
    }
}

/// External persistence surface for session snapshots
pub trait SessionStore: Send + Sync {
    /// Persist a snapshot, replacing any previous one
    fn save(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()>;

    /// Load the last persisted snapshot, if any
    fn load(&self) -> anyhow::Result<Option<SessionSnapshot>>;
}

/// Store keeping the snapshot in memory, for ephemeral hosts and tests
pub struct InMemorySessionStore {
    snapshot: Mutex<Option<SessionSnapshot>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(None),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> anyhow::Result<Option<SessionSnapshot>> {
        Ok(self.snapshot.lock().clone())
    }
}

/// Store persisting the snapshot as a JSON file
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for JsonFileSessionStore {
    fn save(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write session file {}", self.path.display()))?;
        debug!(path = %self.path.display(), entries = snapshot.entries.len(), "session saved");
        Ok(())
    }

    fn load(&self) -> anyhow::Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&json)
            .with_context(|| format!("malformed session file {}", self.path.display()))?;
        Ok(Some(snapshot))
    }
}
