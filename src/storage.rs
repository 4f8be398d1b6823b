//! Key-value persistence port
//!
//! All persisted state (profile, saved agents, session index) goes through
//! the `Storage` trait as JSON blobs under fixed keys, so the core logic is
//! storage-agnostic and testable without a browser or filesystem.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::{ProboticsError, Result};

/// Fixed storage keys, one JSON blob each.
pub mod keys {
    pub const USER_PROFILE: &str = "probotics_user_profile_v1";
    pub const SAVED_AGENTS: &str = "probotics_saved_agents_v1";
    pub const SESSIONS: &str = "probotics_sessions_v1";
    pub const LAST_SESSION: &str = "probotics_last_session_v1";
}

/// Flat key-value persistence over string keys and JSON-serialized values.
pub trait Storage: Send + Sync {
    /// Read the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the blob under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// List all stored keys.
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

/// One JSON file per key under a data directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Open storage under the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| ProboticsError::StorageError("no data directory available".into()))?;
        Self::new(base.join("probotics"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers; sanitize anyway so arbitrary keys
        // cannot escape the root.
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(stem) = name.strip_suffix(".json") {
                keys.push(stem.to_string());
            }
        }
        Ok(keys)
    }
}
