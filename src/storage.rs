//! Durable key-value storage
//!
//! One value per key: `debug_log_<session>` holds the persisted entry
//! array, `debug_logger_config` holds the serialized configuration. The
//! file store maps each key to one file named after it inside a root
//! directory; the memory store backs tests and ephemeral sessions.

use crate::error::{LogError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Durable string storage keyed by name
pub trait KeyValueStore: Send {
    /// Read a value; `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// All stored keys, in unspecified order
    fn keys(&self) -> Vec<String>;
}

// =============================================================================
// File store
// =============================================================================

/// Directory-backed store; each key is one file
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| LogError::StorageDir {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value).map_err(|e| LogError::StorageWrite {
            key: key.to_string(),
            source: e,
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LogError::StorageRemove {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn keys(&self) -> Vec<String> {
        fs::read_dir(&self.root)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .collect()
    }
}

// =============================================================================
// Memory store
// =============================================================================

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
