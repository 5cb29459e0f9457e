use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{Result, StmError};
use crate::store::lock::SlotLock;

/// A named key-value location that survives restarts.
pub trait Slot {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Slots stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.lock"))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Write through a uniquely named temp file and rename it into place
    /// while holding the slot lock, so readers never see a partial file.
    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let _lock = SlotLock::acquire(&self.lock_path_for(key))?;

        let staging = self.dir.join(format!(".{key}.{}.tmp", Uuid::new_v4()));
        fs::write(&staging, value)?;
        if let Err(err) = fs::rename(&staging, self.path_for(key)) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        Ok(())
    }
}

/// In-process slot, useful for embedding and tests.
#[derive(Debug, Clone)]
pub struct MemorySlot {
    entries: HashMap<String, String>,
    available: bool,
}

impl Default for MemorySlot {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with data written by an older version.
    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Simulate storage that rejects writes (quota exceeded, disabled storage).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.available {
            return Err(StmError::StorageUnavailable(format!(
                "slot '{key}' is not writable"
            )));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
