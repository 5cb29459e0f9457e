use serde_json::Value;

use crate::error::Result;
use crate::model::Task;
use crate::store::migration::{self, Migrated};
use crate::store::slot::Slot;

/// Key the task collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "smart-task-manager-tasks";

/// Reads and writes the whole task collection as one JSON array in a slot.
#[derive(Debug)]
pub struct Persistence<S: Slot> {
    slot: S,
    key: String,
}

impl<S: Slot> Persistence<S> {
    pub fn new(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn with_default_key(slot: S) -> Self {
        Self::new(slot, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        self.slot.write(&self.key, &json)
    }

    /// Raw array elements from the slot, ready for migration.
    ///
    /// Missing, unreadable, malformed, or non-array data all read as an
    /// empty collection.
    pub fn load(&self) -> Vec<Value> {
        let raw = match self.slot.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "could not read stored tasks");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                tracing::debug!(key = %self.key, "stored tasks are not an array; ignoring");
                Vec::new()
            }
            Err(err) => {
                tracing::debug!(key = %self.key, error = %err, "stored tasks are not valid JSON; ignoring");
                Vec::new()
            }
        }
    }

    /// Load, migrate, and write the result back if any record was upgraded.
    pub fn load_migrated(&mut self) -> Migrated {
        let migrated = migration::migrate(&self.load());
        if migrated.upgraded
            && let Err(err) = self.save(&migrated.tasks)
        {
            tracing::warn!(key = %self.key, error = %err, "could not persist migrated tasks");
        }
        migrated
    }
}
