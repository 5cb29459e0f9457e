use chrono::NaiveDate;

use crate::error::StmError;
use crate::model::{Priority, Task};
use crate::store::persistence::Persistence;
use crate::store::slot::Slot;
use crate::task_id::TaskId;

/// What a mutation did.
#[derive(Debug)]
pub enum Outcome {
    /// Rejected or nothing matched; state untouched.
    Unchanged,
    /// Applied and persisted.
    Saved,
    /// Applied in memory, but the save failed.
    SaveFailed(StmError),
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    pub fn warning(&self) -> Option<&StmError> {
        match self {
            Self::SaveFailed(err) => Some(err),
            _ => None,
        }
    }
}

type Listener = Box<dyn FnMut(&[Task])>;

/// Authoritative task collection, kept in insertion order.
///
/// Every successful mutation saves the whole collection and then notifies
/// subscribers, in that order.
pub struct TaskStore<S: Slot> {
    tasks: Vec<Task>,
    persistence: Persistence<S>,
    listeners: Vec<Listener>,
}

impl<S: Slot> TaskStore<S> {
    /// Hydrate from the slot, migrating (and re-saving) legacy data.
    pub fn open(mut persistence: Persistence<S>) -> Self {
        let tasks = persistence.load_migrated().tasks;
        Self {
            tasks,
            persistence,
            listeners: Vec::new(),
        }
    }

    /// Trimmed text must be non-empty and not already present.
    pub fn add(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        priority: Option<Priority>,
    ) -> Outcome {
        let text = text.trim();
        if text.is_empty() || self.tasks.iter().any(|t| t.text == text) {
            return Outcome::Unchanged;
        }

        self.tasks.push(Task::new(
            text.to_string(),
            due_date,
            priority.unwrap_or_default(),
        ));
        self.commit()
    }

    pub fn toggle_completed(&mut self, id: &TaskId) -> Outcome {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            return Outcome::Unchanged;
        };
        task.completed = !task.completed;
        self.commit()
    }

    pub fn remove(&mut self, id: &TaskId) -> Outcome {
        let Some(pos) = self.tasks.iter().position(|t| &t.id == id) else {
            return Outcome::Unchanged;
        };
        self.tasks.remove(pos);
        self.commit()
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Called with the collection after each successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Task]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    fn commit(&mut self) -> Outcome {
        let outcome = match self.persistence.save(&self.tasks) {
            Ok(()) => Outcome::Saved,
            Err(err) => {
                tracing::warn!(
                    key = %self.persistence.key(),
                    error = %err,
                    "could not save tasks; keeping in-memory state"
                );
                Outcome::SaveFailed(err)
            }
        };
        for listener in &mut self.listeners {
            listener(&self.tasks);
        }
        outcome
    }
}
