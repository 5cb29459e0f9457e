//! Filtered, ordered view of the task collection for display.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Priority, Task};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
    High,
    Today,
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::All,
        Filter::Completed,
        Filter::Pending,
        Filter::High,
        Filter::Today,
    ];

    /// Exact names only; anything else selects everything.
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "all" => Self::All,
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            "high" => Self::High,
            "today" => Self::Today,
            other => {
                tracing::debug!(filter = other, "unknown filter; showing all tasks");
                Self::All
            }
        }
    }

    pub fn matches(self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Pending => !task.completed,
            Self::High => task.priority == Priority::High,
            Self::Today => task.due_date == Some(today),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::High => "high",
            Self::Today => "today",
        }
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One displayed task plus its render-time annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<'a> {
    pub task: &'a Task,
    pub overdue: bool,
}

/// Tasks passing `filter`, open before completed, then by priority rank.
/// The sort is stable, so ties keep insertion order.
pub fn project(tasks: &[Task], filter: Filter, today: NaiveDate) -> Vec<Entry<'_>> {
    let mut view: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t, today)).collect();
    view.sort_by_key(|t| (t.completed, t.priority.rank()));
    view.into_iter()
        .map(|task| Entry {
            task,
            overdue: task.is_overdue(today),
        })
        .collect()
}
