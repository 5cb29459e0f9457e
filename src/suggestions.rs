use serde::Serialize;

use crate::error::StmError;
use crate::model::Priority;
use crate::store::slot::Slot;
use crate::store::tasks::{Outcome, TaskStore};

pub const SUGGESTED: [&str; 3] = ["Morning exercise", "Study for 1 hour", "Drink enough water"];

/// Display-only ideas; never added to the store.
pub const IDEAS: [&str; 5] = [
    "Complete project documentation",
    "Fix bugs in the login module",
    "Refactor the task manager code",
    "Plan the next sprint",
    "Review pull requests",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: &'static str,
    pub present: bool,
}

/// Candidates in order, flagged when the store already has them.
pub fn preview<S: Slot>(store: &TaskStore<S>) -> Vec<Suggestion> {
    SUGGESTED
        .iter()
        .map(|&text| Suggestion {
            text,
            present: store.list().iter().any(|t| t.text == text),
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct SuggestReport {
    pub added: usize,
    /// Last save failure seen while adding.
    pub warning: Option<StmError>,
}

/// Add every candidate the store does not have yet.
pub fn add_suggested<S: Slot>(store: &mut TaskStore<S>) -> SuggestReport {
    let mut report = SuggestReport::default();
    for text in SUGGESTED {
        let outcome = store.add(text, None, Some(Priority::Medium));
        if outcome.is_changed() {
            report.added += 1;
        }
        if let Outcome::SaveFailed(err) = outcome {
            report.warning = Some(err);
        }
    }
    report
}
