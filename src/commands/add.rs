use std::path::Path;

use crate::error::{Result, StmError};
use crate::model::{Priority, parse_date};
use crate::output::{self, Format};
use crate::workspace::Workspace;

pub fn run(
    data_dir: &Path,
    text: String,
    due: Option<String>,
    priority: Option<Priority>,
    format: Format,
) -> Result<()> {
    // An empty --due means "no date", like a cleared date picker.
    let due_date = match due.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_date(raw).ok_or_else(|| StmError::InvalidDate(raw.to_string()))?),
    };

    let mut ws = Workspace::open(data_dir)?;
    let outcome = ws.store.add(&text, due_date, priority);
    output::print_mutation(outcome.is_changed(), &ws.view(ws.config.default_filter), format)
}
