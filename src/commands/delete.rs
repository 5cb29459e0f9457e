use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::workspace::Workspace;

pub fn run(data_dir: &Path, id: String, format: Format) -> Result<()> {
    let mut ws = Workspace::open(data_dir)?;
    let id = ws.resolve_task_id(&id)?;
    let outcome = ws.store.remove(&id);
    output::print_mutation(outcome.is_changed(), &ws.view(ws.config.default_filter), format)
}
