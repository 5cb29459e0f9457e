use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::projection::Filter;
use crate::workspace::Workspace;

pub fn run(data_dir: &Path, filter: Option<String>, format: Format) -> Result<()> {
    let ws = Workspace::open(data_dir)?;
    let filter = filter
        .as_deref()
        .map(Filter::parse_lenient)
        .unwrap_or(ws.config.default_filter);
    output::print_entries(&ws.view(filter), format)
}
