use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::suggestions;
use crate::workspace::Workspace;

pub fn run(data_dir: &Path, preview: bool, ideas: bool, format: Format) -> Result<()> {
    if ideas {
        return output::print_ideas(&suggestions::IDEAS, format);
    }

    let mut ws = Workspace::open(data_dir)?;
    if preview {
        return output::print_suggestions(&suggestions::preview(&ws.store), format);
    }

    let report = suggestions::add_suggested(&mut ws.store);
    if format != Format::Json {
        eprintln!("Added {} suggested task(s)", report.added);
    }
    output::print_mutation(report.added > 0, &ws.view(ws.config.default_filter), format)
}
