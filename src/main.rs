use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stm::error::Result;
use stm::model::Priority;
use stm::output::Format;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "stm", version, about = "Smart task manager with local persistence")]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    /// Directory holding the task slot and config.json
    #[arg(long, global = true, env = "STM_DIR")]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task (ignored if blank or already present)
    Add {
        /// Task text
        text: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Task priority
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },
    /// Flip a task between open and completed
    Toggle {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task ID (or unique prefix)
        id: String,
    },
    /// Show tasks, open first and by priority
    List {
        /// all, completed, pending, high, or today (anything else shows all)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Add the built-in suggested tasks
    Suggest {
        /// Only list the suggestions and whether each is already present
        #[arg(long)]
        preview: bool,
        /// Show task ideas without touching the list
        #[arg(long, conflicts_with = "preview")]
        ideas: bool,
    },
}

fn init_tracing() {
    // STM_LOG follows EnvFilter syntax; empty or invalid values fall back to warn.
    let filter = std::env::var("STM_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: Cli, format: Format) -> Result<()> {
    let data_dir = stm::config::resolve_data_dir(cli.dir)?;

    match cli.command {
        Commands::Add {
            text,
            due,
            priority,
        } => stm::commands::add::run(&data_dir, text, due, priority, format),
        Commands::Toggle { id } => stm::commands::toggle::run(&data_dir, id, format),
        Commands::Delete { id } => stm::commands::delete::run(&data_dir, id, format),
        Commands::List { filter } => stm::commands::list::run(&data_dir, filter, format),
        Commands::Suggest { preview, ideas } => {
            stm::commands::suggest::run(&data_dir, preview, ideas, format)
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
