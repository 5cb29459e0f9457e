use std::fmt::Write as _;

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::error::Result;
use crate::model::{DATE_FORMAT, Priority, Task};
use crate::projection::Entry;
use crate::suggestions::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

#[derive(Serialize)]
struct EntryJson<'a> {
    #[serde(flatten)]
    task: &'a Task,
    overdue: bool,
}

fn entries_json<'a>(entries: &'a [Entry<'a>]) -> Vec<EntryJson<'a>> {
    entries
        .iter()
        .map(|e| EntryJson {
            task: e.task,
            overdue: e.overdue,
        })
        .collect()
}

pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let truncated: String = text.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn priority_badge(priority: Priority) -> String {
    let label = priority.label();
    match priority {
        Priority::High => label.red().to_string(),
        Priority::Medium => label.yellow().to_string(),
        Priority::Low => label.green().to_string(),
    }
}

fn pretty_line(out: &mut String, entry: &Entry<'_>) {
    let task = entry.task;
    let check = if task.completed { "[x]" } else { "[ ]" };
    let text = if task.completed {
        task.text.dimmed().strikethrough().to_string()
    } else {
        task.text.clone()
    };
    let _ = write!(out, "{check} {text}  {}", priority_badge(task.priority));
    if let Some(due) = task.due_date {
        let _ = write!(out, "  (due {})", due.format(DATE_FORMAT));
    }
    if entry.overdue {
        let _ = write!(out, "  {}", "OVERDUE".red().bold());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "    id: {}", task.id);
}

fn minimal_header(out: &mut String) {
    let _ = writeln!(
        out,
        "{:4} {:24} {:6} {:10} ID",
        "DONE", "TEXT", "PRI", "DUE"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));
}

fn minimal_line(out: &mut String, entry: &Entry<'_>) {
    let task = entry.task;
    let done = if task.completed { "x" } else { "-" };
    let due = task
        .due_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    let due = if entry.overdue { format!("{due}!") } else { due };
    let _ = writeln!(
        out,
        "{:4} {:24} {:6} {:10} {}",
        done,
        truncate_text(&task.text, 24),
        task.priority,
        due,
        task.id
    );
}

pub fn render_entries(entries: &[Entry<'_>], format: Format) -> Result<String> {
    let mut out = String::new();
    match format {
        Format::Json => {
            out.push_str(&serde_json::to_string(&entries_json(entries))?);
            out.push('\n');
        }
        Format::Pretty => {
            if entries.is_empty() {
                out.push_str("No tasks.\n");
            }
            for entry in entries {
                pretty_line(&mut out, entry);
            }
        }
        Format::Minimal => {
            minimal_header(&mut out);
            for entry in entries {
                minimal_line(&mut out, entry);
            }
        }
    }
    Ok(out)
}

/// Result of a mutating command followed by the refreshed view.
pub fn render_mutation(changed: bool, entries: &[Entry<'_>], format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let body = serde_json::json!({
                "changed": changed,
                "tasks": entries_json(entries),
            });
            Ok(format!("{}\n", serde_json::to_string(&body)?))
        }
        Format::Pretty | Format::Minimal => {
            let mut out = String::new();
            if !changed {
                out.push_str("(no change)\n");
            }
            out.push_str(&render_entries(entries, format)?);
            Ok(out)
        }
    }
}

pub fn render_suggestions(suggestions: &[Suggestion], format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(format!("{}\n", serde_json::to_string(suggestions)?)),
        Format::Pretty | Format::Minimal => {
            let mut out = String::new();
            for suggestion in suggestions {
                let marker = if suggestion.present { "(added)" } else { "" };
                let _ = writeln!(out, "- {} {}", suggestion.text, marker);
            }
            Ok(out)
        }
    }
}

pub fn render_ideas(ideas: &[&str], format: Format) -> Result<String> {
    match format {
        Format::Json => Ok(format!("{}\n", serde_json::to_string(ideas)?)),
        Format::Pretty | Format::Minimal => {
            Ok(ideas.iter().map(|idea| format!("{idea}\n")).collect())
        }
    }
}

pub fn print_entries(entries: &[Entry<'_>], format: Format) -> Result<()> {
    print!("{}", render_entries(entries, format)?);
    Ok(())
}

pub fn print_mutation(changed: bool, entries: &[Entry<'_>], format: Format) -> Result<()> {
    print!("{}", render_mutation(changed, entries, format)?);
    Ok(())
}

pub fn print_suggestions(suggestions: &[Suggestion], format: Format) -> Result<()> {
    print!("{}", render_suggestions(suggestions, format)?);
    Ok(())
}

pub fn print_ideas(ideas: &[&str], format: Format) -> Result<()> {
    print!("{}", render_ideas(ideas, format)?);
    Ok(())
}
