//! Upgrade stored task records to the current shape.
//!
//! Records that already carry an `id` are decoded leniently and kept as they
//! are. Anything else is treated as a pre-id legacy record (at most `text`
//! and `completed`) and rebuilt with a fresh id, medium priority, no due
//! date and the current time as its creation stamp.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::model::{Priority, Task, parse_date};
use crate::task_id::TaskId;

#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub tasks: Vec<Task>,
    /// True when at least one record was rebuilt or repaired and the
    /// collection should be written back.
    pub upgraded: bool,
}

pub fn migrate(raw: &[Value]) -> Migrated {
    let mut upgraded = false;
    let tasks = raw
        .iter()
        .map(|record| match current_id(record) {
            Some((id, fields)) => {
                let (task, repaired) = decode_current(id, fields);
                upgraded |= repaired;
                task
            }
            None => {
                upgraded = true;
                rebuild_legacy(record)
            }
        })
        .collect();

    if upgraded {
        tracing::debug!("migrated legacy task records");
    }
    Migrated { tasks, upgraded }
}

/// The record's id, if it is an object whose `id` is truthy.
fn current_id(record: &Value) -> Option<(TaskId, &Map<String, Value>)> {
    let fields = record.as_object()?;
    let id = fields.get("id").filter(|id| is_truthy(id))?;
    let id = match id {
        Value::String(s) => TaskId::from_stored(s.clone()),
        other => TaskId::from_stored(other.to_string()),
    };
    Some((id, fields))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn decode_current(id: TaskId, fields: &Map<String, Value>) -> (Task, bool) {
    let (created_at, repaired) = match fields.get("createdAt").and_then(decode_timestamp) {
        Some(ts) => (ts, false),
        None => (Utc::now(), true),
    };

    let task = Task {
        id,
        text: text_field(fields),
        completed: completed_field(fields),
        priority: fields
            .get("priority")
            .and_then(Value::as_str)
            .map(Priority::from_label)
            .unwrap_or_default(),
        due_date: fields
            .get("dueDate")
            .and_then(Value::as_str)
            .and_then(parse_date),
        created_at,
    };
    (task, repaired)
}

fn rebuild_legacy(record: &Value) -> Task {
    let fields = record.as_object();
    Task {
        id: TaskId::generate(),
        text: fields.map(legacy_text).unwrap_or_default(),
        completed: fields.is_some_and(completed_field),
        priority: Priority::Medium,
        due_date: None,
        created_at: Utc::now(),
    }
}

fn text_field(fields: &Map<String, Value>) -> String {
    fields
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Legacy writers kept any truthy `text`; scalars other than strings are
/// stringified.
fn legacy_text(fields: &Map<String, Value>) -> String {
    match fields.get("text") {
        Some(Value::String(s)) => s.clone(),
        Some(value @ (Value::Number(_) | Value::Bool(_))) if is_truthy(value) => value.to_string(),
        _ => String::new(),
    }
}

fn completed_field(fields: &Map<String, Value>) -> bool {
    fields
        .get("completed")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// RFC 3339 strings, or epoch milliseconds as written by some older builds.
///
/// Only four-digit years are kept; anything else would not read back as
/// RFC 3339 once saved.
fn decode_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let ts = match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }?;
    (0..=9999).contains(&ts.year()).then_some(ts)
}
