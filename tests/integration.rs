use std::fs;

use chrono::Duration;
use serde_json::Value;
use tempfile::tempdir;

use stm::model::{Priority, parse_date};
use stm::projection::{Filter, project};
use stm::store::persistence::{DEFAULT_STORAGE_KEY, Persistence};
use stm::store::slot::{FileSlot, MemorySlot};
use stm::store::tasks::TaskStore;
use stm::suggestions;
use stm::workspace::Workspace;

fn file_store(dir: &std::path::Path) -> TaskStore<FileSlot> {
    TaskStore::open(Persistence::with_default_key(FileSlot::new(dir)))
}

#[test]
fn test_duplicate_add_survives_reload_with_same_id() {
    let dir = tempdir().unwrap();

    let mut store = file_store(dir.path());
    assert!(store.list().is_empty());

    assert!(store.add("Buy milk", None, Some(Priority::High)).is_changed());
    assert!(!store.add("Buy milk", None, Some(Priority::Low)).is_changed());

    assert_eq!(store.list().len(), 1);
    let added = store.list()[0].clone();
    assert_eq!(added.text, "Buy milk");
    assert_eq!(added.priority, Priority::High);

    let reloaded = file_store(dir.path());
    assert_eq!(reloaded.list().len(), 1);
    assert_eq!(reloaded.list()[0].id, added.id);
    assert_eq!(reloaded.list()[0], added);
}

#[test]
fn test_legacy_file_is_migrated_once_and_rewritten() {
    let dir = tempdir().unwrap();
    let slot_path = FileSlot::new(dir.path()).path_for(DEFAULT_STORAGE_KEY);
    fs::write(
        &slot_path,
        r#"[{"text":"Old one","completed":true},{"text":"Old two"}]"#,
    )
    .unwrap();

    let first = file_store(dir.path());
    assert_eq!(first.list().len(), 2);
    assert!(first.list().iter().all(|t| t.priority == Priority::Medium));
    assert!(first.list()[0].completed);

    // The rewritten slot now holds current-shape records.
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&slot_path).unwrap()).unwrap();
    let records = on_disk.as_array().unwrap();
    assert_eq!(records.len(), 2);
    for record in records {
        assert!(record["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert_eq!(record["priority"], "medium");
        assert!(record["dueDate"].is_null());
        assert!(record["createdAt"].is_string());
    }

    let before = fs::read_to_string(&slot_path).unwrap();
    let second = file_store(dir.path());
    assert_eq!(second.list(), first.list());
    assert_eq!(fs::read_to_string(&slot_path).unwrap(), before);
}

#[test]
fn test_corrupt_slot_starts_empty_and_recovers_on_next_save() {
    let dir = tempdir().unwrap();
    let slot_path = FileSlot::new(dir.path()).path_for(DEFAULT_STORAGE_KEY);
    fs::write(&slot_path, "{{{ definitely not json").unwrap();

    let mut store = file_store(dir.path());
    assert!(store.list().is_empty());

    store.add("Fresh start", None, None);
    let reloaded = file_store(dir.path());
    assert_eq!(reloaded.list().len(), 1);
    assert_eq!(reloaded.list()[0].text, "Fresh start");
}

#[test]
fn test_mixed_legacy_and_current_records_keep_order() {
    let slot = MemorySlot::new().with_entry(
        DEFAULT_STORAGE_KEY,
        r#"[
            {"id":"1700000000000-aa","text":"Current","completed":false,"priority":"high","dueDate":"2026-01-20","createdAt":"2026-01-19T08:30:00.000Z"},
            {"text":"Legacy","completed":false}
        ]"#,
    );
    let store = TaskStore::open(Persistence::with_default_key(slot));

    let texts: Vec<_> = store.list().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["Current", "Legacy"]);
    assert_eq!(store.list()[0].id.as_str(), "1700000000000-aa");
    assert_eq!(store.list()[0].priority, Priority::High);
}

#[test]
fn test_projection_over_a_live_store() {
    let mut store = TaskStore::open(Persistence::with_default_key(MemorySlot::new()));
    store.add("A", None, Some(Priority::High));
    store.add("B", None, Some(Priority::Low));
    store.add("C", None, Some(Priority::High));
    store.add("D", None, Some(Priority::Medium));
    let c = store.list()[2].id.clone();
    store.toggle_completed(&c);

    let today = parse_date("2026-03-10").unwrap();
    let order: Vec<_> = project(store.list(), Filter::All, today)
        .iter()
        .map(|e| e.task.text.clone())
        .collect();
    assert_eq!(order, ["A", "D", "B", "C"]);

    let stored: Vec<_> = store.list().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(stored, ["A", "B", "C", "D"]);
}

#[test]
fn test_today_and_overdue_follow_the_calendar() {
    let dir = tempdir().unwrap();
    let mut ws = Workspace::open(dir.path()).unwrap();
    let today = ws.today();
    let yesterday = today - Duration::days(1);

    ws.store.add("Due today", Some(today), None);
    ws.store.add("Was due yesterday", Some(yesterday), None);
    ws.store.add("Done yesterday", Some(yesterday), None);
    let done = ws.store.list()[2].id.clone();
    ws.store.toggle_completed(&done);

    let todays: Vec<_> = ws
        .view(Filter::Today)
        .iter()
        .map(|e| e.task.text.clone())
        .collect();
    assert_eq!(todays, ["Due today"]);

    let flags: Vec<_> = ws
        .view(Filter::All)
        .iter()
        .map(|e| (e.task.text.clone(), e.overdue))
        .collect();
    assert_eq!(
        flags,
        [
            ("Due today".to_string(), false),
            ("Was due yesterday".to_string(), true),
            ("Done yesterday".to_string(), false),
        ]
    );
}

#[test]
fn test_suggestions_persist_through_workspace() {
    let dir = tempdir().unwrap();
    {
        let mut ws = Workspace::open(dir.path()).unwrap();
        ws.store.add("Drink enough water", None, Some(Priority::Low));
        assert_eq!(suggestions::add_suggested(&mut ws.store).added, 2);
    }

    let ws = Workspace::open(dir.path()).unwrap();
    let texts: Vec<_> = ws.store.list().iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        ["Drink enough water", "Morning exercise", "Study for 1 hour"]
    );
}

#[test]
fn test_custom_storage_key_from_config() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(stm::config::CONFIG_FILE),
        r#"{"storage_key": "work-tasks"}"#,
    )
    .unwrap();

    let mut ws = Workspace::open(dir.path()).unwrap();
    ws.store.add("Ship it", None, None);

    assert!(dir.path().join("work-tasks.json").exists());
    assert!(
        !FileSlot::new(dir.path())
            .path_for(DEFAULT_STORAGE_KEY)
            .exists()
    );
}
