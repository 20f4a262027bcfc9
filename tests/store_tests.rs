// Integration tests for the event/folder store
//
// These tests verify time-window filtering, folder cascade semantics, and
// write-through persistence against the key-value storage.

use chrono::{DateTime, Local, TimeZone, Utc};
use meeting_notes::error::NotesError;
use meeting_notes::store::{
    JsonFileStorage, MemoryStorage, NewEvent, NoteStore, Storage, TimeWindow, EVENTS_KEY,
    FOLDERS_KEY,
};

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    local(y, mo, d, h, mi).with_timezone(&Utc)
}

fn new_event(title: &str, date: DateTime<Utc>) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        location: "Office".to_string(),
        date,
    }
}

fn memory_store() -> (NoteStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = NoteStore::open(Box::new(storage.clone())).unwrap();
    (store, storage)
}

#[test]
fn test_month_view_is_sorted_subset_of_current_month() {
    let (mut store, _) = memory_store();
    let now = local(2026, 8, 15, 12, 0);

    // Insert out of date order, spanning three months
    store.add_event(new_event("Late", utc(2026, 8, 20, 9, 0))).unwrap();
    store.add_event(new_event("Early", utc(2026, 8, 3, 9, 0))).unwrap();
    store.add_event(new_event("July", utc(2026, 7, 30, 9, 0))).unwrap();
    store.add_event(new_event("September", utc(2026, 9, 1, 9, 0))).unwrap();
    store.add_event(new_event("Mid", utc(2026, 8, 10, 9, 0))).unwrap();

    let month = store.list(Some(TimeWindow::Month), None, now);

    let titles: Vec<&str> = month.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Early", "Mid", "Late"]);

    // Sorted ascending by date-time
    for pair in month.windows(2) {
        assert!(pair[0].date <= pair[1].date);
    }
}

#[test]
fn test_today_matches_calendar_day_but_week_uses_datetime() {
    let (mut store, _) = memory_store();
    let now = local(2026, 8, 15, 12, 0);

    // Same day but earlier than now: in today's view, outside the week
    // window (which starts at today's midnight and compares raw date-times)
    store
        .add_event(new_event("This morning", utc(2026, 8, 15, 8, 0)))
        .unwrap();
    store
        .add_event(new_event("Yesterday", utc(2026, 8, 14, 23, 0)))
        .unwrap();
    store
        .add_event(new_event("Next week edge", utc(2026, 8, 21, 23, 59)))
        .unwrap();
    store
        .add_event(new_event("Past the week", utc(2026, 8, 22, 0, 0)))
        .unwrap();

    let today = store.list(Some(TimeWindow::Today), None, now);
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].title, "This morning");

    let week = store.list(Some(TimeWindow::Week), None, now);
    let titles: Vec<&str> = week.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["This morning", "Next week edge"]);
}

#[test]
fn test_folder_filter_and_null_means_no_filter() {
    let (mut store, _) = memory_store();
    let now = local(2026, 8, 15, 12, 0);

    let tagged = store.add_event(new_event("Tagged", utc(2026, 8, 16, 9, 0))).unwrap();
    store.add_event(new_event("Untagged", utc(2026, 8, 17, 9, 0))).unwrap();

    let folder = store.add_folder("Work", Some("💼".to_string())).unwrap();
    store.toggle_event_folder(tagged.id, folder.id).unwrap();

    let filtered = store.list(None, Some(folder.id), now);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title, "Tagged");

    let all = store.list(None, None, now);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_delete_folder_cascades_into_events_only() {
    let (mut store, _) = memory_store();

    let a = store.add_event(new_event("A", utc(2026, 8, 1, 9, 0))).unwrap();
    let b = store.add_event(new_event("B", utc(2026, 8, 2, 9, 0))).unwrap();

    let work = store.add_folder("Work", None).unwrap();
    let home = store.add_folder("Home", Some("🏠".to_string())).unwrap();

    store.toggle_event_folder(a.id, work.id).unwrap();
    store.toggle_event_folder(a.id, home.id).unwrap();
    store.toggle_event_folder(b.id, work.id).unwrap();

    assert!(store.delete_folder(work.id).unwrap());

    // The folder is gone; the id is gone from every event; nothing else moved
    assert!(store.folder(work.id).is_none());
    assert_eq!(store.folders().len(), 1);

    let a_after = store.event(a.id).unwrap();
    assert_eq!(a_after.folder_ids, vec![home.id]);
    assert_eq!(a_after.title, "A");

    let b_after = store.event(b.id).unwrap();
    assert!(b_after.folder_ids.is_empty());
    assert_eq!(store.events().len(), 2);
}

#[test]
fn test_toggle_membership_adds_then_removes() {
    let (mut store, _) = memory_store();

    let event = store.add_event(new_event("A", utc(2026, 8, 1, 9, 0))).unwrap();
    let folder = store.add_folder("Ideas", Some("💡".to_string())).unwrap();

    assert!(store.toggle_event_folder(event.id, folder.id).unwrap());
    assert_eq!(store.event(event.id).unwrap().folder_ids, vec![folder.id]);

    assert!(!store.toggle_event_folder(event.id, folder.id).unwrap());
    assert!(store.event(event.id).unwrap().folder_ids.is_empty());
}

#[test]
fn test_toggle_unknown_ids_are_not_found() {
    let (mut store, _) = memory_store();
    let event = store.add_event(new_event("A", utc(2026, 8, 1, 9, 0))).unwrap();

    assert!(matches!(
        store.toggle_event_folder(event.id, 999),
        Err(NotesError::NotFound { .. })
    ));
    assert!(matches!(
        store.toggle_event_folder(999, event.id),
        Err(NotesError::NotFound { .. })
    ));
}

#[test]
fn test_validation_rejects_bad_input_without_state_change() {
    let (mut store, storage) = memory_store();

    let blank_title = NewEvent {
        title: "   ".to_string(),
        location: "Office".to_string(),
        date: Utc::now(),
    };
    assert!(matches!(
        store.add_event(blank_title),
        Err(NotesError::Validation(_))
    ));

    let long_title = NewEvent {
        title: "x".repeat(101),
        location: "Office".to_string(),
        date: Utc::now(),
    };
    assert!(matches!(
        store.add_event(long_title),
        Err(NotesError::Validation(_))
    ));

    assert!(matches!(
        store.add_folder(&"y".repeat(51), None),
        Err(NotesError::Validation(_))
    ));

    assert!(store.events().is_empty());
    assert_eq!(storage.get(EVENTS_KEY).unwrap(), None);
}

#[test]
fn test_folder_icon_defaults_when_missing() {
    let (mut store, _) = memory_store();

    let folder = store.add_folder("Inbox", None).unwrap();
    assert_eq!(folder.icon, "📁");

    let tagged = store.add_folder("Goals", Some("🎯".to_string())).unwrap();
    assert_eq!(tagged.icon, "🎯");
}

#[test]
fn test_delete_event_is_silent_on_unknown_id() {
    let (mut store, _) = memory_store();
    assert!(!store.delete_event(12345).unwrap());
}

#[test]
fn test_mutations_write_through_to_storage() {
    let (mut store, storage) = memory_store();

    let event = store.add_event(new_event("Persisted", utc(2026, 8, 1, 9, 0))).unwrap();
    let folder = store.add_folder("Work", None).unwrap();
    store.toggle_event_folder(event.id, folder.id).unwrap();

    let events_json = storage.get(EVENTS_KEY).unwrap().unwrap();
    assert_eq!(events_json[0]["title"], "Persisted");
    assert_eq!(events_json[0]["folderIds"][0], folder.id);

    let folders_json = storage.get(FOLDERS_KEY).unwrap().unwrap();
    assert_eq!(folders_json[0]["name"], "Work");

    store.delete_folder(folder.id).unwrap();
    let events_json = storage.get(EVENTS_KEY).unwrap().unwrap();
    assert!(events_json[0]["folderIds"].as_array().unwrap().is_empty());
}

#[test]
fn test_collections_survive_reopen_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let (event_id, folder_id) = {
        let storage = JsonFileStorage::open(&path).unwrap();
        let mut store = NoteStore::open(Box::new(storage)).unwrap();

        let event = store.add_event(new_event("Kept", utc(2026, 8, 1, 9, 0))).unwrap();
        let folder = store.add_folder("Archive", Some("⭐".to_string())).unwrap();
        store.toggle_event_folder(event.id, folder.id).unwrap();
        store.set_transcription(event.id, "[09:00:00]\nnotes".to_string()).unwrap();

        (event.id, folder.id)
    };

    let storage = JsonFileStorage::open(&path).unwrap();
    let store = NoteStore::open(Box::new(storage)).unwrap();

    let event = store.event(event_id).unwrap();
    assert_eq!(event.title, "Kept");
    assert_eq!(event.folder_ids, vec![folder_id]);
    assert_eq!(event.transcription, "[09:00:00]\nnotes");
    assert_eq!(store.folder(folder_id).unwrap().name, "Archive");
}

#[test]
fn test_api_token_round_trip() {
    let (mut store, storage) = memory_store();

    assert_eq!(store.api_token().unwrap(), None);

    store.set_api_token("hf_secret").unwrap();
    assert_eq!(store.api_token().unwrap(), Some("hf_secret".to_string()));
    assert_eq!(
        storage.get("hf_token").unwrap(),
        Some(serde_json::Value::String("hf_secret".to_string()))
    );
}

#[test]
fn test_event_ids_are_unique_and_immutable() {
    let (mut store, _) = memory_store();

    let mut ids = Vec::new();
    for i in 0..10 {
        let event = store
            .add_event(new_event(&format!("Event {i}"), utc(2026, 8, 1, 9, 0)))
            .unwrap();
        ids.push(event.id);
    }

    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
}
