use chrono::{DateTime, Local, Utc};
use serde_json::Value;
use tracing::info;

use super::storage::Storage;
use super::types::{
    Event, Folder, NewEvent, TimeWindow, DEFAULT_FOLDER_ICON, MAX_FOLDER_NAME_LEN, MAX_TITLE_LEN,
};
use crate::error::{NotesError, Result};
use crate::transcript;

pub const EVENTS_KEY: &str = "events";
pub const FOLDERS_KEY: &str = "folders";
pub const API_TOKEN_KEY: &str = "hf_token";

/// The event and folder collections, loaded whole into memory at startup and
/// mirrored to [`Storage`] after every mutation (write-through, no batching).
///
/// This is the single source of truth for events and folders. Readers get
/// clones or shared slices; all mutation goes through these methods so that
/// the persisted copy never lags the in-memory one.
pub struct NoteStore {
    storage: Box<dyn Storage>,
    events: Vec<Event>,
    folders: Vec<Folder>,
}

impl NoteStore {
    /// Load collections from storage. Missing keys mean a fresh store.
    pub fn open(storage: Box<dyn Storage>) -> Result<Self> {
        let events = Self::load(storage.as_ref(), EVENTS_KEY)?;
        let folders = Self::load(storage.as_ref(), FOLDERS_KEY)?;

        info!(
            "Store loaded: {} events, {} folders",
            events.len(),
            folders.len()
        );

        Ok(Self {
            storage,
            events,
            folders,
        })
    }

    fn load<T: serde::de::DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Vec<T>> {
        match storage.get(key)? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| NotesError::Storage(format!("corrupt '{key}' collection: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    fn persist_events(&self) -> Result<()> {
        self.storage.put(EVENTS_KEY, serde_json::to_value(&self.events)?)
    }

    fn persist_folders(&self) -> Result<()> {
        self.storage.put(FOLDERS_KEY, serde_json::to_value(&self.folders)?)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    fn event_mut(&mut self, id: i64) -> Result<&mut Event> {
        self.events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(NotesError::not_found("event", id))
    }

    pub fn add_event(&mut self, new: NewEvent) -> Result<Event> {
        let title = new.title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
            return Err(NotesError::Validation(format!(
                "title must be between 1 and {MAX_TITLE_LEN} characters"
            )));
        }

        let location = new.location.trim();
        if location.is_empty() {
            return Err(NotesError::Validation("location is required".to_string()));
        }

        let id = next_id(Utc::now().timestamp_millis(), |id| {
            self.events.iter().any(|e| e.id == id)
        });

        let event = Event {
            id,
            title: title.to_string(),
            location: location.to_string(),
            date: new.date,
            transcription: String::new(),
            summary: String::new(),
            key_points: Vec::new(),
            folder_ids: Vec::new(),
        };

        self.events.push(event.clone());
        self.persist_events()?;

        info!("Created event {id}: {title}");

        Ok(event)
    }

    /// Remove an event outright. Returns false when the id is unknown.
    pub fn delete_event(&mut self, id: i64) -> Result<bool> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);

        if self.events.len() == before {
            return Ok(false);
        }

        self.persist_events()?;
        info!("Deleted event {id}");
        Ok(true)
    }

    /// Events passing the time-window and folder filters, ascending by date.
    ///
    /// `now` is the caller's local wall-clock time; passing it in keeps the
    /// calendar arithmetic testable.
    pub fn list(
        &self,
        window: Option<TimeWindow>,
        folder_id: Option<i64>,
        now: DateTime<Local>,
    ) -> Vec<Event> {
        let now_local = now.naive_local();

        let mut filtered: Vec<Event> = self
            .events
            .iter()
            .filter(|e| folder_id.map_or(true, |fid| e.folder_ids.contains(&fid)))
            .filter(|e| {
                window.map_or(true, |w| {
                    w.contains(e.date.with_timezone(&Local).naive_local(), now_local)
                })
            })
            .cloned()
            .collect();

        filtered.sort_by_key(|e| e.date);
        filtered
    }

    // ------------------------------------------------------------------
    // Folders
    // ------------------------------------------------------------------

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, id: i64) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn add_folder(&mut self, name: &str, icon: Option<String>) -> Result<Folder> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_FOLDER_NAME_LEN {
            return Err(NotesError::Validation(format!(
                "folder name must be between 1 and {MAX_FOLDER_NAME_LEN} characters"
            )));
        }

        let icon = match icon {
            Some(icon) if !icon.trim().is_empty() => icon,
            _ => DEFAULT_FOLDER_ICON.to_string(),
        };

        let id = next_id(Utc::now().timestamp_millis(), |id| {
            self.folders.iter().any(|f| f.id == id)
        });

        let folder = Folder {
            id,
            name: name.to_string(),
            icon,
        };

        self.folders.push(folder.clone());
        self.persist_folders()?;

        info!("Created folder {id}: {name}");

        Ok(folder)
    }

    /// Remove a folder and cascade: the id disappears from every event's
    /// folder list. Events themselves are untouched.
    pub fn delete_folder(&mut self, id: i64) -> Result<bool> {
        let before = self.folders.len();
        self.folders.retain(|f| f.id != id);

        if self.folders.len() == before {
            return Ok(false);
        }

        for event in &mut self.events {
            event.folder_ids.retain(|fid| *fid != id);
        }

        self.persist_folders()?;
        self.persist_events()?;

        info!("Deleted folder {id} (cascaded from events)");
        Ok(true)
    }

    /// Toggle an event's membership in a folder. Returns whether the event
    /// is a member after the call.
    pub fn toggle_event_folder(&mut self, event_id: i64, folder_id: i64) -> Result<bool> {
        if self.folder(folder_id).is_none() {
            return Err(NotesError::not_found("folder", folder_id));
        }

        let event = self.event_mut(event_id)?;

        let member = if let Some(pos) = event.folder_ids.iter().position(|f| *f == folder_id) {
            event.folder_ids.remove(pos);
            false
        } else {
            event.folder_ids.push(folder_id);
            true
        };

        self.persist_events()?;
        Ok(member)
    }

    // ------------------------------------------------------------------
    // Transcript, summary, key points
    // ------------------------------------------------------------------

    pub fn set_transcription(&mut self, id: i64, text: String) -> Result<()> {
        self.event_mut(id)?.transcription = text;
        self.persist_events()
    }

    pub fn clear_transcription(&mut self, id: i64) -> Result<()> {
        self.event_mut(id)?.transcription = String::new();
        self.persist_events()
    }

    /// Remove one delimiter-bounded transcript segment by index.
    pub fn delete_transcript_segment(&mut self, id: i64, index: usize) -> Result<()> {
        let event = self.event_mut(id)?;

        let updated = transcript::remove_segment(&event.transcription, index).ok_or_else(|| {
            NotesError::Validation(format!("transcript has no segment {index}"))
        })?;

        event.transcription = updated;
        self.persist_events()
    }

    /// Write summary and key points together; callers observe both or
    /// neither.
    pub fn set_summary(&mut self, id: i64, summary: String, key_points: Vec<String>) -> Result<()> {
        let event = self.event_mut(id)?;
        event.summary = summary;
        event.key_points = key_points;
        self.persist_events()
    }

    pub fn clear_summary(&mut self, id: i64) -> Result<()> {
        self.event_mut(id)?.summary = String::new();
        self.persist_events()
    }

    pub fn clear_key_points(&mut self, id: i64) -> Result<()> {
        self.event_mut(id)?.key_points = Vec::new();
        self.persist_events()
    }

    // ------------------------------------------------------------------
    // API credential
    // ------------------------------------------------------------------

    pub fn api_token(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(API_TOKEN_KEY)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    pub fn set_api_token(&mut self, token: &str) -> Result<()> {
        self.storage.put(API_TOKEN_KEY, Value::String(token.to_string()))
    }
}

/// Timestamp-derived ids in the style of `Date.now()`: start from the
/// current epoch milliseconds and bump past collisions.
fn next_id(seed: i64, taken: impl Fn(i64) -> bool) -> i64 {
    let mut id = seed;
    while taken(id) {
        id += 1;
    }
    id
}
