pub mod repository;
pub mod storage;
pub mod types;

pub use repository::{NoteStore, API_TOKEN_KEY, EVENTS_KEY, FOLDERS_KEY};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use types::{Event, Folder, NewEvent, TimeWindow, DEFAULT_FOLDER_ICON};
