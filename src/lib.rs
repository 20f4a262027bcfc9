pub mod config;
pub mod error;
pub mod http;
pub mod recording;
pub mod store;
pub mod summarize;
pub mod transcript;

pub use config::Config;
pub use error::{NotesError, Result};
pub use http::{create_router, AppState};
pub use recording::{
    AudioCapture, RecorderConfig, RecorderDevices, RecordingController, RecordingStats,
    SpeechRecognizer,
};
pub use store::{Event, Folder, JsonFileStorage, MemoryStorage, NewEvent, NoteStore, TimeWindow};
pub use summarize::{HuggingFaceClient, SummarizeGateway, SummaryModel};
pub use transcript::TranscriptBuffer;
