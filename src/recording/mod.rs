pub mod audio;
pub mod controller;
pub mod devices;
pub mod recorder;
pub mod speech;

pub use audio::{AudioCapture, AudioFrame, CaptureConfig, FileCapture};
pub use controller::{RecorderConfig, RecordingController, RecordingStats, SessionStatus};
pub use devices::{CaptureSource, RecorderDevices, SystemDevices};
pub use recorder::{RecordingFile, SessionRecorder};
pub use speech::{RecognitionSlot, RecognitionUpdate, SpeechRecognizer};
