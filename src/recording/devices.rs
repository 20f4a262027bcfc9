use std::path::PathBuf;

use super::audio::{AudioCapture, CaptureConfig, FileCapture};
use super::speech::SpeechRecognizer;
use crate::error::{NotesError, Result};

/// Audio source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Live microphone input
    Microphone,
    /// WAV file input (for batch processing and tests)
    File(PathBuf),
}

/// Opens the capture and recognition streams for a recording session.
///
/// The live microphone and the platform speech engine are external
/// collaborators; this seam is where they plug in. Tests and embedders
/// provide their own implementations.
pub trait RecorderDevices: Send + Sync {
    /// Open an audio-capture stream.
    ///
    /// Errors with [`NotesError::Device`] when permission is denied or no
    /// input device exists.
    fn open_capture(&self) -> Result<Box<dyn AudioCapture>>;

    /// Open a speech-recognition stream.
    ///
    /// Errors with [`NotesError::Unsupported`] when the platform offers no
    /// recognition engine; the session then refuses to start rather than
    /// silently recording without a transcript.
    fn open_recognizer(&self) -> Result<Box<dyn SpeechRecognizer>>;
}

/// Device factory for the host platform.
pub struct SystemDevices {
    source: CaptureSource,
    config: CaptureConfig,
}

impl SystemDevices {
    pub fn new(source: CaptureSource, config: CaptureConfig) -> Self {
        Self { source, config }
    }
}

impl RecorderDevices for SystemDevices {
    fn open_capture(&self) -> Result<Box<dyn AudioCapture>> {
        match &self.source {
            CaptureSource::Microphone => Err(NotesError::Device(
                "no microphone input device is available on this host".to_string(),
            )),
            CaptureSource::File(path) => {
                let capture = FileCapture::open(path, self.config.clone())?;
                Ok(Box::new(capture))
            }
        }
    }

    fn open_recognizer(&self) -> Result<Box<dyn SpeechRecognizer>> {
        Err(NotesError::Unsupported(
            "no speech-recognition engine is available on this host".to_string(),
        ))
    }
}
