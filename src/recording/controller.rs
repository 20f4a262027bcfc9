use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::audio::AudioCapture;
use super::devices::RecorderDevices;
use super::recorder::{RecordingFile, SessionRecorder};
use super::speech::SpeechRecognizer;
use crate::error::{NotesError, Result};
use crate::store::NoteStore;
use crate::transcript::TranscriptBuffer;

/// Controller configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Directory for per-session WAV files
    pub recordings_dir: PathBuf,
    /// How long to wait after stop for a final recognition result to land
    pub settle_delay: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recordings_dir: PathBuf::from("recordings"),
            settle_delay: Duration::from_millis(500),
        }
    }
}

/// Read-side view of the active session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub event_id: i64,
    pub started_at: DateTime<Local>,
    pub paused: bool,
}

/// Final statistics returned when a session stops.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingStats {
    pub event_id: i64,
    pub started_at: DateTime<Local>,
    pub duration_secs: f64,
    /// Whether finalized text was committed to the event
    pub committed: bool,
    pub audio_path: Option<PathBuf>,
}

/// The one active recording session. Its existence is what "recording in
/// progress" means; there is no separate flag.
struct ActiveSession {
    event_id: i64,
    session_id: Uuid,
    started_at: DateTime<Local>,
    paused: bool,
    buffer: Arc<Mutex<TranscriptBuffer>>,
    capture: Box<dyn AudioCapture>,
    recognizer: Box<dyn SpeechRecognizer>,
    recognition_task: JoinHandle<()>,
    recorder_task: JoinHandle<Result<Option<RecordingFile>>>,
}

/// Manages at most one audio-capture + speech-recognition session, tied to
/// one event record.
///
/// State machine: Idle → Recording → (Paused ⇄ Recording) → Idle. The
/// session exclusively owns the two streams it opened and releases them on
/// stop; stop is idempotent and always runs the full release path.
pub struct RecordingController {
    store: Arc<RwLock<NoteStore>>,
    devices: Arc<dyn RecorderDevices>,
    config: RecorderConfig,
    active: Option<ActiveSession>,
}

impl RecordingController {
    pub fn new(
        store: Arc<RwLock<NoteStore>>,
        devices: Arc<dyn RecorderDevices>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            store,
            devices,
            config,
            active: None,
        }
    }

    /// Start a session for `event_id`.
    ///
    /// Any session already active — for this event or another — is fully
    /// stopped first, through the same transition path as an explicit stop.
    /// The transcript buffer is seeded with the session's local-time header
    /// on top of the event's existing transcript.
    pub async fn start(&mut self, event_id: i64) -> Result<()> {
        if self.active.is_some() {
            self.stop().await?;
        }

        let prior = {
            let store = self.store.read().await;
            store
                .event(event_id)
                .ok_or(NotesError::not_found("event", event_id))?
                .transcription
                .clone()
        };

        let mut capture = self.devices.open_capture()?;
        let mut recognizer = self.devices.open_recognizer()?;

        let started_at = Local::now();
        let session_id = Uuid::new_v4();

        info!("Starting recording session {session_id} for event {event_id}");

        let audio_rx = capture.start().await?;
        let speech_rx = match recognizer.start().await {
            Ok(rx) => rx,
            Err(e) => {
                // Don't leave the capture device open behind a failed start
                if let Err(stop_err) = capture.stop().await {
                    warn!("Failed to release capture after start error: {stop_err}");
                }
                return Err(e);
            }
        };

        let buffer = Arc::new(Mutex::new(TranscriptBuffer::new(&prior, started_at)));

        // Apply recognition updates in delivery order; ends when the stream
        // closes.
        let task_buffer = Arc::clone(&buffer);
        let recognition_task = tokio::spawn(async move {
            let mut speech_rx = speech_rx;
            while let Some(update) = speech_rx.recv().await {
                let mut buf = task_buffer.lock().unwrap_or_else(PoisonError::into_inner);
                buf.apply(&update);
            }
        });

        // Drain audio frames to the per-session WAV file; ends when capture
        // stops.
        let audio_path = self
            .config
            .recordings_dir
            .join(format!("{event_id}-{session_id}.wav"));
        let recorder = SessionRecorder::new(audio_path);
        let recorder_task = tokio::spawn(recorder.record(audio_rx));

        self.active = Some(ActiveSession {
            event_id,
            session_id,
            started_at,
            paused: false,
            buffer,
            capture,
            recognizer,
            recognition_task,
            recorder_task,
        });

        Ok(())
    }

    /// Pause the active session. No-op when idle or already paused.
    pub async fn pause(&mut self) -> Result<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };

        if session.paused {
            return Ok(());
        }

        session.capture.pause().await?;
        session.recognizer.suspend().await?;
        session.paused = true;

        info!("Paused recording session {}", session.session_id);
        Ok(())
    }

    /// Resume the active session. No-op when idle or not paused.
    pub async fn resume(&mut self) -> Result<()> {
        let Some(session) = self.active.as_mut() else {
            return Ok(());
        };

        if !session.paused {
            return Ok(());
        }

        session.capture.resume().await?;
        session.recognizer.resume().await?;
        session.paused = false;

        info!("Resumed recording session {}", session.session_id);
        Ok(())
    }

    /// Stop the active session: stop recognition, stop capture, release the
    /// devices, wait out the settling delay for a final recognition result,
    /// then commit the accumulated transcript to the owning event.
    ///
    /// Idempotent — stopping when idle returns `Ok(None)`. An event whose
    /// session produced no finalized text keeps its transcript unchanged.
    pub async fn stop(&mut self) -> Result<Option<RecordingStats>> {
        let Some(mut session) = self.active.take() else {
            return Ok(None);
        };

        info!(
            "Stopping recording session {} for event {}",
            session.session_id, session.event_id
        );

        if let Err(e) = session.recognizer.stop().await {
            warn!("Failed to stop recognizer: {e}");
        }
        if let Err(e) = session.capture.stop().await {
            warn!("Failed to stop audio capture: {e}");
        }

        // Settling delay: in-flight recognition results still drain into the
        // buffer; a stream that never closes is cut off at the bound.
        match tokio::time::timeout(self.config.settle_delay, &mut session.recognition_task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Recognition task failed: {e}"),
            Err(_) => {
                warn!(
                    "Recognition stream for session {} did not settle in time",
                    session.session_id
                );
                session.recognition_task.abort();
            }
        }

        let audio_file =
            match tokio::time::timeout(self.config.settle_delay, &mut session.recorder_task).await {
                Ok(Ok(Ok(file))) => file,
                Ok(Ok(Err(e))) => {
                    // A lost audio file must not lose the transcript
                    warn!("Failed to write session audio: {e}");
                    None
                }
                Ok(Err(e)) => {
                    error!("Recorder task failed: {e}");
                    None
                }
                Err(_) => {
                    warn!(
                        "Audio drain for session {} did not settle in time",
                        session.session_id
                    );
                    session.recorder_task.abort();
                    None
                }
            };

        let final_text = {
            let buf = session.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            buf.committed()
        };

        let mut committed = false;
        if let Some(text) = final_text {
            let mut store = self.store.write().await;
            match store.set_transcription(session.event_id, text) {
                Ok(()) => committed = true,
                Err(e) => warn!(
                    "Could not persist transcript for event {}: {e}",
                    session.event_id
                ),
            }
        }

        let duration_secs =
            (Local::now() - session.started_at).num_milliseconds() as f64 / 1000.0;

        info!(
            "Recording session {} stopped (committed={committed})",
            session.session_id
        );

        Ok(Some(RecordingStats {
            event_id: session.event_id,
            started_at: session.started_at,
            duration_secs,
            committed,
            audio_path: audio_file.map(|f| f.path),
        }))
    }

    /// The event currently recording, if any.
    pub fn recording_event(&self) -> Option<i64> {
        self.active.as_ref().map(|s| s.event_id)
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.active.as_ref().map(|s| SessionStatus {
            event_id: s.event_id,
            started_at: s.started_at,
            paused: s.paused,
        })
    }

    /// Live display transcript for `event_id`: accumulated final text plus
    /// pending interim. `None` unless that event is the one recording.
    ///
    /// This is the only place interim text is visible; it never reaches
    /// storage.
    pub fn live_transcript(&self, event_id: i64) -> Option<String> {
        self.active
            .as_ref()
            .filter(|s| s.event_id == event_id)
            .map(|s| {
                s.buffer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .display()
            })
    }
}
