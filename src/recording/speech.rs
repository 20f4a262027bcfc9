use tokio::sync::mpsc;

use crate::error::Result;

/// A speech-recognition fragment: settled (final) or provisional (interim,
/// subject to revision before becoming final).
#[derive(Debug, Clone)]
pub struct RecognitionSlot {
    pub text: String,
    pub is_final: bool,
}

impl RecognitionSlot {
    pub fn settled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// One recognition callback's worth of result slots, delivered in stream
/// order. An update may carry zero or more slots in any mix of final and
/// interim.
#[derive(Debug, Clone, Default)]
pub struct RecognitionUpdate {
    pub slots: Vec<RecognitionSlot>,
}

impl RecognitionUpdate {
    pub fn new(slots: Vec<RecognitionSlot>) -> Self {
        Self { slots }
    }
}

/// One speech-recognition stream, exclusively owned by the recording session
/// that opened it.
///
/// Updates arrive on the returned channel in the order the underlying engine
/// emits them; the channel closes when the stream ends. `suspend` stops the
/// engine without tearing down the stream, mirroring how a recognizer is
/// paused while the session stays alive.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start recognizing. Returns a channel receiver of updates.
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionUpdate>>;

    /// Suspend recognition, keeping the stream resumable.
    async fn suspend(&mut self) -> Result<()>;

    /// Resume recognition after a suspend.
    async fn resume(&mut self) -> Result<()>;

    /// Stop recognizing and release the engine.
    async fn stop(&mut self) -> Result<()>;

    /// Engine name for logging
    fn name(&self) -> &str;
}
