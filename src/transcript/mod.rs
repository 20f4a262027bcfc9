//! Assembles speech-recognition results into transcript text.
//!
//! A transcript is a sequence of segments separated by [`SEGMENT_DELIMITER`],
//! one segment per recording session, each opening with a bracketed
//! local-time label. During a session the buffer tracks two strings: the
//! accumulated *final* text (the only thing ever persisted) and the latest
//! *interim* text (display only, replaced wholesale on every update).

use chrono::{DateTime, Local};

use crate::recording::speech::RecognitionUpdate;

/// Separates transcript segments; one segment per recording session.
pub const SEGMENT_DELIMITER: &str = "\n\n\n";

/// Session header, e.g. `"[14:30:05]\n"`.
pub fn session_header(started_at: DateTime<Local>) -> String {
    format!("[{}]\n", started_at.format("%H:%M:%S"))
}

/// Live transcript state for one recording session.
pub struct TranscriptBuffer {
    /// Prior transcript + session header + accumulated final fragments
    committed: String,
    /// Interim fragments from the most recent update only
    interim: String,
    /// Whether any final fragment has arrived this session
    has_final: bool,
}

impl TranscriptBuffer {
    /// Seed the buffer from the event's existing transcript: the new
    /// session's header is appended after a segment delimiter, or starts the
    /// transcript when there is no prior content.
    pub fn new(prior: &str, started_at: DateTime<Local>) -> Self {
        let header = session_header(started_at);

        let committed = if prior.is_empty() {
            header
        } else {
            format!("{prior}{SEGMENT_DELIMITER}{header}")
        };

        Self {
            committed,
            interim: String::new(),
            has_final: false,
        }
    }

    /// Apply one recognition update, in delivery order.
    ///
    /// Final slots join the committed buffer space-separated. Interim slots
    /// replace the pending interim text entirely; they never reach the
    /// committed buffer.
    pub fn apply(&mut self, update: &RecognitionUpdate) {
        let mut interim = String::new();

        for slot in &update.slots {
            if slot.is_final {
                let text = slot.text.trim();
                if !text.is_empty() {
                    self.committed.push_str(text);
                    self.committed.push(' ');
                    self.has_final = true;
                }
            } else {
                interim.push_str(&slot.text);
            }
        }

        self.interim = interim;
    }

    /// The live display value: committed text plus pending interim, trimmed.
    pub fn display(&self) -> String {
        let mut text = self.committed.clone();
        text.push_str(&self.interim);
        text.trim().to_string()
    }

    /// The value to persist when the session stops: the trimmed final
    /// buffer, or `None` when no finalized text ever arrived (the event's
    /// transcript is then left unchanged). Unconsumed interim text is
    /// discarded.
    pub fn committed(&self) -> Option<String> {
        self.has_final.then(|| self.committed.trim().to_string())
    }

    pub fn has_final(&self) -> bool {
        self.has_final
    }
}

/// Split a transcript into its delimiter-bounded segments.
pub fn segments(transcription: &str) -> Vec<&str> {
    if transcription.is_empty() {
        return Vec::new();
    }
    transcription.split(SEGMENT_DELIMITER).collect()
}

/// Remove exactly the segment at `index`, rejoining the remainder with the
/// same delimiter in original order. `None` when the index is out of range.
pub fn remove_segment(transcription: &str, index: usize) -> Option<String> {
    let mut parts = segments(transcription);

    if index >= parts.len() {
        return None;
    }

    parts.remove(index);
    Some(parts.join(SEGMENT_DELIMITER))
}
