use thiserror::Error;

/// Top-level error type for the meeting-notes engine.
///
/// Every user-facing failure maps to one of these variants; HTTP handlers
/// translate them to status codes via [`NotesError::status`]. Remote
/// summarization failures are never partial: either the whole result is
/// written or nothing is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotesError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Audio device unavailable: {0}")]
    Device(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Summarization request failed: {0}")]
    Remote(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotesError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        NotesError::NotFound { kind, id }
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(err: serde_json::Error) -> Self {
        NotesError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for NotesError {
    fn from(err: reqwest::Error) -> Self {
        NotesError::Remote(err.to_string())
    }
}

/// A specialized `Result` type for meeting-notes operations.
pub type Result<T> = std::result::Result<T, NotesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotesError::Validation("title is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: title is required");
    }

    #[test]
    fn test_not_found_display() {
        let err = NotesError::not_found("event", 42);
        assert_eq!(err.to_string(), "event 42 not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NotesError = io_err.into();
        assert!(matches!(err, NotesError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_error_maps_to_storage() {
        let bad_json = "{ invalid json }";
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        let err: NotesError = parse.unwrap_err().into();
        assert!(matches!(err, NotesError::Storage(_)));
    }
}
