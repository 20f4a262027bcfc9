use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::client::SummaryModel;
use super::key_points::extract_key_points;
use crate::error::{NotesError, Result};
use crate::store::NoteStore;

/// The summary and key points written back to an event, as one unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutcome {
    pub summary: String,
    pub key_points: Vec<String>,
}

/// Sends an event's transcription to the remote model and writes the result
/// back, together with locally derived key points.
///
/// The remote model only sees the first `max_input_chars` characters; key
/// points always come from the full transcription. On any remote failure
/// nothing is written — the event's summary and key points stay exactly as
/// they were.
pub struct SummarizeGateway {
    model: Arc<dyn SummaryModel>,
    max_input_chars: usize,
}

impl SummarizeGateway {
    pub fn new(model: Arc<dyn SummaryModel>, max_input_chars: usize) -> Self {
        Self {
            model,
            max_input_chars,
        }
    }

    pub async fn summarize_event(
        &self,
        store: &RwLock<NoteStore>,
        event_id: i64,
    ) -> Result<SummaryOutcome> {
        let transcription = {
            let store = store.read().await;
            store
                .event(event_id)
                .ok_or(NotesError::not_found("event", event_id))?
                .transcription
                .clone()
        };

        if transcription.trim().is_empty() {
            return Err(NotesError::Validation(
                "no transcription found; record the meeting first".to_string(),
            ));
        }

        // Characters past the cap are silently dropped, not summarized
        let truncated: String = transcription.chars().take(self.max_input_chars).collect();

        let summary = self.model.summarize(&truncated).await?;
        let key_points = extract_key_points(&transcription);

        {
            let mut store = store.write().await;
            store.set_summary(event_id, summary.clone(), key_points.clone())?;
        }

        info!(
            "Summarized event {event_id}: {} chars sent, {} key points",
            truncated.chars().count(),
            key_points.len()
        );

        Ok(SummaryOutcome {
            summary,
            key_points,
        })
    }
}
