use super::state::AppState;
use crate::error::NotesError;
use crate::recording::RecordingStats;
use crate::store::{NewEvent, TimeWindow};
use crate::summarize::inference_request_body;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Time window: "today", "week", or "month"
    pub view: Option<String>,

    /// Folder id to filter by
    pub folder: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub event_id: i64,
    pub folder_id: i64,
    pub member: bool,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub event_id: i64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub event_id: i64,
    pub status: String,
    pub stats: Option<RecordingStats>,
}

#[derive(Debug, Serialize)]
pub struct LiveTranscriptResponse {
    pub event_id: i64,
    pub transcription: String,
}

#[derive(Debug, Deserialize)]
pub struct ProxySummarizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckKeyResponse {
    pub has_key: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a domain error to its HTTP response.
fn error_response(err: NotesError) -> Response {
    let status = match &err {
        NotesError::Validation(_) => StatusCode::BAD_REQUEST,
        NotesError::NotFound { .. } => StatusCode::NOT_FOUND,
        NotesError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        NotesError::Remote(_) => StatusCode::BAD_GATEWAY,
        NotesError::Device(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Events
// ============================================================================

/// GET /events?view=today|week|month&folder=<id>
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> impl IntoResponse {
    let window = match query.view.as_deref() {
        Some(view) => match view.parse::<TimeWindow>() {
            Ok(w) => Some(w),
            Err(e) => return error_response(e),
        },
        None => None,
    };

    let store = state.store.read().await;
    let events = store.list(window, query.folder, Local::now());

    (StatusCode::OK, Json(events)).into_response()
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<NewEvent>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.add_event(req) {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.delete_event(id) {
        Ok(true) => (
            StatusCode::OK,
            Json(DeletedResponse {
                id,
                status: "deleted".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => error_response(NotesError::not_found("event", id)),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Folders
// ============================================================================

/// GET /folders
pub async fn list_folders(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    (StatusCode::OK, Json(store.folders().to_vec())).into_response()
}

/// POST /folders
pub async fn create_folder(
    State(state): State<AppState>,
    Json(req): Json<CreateFolderRequest>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.add_folder(&req.name, req.icon) {
        Ok(folder) => (StatusCode::CREATED, Json(folder)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /folders/:id
/// Removes the folder and cascades the id out of every event.
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.delete_folder(id) {
        Ok(true) => (
            StatusCode::OK,
            Json(DeletedResponse {
                id,
                status: "deleted".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => error_response(NotesError::not_found("folder", id)),
        Err(e) => error_response(e),
    }
}

/// POST /events/:id/folders/:folder_id
/// Toggle the event's membership in the folder.
pub async fn toggle_event_folder(
    State(state): State<AppState>,
    Path((event_id, folder_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.toggle_event_folder(event_id, folder_id) {
        Ok(member) => (
            StatusCode::OK,
            Json(MembershipResponse {
                event_id,
                folder_id,
                member,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Recording
// ============================================================================

/// POST /events/:id/record/start
pub async fn start_recording(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("Starting recording for event {id}");

    let mut recorder = state.recorder.lock().await;

    match recorder.start(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(RecordResponse {
                event_id: id,
                status: "recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start recording: {e}");
            error_response(e)
        }
    }
}

/// POST /events/:id/record/pause
pub async fn pause_recording(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut recorder = state.recorder.lock().await;

    if recorder.recording_event() != Some(id) {
        return error_response(NotesError::not_found("recording session for event", id));
    }

    match recorder.pause().await {
        Ok(()) => (
            StatusCode::OK,
            Json(RecordResponse {
                event_id: id,
                status: "paused".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /events/:id/record/resume
pub async fn resume_recording(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut recorder = state.recorder.lock().await;

    if recorder.recording_event() != Some(id) {
        return error_response(NotesError::not_found("recording session for event", id));
    }

    match recorder.resume().await {
        Ok(()) => (
            StatusCode::OK,
            Json(RecordResponse {
                event_id: id,
                status: "recording".to_string(),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /events/:id/record/stop
/// Idempotent: stopping an event that is not recording reports "idle".
pub async fn stop_recording(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut recorder = state.recorder.lock().await;

    if recorder.recording_event() != Some(id) {
        return (
            StatusCode::OK,
            Json(StopRecordingResponse {
                event_id: id,
                status: "idle".to_string(),
                stats: None,
            }),
        )
            .into_response();
    }

    match recorder.stop().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(StopRecordingResponse {
                event_id: id,
                status: "stopped".to_string(),
                stats,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to stop recording: {e}");
            error_response(e)
        }
    }
}

/// GET /events/:id/record/live
/// The live display transcript (committed plus interim text).
pub async fn live_transcript(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let recorder = state.recorder.lock().await;

    match recorder.live_transcript(id) {
        Some(transcription) => (
            StatusCode::OK,
            Json(LiveTranscriptResponse {
                event_id: id,
                transcription,
            }),
        )
            .into_response(),
        None => error_response(NotesError::not_found("recording session for event", id)),
    }
}

// ============================================================================
// Transcript, summary, key points
// ============================================================================

/// DELETE /events/:id/transcript
pub async fn clear_transcription(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.clear_transcription(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /events/:id/transcript/segments/:index
pub async fn delete_transcript_segment(
    State(state): State<AppState>,
    Path((id, index)): Path<(i64, usize)>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.delete_transcript_segment(id, index) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /events/:id/summary
pub async fn clear_summary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.clear_summary(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /events/:id/key-points
pub async fn clear_key_points(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let mut store = state.store.write().await;

    match store.clear_key_points(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /events/:id/summarize
pub async fn summarize_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("Summarizing event {id}");

    match state.gateway.summarize_event(&state.store, id).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!("Summarization failed for event {id}: {e}");
            error_response(e)
        }
    }
}

// ============================================================================
// Summarization proxy
// ============================================================================

/// POST /api/summarize
/// Forwards `{text}` to the remote model with the server-held secret and
/// returns the provider's JSON verbatim, with the provider's status code.
pub async fn proxy_summarize(
    State(state): State<AppState>,
    Json(req): Json<ProxySummarizeRequest>,
) -> impl IntoResponse {
    let Some(token) = state.proxy_token.as_deref() else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "API key not configured" })),
        )
            .into_response();
    };

    let truncated: String = req
        .text
        .chars()
        .take(state.summarizer.max_input_chars)
        .collect();

    let body = inference_request_body(
        &truncated,
        state.summarizer.max_length,
        state.summarizer.min_length,
    );

    let response = state
        .http
        .post(&state.summarizer.endpoint)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await;

    match response {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);

            let payload: Value = response
                .json()
                .await
                .unwrap_or_else(|e| json!({ "error": format!("invalid provider response: {e}") }));

            (status, Json(payload)).into_response()
        }
        Err(e) => {
            error!("Summarization proxy request failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /api/check-key
pub async fn check_key(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CheckKeyResponse {
            has_key: state.proxy_token.is_some(),
        }),
    )
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
