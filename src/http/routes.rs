use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Events
        .route(
            "/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route("/events/:id", delete(handlers::delete_event))
        .route(
            "/events/:id/folders/:folder_id",
            post(handlers::toggle_event_folder),
        )
        // Recording control
        .route("/events/:id/record/start", post(handlers::start_recording))
        .route("/events/:id/record/pause", post(handlers::pause_recording))
        .route(
            "/events/:id/record/resume",
            post(handlers::resume_recording),
        )
        .route("/events/:id/record/stop", post(handlers::stop_recording))
        .route("/events/:id/record/live", get(handlers::live_transcript))
        // Transcript and derived notes
        .route(
            "/events/:id/transcript",
            delete(handlers::clear_transcription),
        )
        .route(
            "/events/:id/transcript/segments/:index",
            delete(handlers::delete_transcript_segment),
        )
        .route("/events/:id/summary", delete(handlers::clear_summary))
        .route("/events/:id/key-points", delete(handlers::clear_key_points))
        .route("/events/:id/summarize", post(handlers::summarize_event))
        // Folders
        .route(
            "/folders",
            get(handlers::list_folders).post(handlers::create_folder),
        )
        .route("/folders/:id", delete(handlers::delete_folder))
        // Summarization proxy
        .route("/api/summarize", post(handlers::proxy_summarize))
        .route("/api/check-key", get(handlers::check_key))
        // Open CORS (the front end may be served from anywhere) and request
        // tracing
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
