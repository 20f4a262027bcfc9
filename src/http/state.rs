use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::config::SummarizerConfig;
use crate::recording::RecordingController;
use crate::store::NoteStore;
use crate::summarize::SummarizeGateway;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Event and folder collections (single source of truth)
    pub store: Arc<RwLock<NoteStore>>,

    /// The at-most-one recording session
    pub recorder: Arc<Mutex<RecordingController>>,

    /// Summarize-and-persist operation
    pub gateway: Arc<SummarizeGateway>,

    /// Server-held secret injected into proxied summarization requests
    pub proxy_token: Option<String>,

    /// Remote endpoint parameters shared with the proxy handler
    pub summarizer: SummarizerConfig,

    /// Outbound HTTP client for the proxy
    pub http: reqwest::Client,
}
