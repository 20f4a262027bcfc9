use anyhow::{Context, Result};
use clap::Parser;
use meeting_notes::http::{create_router, AppState};
use meeting_notes::recording::{
    CaptureConfig, CaptureSource, RecorderConfig, RecordingController, SystemDevices,
};
use meeting_notes::store::{JsonFileStorage, NoteStore};
use meeting_notes::summarize::{HuggingFaceClient, SummarizeGateway};
use meeting_notes::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "meeting-notes", about = "Meeting notes service")]
struct Args {
    /// Config file (without extension)
    #[arg(long, default_value = "config/meeting-notes")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);

    let storage = JsonFileStorage::open(&cfg.storage.path)
        .with_context(|| format!("Failed to open store at {}", cfg.storage.path))?;
    let store = NoteStore::open(Box::new(storage)).context("Failed to load collections")?;

    // Server-held secret for the summarization calls: environment first,
    // falling back to the locally stored credential
    let token = match std::env::var("HF_API_TOKEN") {
        Ok(token) if !token.is_empty() => Some(token),
        _ => store.api_token().context("Failed to read stored credential")?,
    };

    if token.is_none() {
        warn!("No summarization API token configured; /api/summarize will return 401");
    }

    let store = Arc::new(RwLock::new(store));

    let capture_config = CaptureConfig {
        sample_rate: cfg.recording.sample_rate,
        channels: cfg.recording.channels,
        ..CaptureConfig::default()
    };
    let devices = Arc::new(SystemDevices::new(CaptureSource::Microphone, capture_config));

    let recorder = RecordingController::new(
        Arc::clone(&store),
        devices,
        RecorderConfig {
            recordings_dir: PathBuf::from(&cfg.storage.recordings_path),
            settle_delay: Duration::from_millis(cfg.recording.settle_delay_ms),
        },
    );

    let http_client = reqwest::Client::new();

    let model = HuggingFaceClient::new(
        http_client.clone(),
        &cfg.summarizer,
        token.clone().unwrap_or_default(),
    );
    let gateway = SummarizeGateway::new(Arc::new(model), cfg.summarizer.max_input_chars);

    let state = AppState {
        store,
        recorder: Arc::new(Mutex::new(recorder)),
        gateway: Arc::new(gateway),
        proxy_token: token,
        summarizer: cfg.summarizer.clone(),
        http: http_client,
    };

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on {addr}");

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server failed")?;

    Ok(())
}
