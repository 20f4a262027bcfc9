use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub recording: RecordingConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON key-value store file
    pub path: String,
    /// Directory for per-session WAV recordings
    pub recordings_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingConfig {
    /// Delay after stop before the transcript is committed, letting a final
    /// recognition result land
    pub settle_delay_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// Full inference endpoint URL (base + model)
    pub endpoint: String,
    /// Characters of transcript sent to the remote model; the rest is dropped
    pub max_input_chars: usize,
    pub max_length: u32,
    pub min_length: u32,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
