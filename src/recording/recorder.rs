use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;

use super::audio::AudioFrame;
use crate::error::{NotesError, Result};

/// A finished per-session audio file.
#[derive(Debug, Clone)]
pub struct RecordingFile {
    pub path: PathBuf,
    pub sample_count: usize,
    pub duration_secs: f64,
}

/// Drains capture frames into one WAV file per recording session.
///
/// The WAV spec is taken from the first frame; the file is only created once
/// a frame arrives, so a session that captured nothing leaves nothing on
/// disk.
pub struct SessionRecorder {
    path: PathBuf,
}

impl SessionRecorder {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Consume frames until the channel closes.
    pub async fn record(self, mut rx: mpsc::Receiver<AudioFrame>) -> Result<Option<RecordingFile>> {
        let mut writer: Option<hound::WavWriter<BufWriter<File>>> = None;
        let mut sample_rate = 0u32;
        let mut channels = 0u16;
        let mut sample_count = 0usize;

        while let Some(frame) = rx.recv().await {
            if writer.is_none() {
                if let Some(dir) = self.path.parent() {
                    fs::create_dir_all(dir)?;
                }

                let spec = hound::WavSpec {
                    channels: frame.channels,
                    sample_rate: frame.sample_rate,
                    bits_per_sample: 16,
                    sample_format: hound::SampleFormat::Int,
                };

                writer = Some(hound::WavWriter::create(&self.path, spec).map_err(|e| {
                    NotesError::Storage(format!("cannot create {}: {e}", self.path.display()))
                })?);
                sample_rate = frame.sample_rate;
                channels = frame.channels;
            }

            if let Some(w) = &mut writer {
                for &sample in &frame.samples {
                    w.write_sample(sample).map_err(|e| {
                        NotesError::Storage(format!("cannot write {}: {e}", self.path.display()))
                    })?;
                }
                sample_count += frame.samples.len();
            }
        }

        let Some(w) = writer else {
            return Ok(None);
        };

        w.finalize().map_err(|e| {
            NotesError::Storage(format!("cannot finalize {}: {e}", self.path.display()))
        })?;

        let duration_secs = sample_count as f64 / (sample_rate as f64 * channels as f64);

        info!(
            "Session audio saved: {} ({:.1}s, {} samples)",
            self.path.display(),
            duration_secs,
            sample_count
        );

        Ok(Some(RecordingFile {
            path: self.path,
            sample_count,
            duration_secs,
        }))
    }
}
