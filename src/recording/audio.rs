use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::{NotesError, Result};

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for an audio capture stream
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Frame size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            buffer_duration_ms: 100,
        }
    }
}

/// One audio-capture stream, exclusively owned by the recording session that
/// opened it.
///
/// `start` hands back a channel of frames; the channel closes when capture
/// ends. `pause` stops frame delivery without releasing the device; `stop`
/// releases it.
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Start capturing. Returns a channel receiver of audio frames.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Suspend frame delivery, keeping the device open.
    async fn pause(&mut self) -> Result<()>;

    /// Resume frame delivery after a pause.
    async fn resume(&mut self) -> Result<()>;

    /// Stop capturing and release the device.
    async fn stop(&mut self) -> Result<()>;

    /// Whether the stream is currently open.
    fn is_capturing(&self) -> bool;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Capture backend that streams an existing WAV file in real time, for
/// batch processing and tests. Pausing holds the playback position.
pub struct FileCapture {
    path: PathBuf,
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    frame_ms: u64,
    running: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl FileCapture {
    pub fn open(path: &Path, config: CaptureConfig) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .map_err(|e| NotesError::Device(format!("cannot open {}: {e}", path.display())))?;

        let spec = reader.spec();
        let samples: std::result::Result<Vec<i16>, _> = reader.into_samples::<i16>().collect();
        let samples = samples
            .map_err(|e| NotesError::Device(format!("cannot decode {}: {e}", path.display())))?;

        info!(
            "File capture ready: {} ({} samples, {} Hz, {} ch)",
            path.display(),
            samples.len(),
            spec.sample_rate,
            spec.channels
        );

        Ok(Self {
            path: path.to_path_buf(),
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            frame_ms: config.buffer_duration_ms,
            running: Arc::new(AtomicBool::new(false)),
            paused: Arc::new(AtomicBool::new(false)),
            task: None,
        })
    }
}

#[async_trait::async_trait]
impl AudioCapture for FileCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.running.load(Ordering::SeqCst) {
            return Err(NotesError::Device(format!(
                "{} is already capturing",
                self.path.display()
            )));
        }

        let (tx, rx) = mpsc::channel(64);

        self.running.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);

        let samples = std::mem::take(&mut self.samples);
        let samples_per_frame =
            (self.sample_rate as u64 * self.channels as u64 * self.frame_ms / 1000) as usize;
        let samples_per_frame = samples_per_frame.max(1);
        let sample_rate = self.sample_rate;
        let channels = self.channels;
        let frame_ms = self.frame_ms;
        let running = Arc::clone(&self.running);
        let paused = Arc::clone(&self.paused);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(frame_ms));
            let mut offset = 0usize;
            let mut timestamp_ms = 0u64;

            while running.load(Ordering::SeqCst) && offset < samples.len() {
                interval.tick().await;

                if paused.load(Ordering::SeqCst) {
                    continue;
                }

                let end = (offset + samples_per_frame).min(samples.len());
                let frame = AudioFrame {
                    samples: samples[offset..end].to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms,
                };

                if tx.send(frame).await.is_err() {
                    break;
                }

                offset = end;
                timestamp_ms += frame_ms;
            }

            running.store(false, Ordering::SeqCst);
        });

        self.task = Some(task);

        Ok(rx)
    }

    async fn pause(&mut self) -> Result<()> {
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&mut self) -> Result<()> {
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
