use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::audio::{level_from_samples, AudioArtifact};
use crate::error::{CaptureError, CaptureResult};

/// Receives a 0-100 level on every sampling tick.
pub type LevelCallback = Box<dyn FnMut(f64) + Send>;

/// A previously acquired input stream that can be reused instead of asking
/// for the device again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHandle {
    pub device: String,
}

/// Audio input device.
#[async_trait]
pub trait AudioCapture: Send {
    /// Begin buffering audio and reporting levels.
    async fn start(&mut self, on_level: LevelCallback, existing: Option<StreamHandle>) -> CaptureResult<()>;

    /// Stop and hand over everything buffered since `start`.
    async fn stop(&mut self) -> CaptureResult<AudioArtifact>;

    /// Stop, release the device and drop the buffer.
    async fn cancel(&mut self);

    /// Handle of the currently open stream, if any.
    fn stream(&self) -> Option<StreamHandle> {
        None
    }
}

/// Level sampling window.
pub const LEVEL_WINDOW_MS: u32 = 20;

/// Replays a WAV file as if it were being spoken into a microphone.
///
/// Levels are computed per 20 ms window and delivered during `start`; the
/// file's bytes become the uploaded artifact.
pub struct WavFileCapture {
    path: PathBuf,
    buffered: Option<AudioArtifact>,
}

impl WavFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffered: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[allow(clippy::cast_possible_truncation)]
fn int_to_i16(value: i32, bits_per_sample: u16) -> i16 {
    let shift = i32::from(bits_per_sample) - 16;
    let scaled = if shift >= 0 { value >> shift } else { value << -shift };
    scaled.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Interleaved samples per level window.
fn level_window(sample_rate: u32, channels: usize) -> CaptureResult<usize> {
    let frames = u64::from(sample_rate) * u64::from(LEVEL_WINDOW_MS) / 1000;
    usize::try_from(frames)
        .ok()
        .and_then(|f| f.checked_mul(channels))
        .ok_or_else(|| CaptureError::Unavailable(format!("unsupported sample rate: {sample_rate} Hz")))
}

fn decode(bytes: &[u8]) -> CaptureResult<(hound::WavSpec, Vec<i16>)> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| CaptureError::Unavailable(format!("unreadable WAV data: {e}")))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| int_to_i16(v, spec.bits_per_sample)))
            .collect::<Result<Vec<_>, _>>(),
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(float_to_i16))
            .collect::<Result<Vec<_>, _>>(),
    }
    .map_err(|e| CaptureError::Unavailable(format!("corrupt WAV samples: {e}")))?;

    Ok((spec, samples))
}

#[async_trait]
impl AudioCapture for WavFileCapture {
    async fn start(&mut self, mut on_level: LevelCallback, existing: Option<StreamHandle>) -> CaptureResult<()> {
        if let Some(handle) = existing {
            self.path = PathBuf::from(handle.device);
        }

        let bytes = tokio::fs::read(&self.path).await?;
        let (spec, samples) = decode(&bytes)?;

        let channels = usize::from(spec.channels.max(1));
        let window = level_window(spec.sample_rate, channels)?;
        for chunk in samples.chunks(window.max(1)) {
            on_level(level_from_samples(chunk));
        }

        let frames = (samples.len() / channels) as u64;
        let duration_ms = frames * 1000 / u64::from(spec.sample_rate.max(1));

        info!(
            path = %self.path.display(),
            sample_rate = spec.sample_rate,
            duration_ms,
            "Replaying WAV capture"
        );

        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "audio.wav".to_string(), |n| n.to_string_lossy().into_owned());
        self.buffered = Some(
            AudioArtifact::new(bytes, "audio/wav", file_name).with_format(spec.sample_rate, duration_ms),
        );
        Ok(())
    }

    async fn stop(&mut self) -> CaptureResult<AudioArtifact> {
        self.buffered
            .take()
            .ok_or_else(|| CaptureError::Unavailable("capture was not started".to_string()))
    }

    async fn cancel(&mut self) {
        if self.buffered.take().is_some() {
            debug!(path = %self.path.display(), "Discarded buffered WAV capture");
        }
    }

    fn stream(&self) -> Option<StreamHandle> {
        Some(StreamHandle {
            device: self.path.to_string_lossy().into_owned(),
        })
    }
}
