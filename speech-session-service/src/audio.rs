use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display levels are dB relative to full scale shifted up by this much,
/// so -60 dBFS and below read as silence.
const LEVEL_FLOOR_DB: f64 = 60.0;

/// Recorded audio handed from capture to transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioArtifact {
    pub id: Uuid,
    /// Encoded audio exactly as it will be uploaded.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    pub sample_rate: u32,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl AudioArtifact {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes,
            mime_type: mime_type.into(),
            file_name: file_name.into(),
            sample_rate: 0,
            duration_ms: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_format(mut self, sample_rate: u32, duration_ms: u64) -> Self {
        self.sample_rate = sample_rate;
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Level from an analyser's byte frequency bins: `max(0, 20·log10(avg/255) + 60)`.
pub fn level_from_spectrum(bins: &[u8]) -> f64 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u64 = bins.iter().map(|b| u64::from(*b)).sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum as f64 / bins.len() as f64;
    to_level(average / 255.0)
}

/// Level from PCM samples: RMS in dBFS shifted by 60.
pub fn level_from_samples(samples: &[i16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|s| {
            let v = f64::from(*s) / f64::from(i16::MAX);
            v * v
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let rms = (sum_sq / samples.len() as f64).sqrt();
    to_level(rms)
}

fn to_level(amplitude: f64) -> f64 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    (20.0 * amplitude.log10() + LEVEL_FLOOR_DB).clamp(0.0, 100.0)
}

/// Running statistics of the levels seen during one recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelStats {
    pub samples: Vec<f64>,
    pub peak: f64,
}

impl LevelStats {
    pub fn record(&mut self, level: f64) {
        self.samples.push(level);
        if level > self.peak {
            self.peak = level;
        }
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = self.samples.len() as f64;
        self.samples.iter().sum::<f64>() / len
    }
}
