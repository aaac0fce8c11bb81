//! Amplitude-based fluency estimate for the spontaneous-speech step
//!
//! Works on the level history collected while the patient answers an open
//! question: how long they spoke, how much of the window was silence, and
//! how many separate bursts of speech occurred.

use serde::{Deserialize, Serialize};

/// Levels below this are silence.
pub const SILENCE_THRESHOLD: f64 = 15.0;
/// A burst starts when the level rises above this.
pub const PEAK_THRESHOLD: f64 = SILENCE_THRESHOLD * 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FluencyMetrics {
    pub total_duration_secs: f64,
    pub speech_duration_secs: f64,
    /// Percentage of the window spent silent.
    pub silence_ratio: f64,
    pub average_level: f64,
    pub peak_count: u32,
    /// Heuristic score, 0-100.
    pub fluency_score: u8,
    /// `fluency_score` mapped onto the 0-10 K-WAB scale.
    pub kwab_score: u8,
}

impl FluencyMetrics {
    /// `levels` are evenly spaced over `total_secs`; `min_duration_secs` is
    /// how long a full answer to the prompt is expected to take.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_levels(levels: &[f64], total_secs: f64, min_duration_secs: f64) -> Self {
        let total_secs = if total_secs.is_finite() { total_secs.max(0.0) } else { 0.0 };

        let speech_frames = levels.iter().filter(|l| **l >= SILENCE_THRESHOLD).count();
        let speech_secs = speech_frames as f64 / levels.len().max(1) as f64 * total_secs;
        let silence_ratio = (total_secs - speech_secs) / total_secs.max(1.0) * 100.0;

        let mut peak_count = 0u32;
        let mut in_peak = false;
        for level in levels {
            if *level > PEAK_THRESHOLD && !in_peak {
                peak_count += 1;
                in_peak = true;
            } else if *level < SILENCE_THRESHOLD {
                in_peak = false;
            }
        }

        let duration_score = if min_duration_secs > 0.0 {
            (speech_secs / min_duration_secs * 50.0).min(50.0)
        } else {
            0.0
        };
        let silence_score = (30.0 - silence_ratio * 0.5).max(0.0);
        let peak_score = (f64::from(peak_count) * 2.0).min(20.0);
        let raw = (duration_score + silence_score + peak_score).round().clamp(0.0, 100.0);

        let average_level = if levels.is_empty() {
            0.0
        } else {
            levels.iter().sum::<f64>() / levels.len() as f64
        };

        Self {
            total_duration_secs: total_secs,
            speech_duration_secs: round1(speech_secs),
            silence_ratio: round1(silence_ratio),
            average_level: round1(average_level),
            peak_count,
            fluency_score: raw as u8,
            kwab_score: (raw / 10.0).round() as u8,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_only() {
        let m = FluencyMetrics::from_levels(&[0.0; 100], 10.0, 10.0);
        assert_eq!(m.speech_duration_secs, 0.0);
        assert_eq!(m.silence_ratio, 100.0);
        assert_eq!(m.peak_count, 0);
        assert_eq!(m.fluency_score, 0);
        assert_eq!(m.kwab_score, 0);
    }

    #[test]
    fn test_continuous_speech() {
        // five bursts separated by pauses, 80% voiced
        let mut levels = Vec::new();
        for _ in 0..5 {
            levels.extend([40.0; 16]);
            levels.extend([5.0; 4]);
        }
        let m = FluencyMetrics::from_levels(&levels, 10.0, 8.0);
        assert_eq!(m.peak_count, 5);
        assert_eq!(m.speech_duration_secs, 8.0);
        assert_eq!(m.silence_ratio, 20.0);
        // 50 + 20 + 10
        assert_eq!(m.fluency_score, 80);
        assert_eq!(m.kwab_score, 8);
    }

    #[test]
    fn test_peak_requires_reset_below_silence() {
        // dips to 20 do not end a burst
        let levels = [35.0, 20.0, 35.0, 20.0, 35.0, 10.0, 35.0];
        let m = FluencyMetrics::from_levels(&levels, 7.0, 7.0);
        assert_eq!(m.peak_count, 2);
    }

    #[test]
    fn test_degenerate_inputs() {
        let m = FluencyMetrics::from_levels(&[], 0.0, 0.0);
        assert_eq!(m.fluency_score, 30);
        let m = FluencyMetrics::from_levels(&[50.0], f64::NAN, 5.0);
        assert_eq!(m.total_duration_secs, 0.0);
    }
}
