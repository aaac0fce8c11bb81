use serde::{Deserialize, Serialize};

use crate::audio::AudioArtifact;

/// One segment of a `verbose_json` transcription response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSegment {
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub no_speech_prob: f64,
}

impl TranscriptionSegment {
    pub fn silence() -> Self {
        Self {
            no_speech_prob: 1.0,
            ..Default::default()
        }
    }
}

/// What a transcription backend returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionPayload {
    pub text: String,
    pub language: Option<String>,
    pub duration: Option<f64>,
    pub segments: Vec<TranscriptionSegment>,
}

impl TranscriptionPayload {
    /// Substitute for a failed request: no text, certainly no speech.
    pub fn fallback() -> Self {
        Self {
            segments: vec![TranscriptionSegment::silence()],
            ..Default::default()
        }
    }

    /// Mean `no_speech_prob` over all segments; zero when there are none.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_no_speech_prob(&self) -> f64 {
        let sum: f64 = self
            .segments
            .iter()
            .map(|s| if s.no_speech_prob.is_finite() { s.no_speech_prob } else { 0.0 })
            .sum();
        sum / self.segments.len().max(1) as f64
    }

    /// `1 - mean(no_speech_prob)`, clamped to `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        (1.0 - self.mean_no_speech_prob()).clamp(0.0, 1.0)
    }
}

/// Per-channel accuracies carried alongside the rounded score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationDetails {
    pub consonant_accuracy: f64,
    pub vowel_accuracy: f64,
}

/// Outcome of one record → transcribe → score cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAnalysisResult {
    pub transcript: String,
    /// 0-1.
    pub confidence: f64,
    /// Rounded clarity score, 0-100.
    pub pronunciation_score: u8,
    pub duration_ms: u64,
    /// Mean display level during the recording, 0-100.
    pub audio_level: f64,
    #[serde(skip)]
    pub audio: Option<AudioArtifact>,
    pub details: Option<PronunciationDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_from_segments() {
        let payload = TranscriptionPayload {
            text: "물 주세요".into(),
            segments: vec![
                TranscriptionSegment {
                    no_speech_prob: 0.1,
                    ..Default::default()
                },
                TranscriptionSegment {
                    no_speech_prob: 0.3,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!((payload.confidence() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_no_segments_is_full_confidence() {
        let payload = TranscriptionPayload {
            text: "네".into(),
            ..Default::default()
        };
        assert_eq!(payload.mean_no_speech_prob(), 0.0);
        assert_eq!(payload.confidence(), 1.0);
    }

    #[test]
    fn test_fallback_has_zero_confidence() {
        let fallback = TranscriptionPayload::fallback();
        assert!(fallback.text.is_empty());
        assert_eq!(fallback.confidence(), 0.0);
    }

    #[test]
    fn test_parses_verbose_json() {
        let json = r#"{
            "task": "transcribe",
            "language": "korean",
            "duration": 1.5,
            "text": "사과",
            "segments": [{"id": 0, "start": 0.0, "end": 1.5, "text": "사과",
                          "avg_logprob": -0.2, "no_speech_prob": 0.05}]
        }"#;
        let payload: TranscriptionPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.text, "사과");
        assert_eq!(payload.segments.len(), 1);
        assert!((payload.confidence() - 0.95).abs() < 1e-9);
    }
}
