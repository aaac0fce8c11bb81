use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use pronunciation_analyzer::PronunciationAnalyzer;
use tracing::{debug, info, warn};

use crate::audio::LevelStats;
use crate::capture::{AudioCapture, LevelCallback, StreamHandle};
use crate::config::SpeechConfig;
use crate::error::{SpeechError, SpeechResult, VoiceResult};
use crate::providers::{create_provider, TranscriptionProvider};
use crate::transcription::{PronunciationDetails, SpeechAnalysisResult, TranscriptionPayload};

/// Audio level reported by canned results.
const DEV_AUDIO_LEVEL: f64 = 45.0;
const DEV_CONFIDENCE: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

/// Drives one utterance at a time through capture, transcription and
/// pronunciation scoring.
pub struct SpeechAnalyzer<C: AudioCapture> {
    capture: C,
    provider: Arc<dyn TranscriptionProvider>,
    analyzer: PronunciationAnalyzer,
    config: SpeechConfig,
    state: SessionState,
    started_at: Option<Instant>,
    levels: Arc<Mutex<LevelStats>>,
}

impl<C: AudioCapture> SpeechAnalyzer<C> {
    /// Build with the provider selected by `config`
    pub fn new(capture: C, config: SpeechConfig) -> VoiceResult<Self> {
        let provider = create_provider(&config.backend)?;
        Ok(Self::with_provider(capture, provider, config))
    }

    pub fn with_provider(capture: C, provider: Arc<dyn TranscriptionProvider>, config: SpeechConfig) -> Self {
        if config.dev_mode {
            info!("Speech analyzer running in dev mode, transcription is bypassed");
        }

        Self {
            capture,
            provider,
            analyzer: PronunciationAnalyzer::new(),
            config,
            state: SessionState::Idle,
            started_at: None,
            levels: Arc::new(Mutex::new(LevelStats::default())),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Stream to hand to the next step so it can skip re-acquiring the
    /// device.
    pub fn stream(&self) -> Option<StreamHandle> {
        self.capture.stream()
    }

    /// Start recording. Capture failures propagate unchanged; nothing is
    /// retried here.
    pub async fn start_analysis(
        &mut self,
        on_level: Option<LevelCallback>,
        existing: Option<StreamHandle>,
    ) -> SpeechResult<()> {
        if self.is_recording() {
            return Err(SpeechError::AlreadyRecording);
        }

        *self.levels.lock() = LevelStats::default();
        let stats = Arc::clone(&self.levels);
        let mut forward = on_level;
        let callback: LevelCallback = Box::new(move |level: f64| {
            let level = level.clamp(0.0, 100.0);
            stats.lock().record(level);
            if let Some(cb) = forward.as_mut() {
                cb(level);
            }
        });

        self.capture.start(callback, existing).await?;
        self.started_at = Some(Instant::now());
        self.state = SessionState::Recording;
        debug!(provider = self.provider.name(), "Recording started");
        Ok(())
    }

    /// Stop recording and score the utterance against `expected`.
    ///
    /// Transcription failures are logged and scored as an empty transcript,
    /// so this only fails when nothing was recording or capture itself
    /// broke.
    pub async fn stop_analysis(&mut self, expected: &str) -> SpeechResult<SpeechAnalysisResult> {
        if !self.is_recording() {
            return Err(SpeechError::NotRecording);
        }

        let captured = self.capture.stop().await;
        self.state = SessionState::Idle;
        let audio = captured?;

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = self
            .started_at
            .take()
            .map_or(0, |t| t.elapsed().as_millis() as u64)
            .max(audio.duration_ms);
        let audio_level = self.levels.lock().mean();

        if self.config.dev_mode {
            tokio::time::sleep(Duration::from_millis(self.config.dev_delay_ms)).await;
            info!(duration_ms, "Returning canned dev-mode result");
            return Ok(SpeechAnalysisResult {
                transcript: expected.to_string(),
                confidence: DEV_CONFIDENCE,
                pronunciation_score: 100,
                duration_ms,
                audio_level: DEV_AUDIO_LEVEL,
                audio: Some(audio),
                details: Some(PronunciationDetails {
                    consonant_accuracy: 100.0,
                    vowel_accuracy: 100.0,
                }),
            });
        }

        let payload = match self.provider.transcribe(&audio).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    provider = self.provider.name(),
                    error = %err,
                    "Transcription failed, scoring empty transcript"
                );
                TranscriptionPayload::fallback()
            }
        };

        let metrics = self.analyzer.analyze_detailed(expected, &payload.text);
        let confidence = payload.confidence();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pronunciation_score = metrics.clarity_score.round().clamp(0.0, 100.0) as u8;

        info!(
            duration_ms,
            confidence,
            pronunciation_score,
            "Utterance analyzed"
        );

        Ok(SpeechAnalysisResult {
            transcript: payload.text,
            confidence,
            pronunciation_score,
            duration_ms,
            audio_level,
            audio: Some(audio),
            details: Some(PronunciationDetails {
                consonant_accuracy: metrics.consonant_accuracy,
                vowel_accuracy: metrics.vowel_accuracy,
            }),
        })
    }

    /// Abort the recording and drop buffered audio. A no-op when idle.
    pub async fn cancel_analysis(&mut self) {
        if !self.is_recording() {
            return;
        }
        self.capture.cancel().await;
        self.state = SessionState::Idle;
        self.started_at = None;
        *self.levels.lock() = LevelStats::default();
        debug!("Recording cancelled");
    }
}
