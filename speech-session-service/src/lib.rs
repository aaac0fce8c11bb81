//! Speech session coordinator for rehabilitation exercises
//!
//! Records one utterance at a time, sends it to a transcription backend and
//! grades the transcript against the sentence the patient was asked to say.
//!
//! # Collaborators
//!
//! - [`AudioCapture`] - microphone or file input, reporting 0-100 levels
//! - [`TranscriptionProvider`] - speech-to-text (OpenAI-compatible Whisper by
//!   default, see [`providers`])
//! - [`FaceTracker`] - optional lip symmetry readings taken alongside
//!
//! A failed transcription never fails the exercise: the coordinator scores
//! an empty transcript with zero confidence instead. With
//! `SPEECH_DEV_MODE=true` no request is made and a perfect canned result is
//! returned after a short delay.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use speech_session_service::{SpeechAnalyzer, SpeechConfig, WavFileCapture};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SpeechConfig::from_env()?;
//! let mut analyzer = SpeechAnalyzer::new(WavFileCapture::new("attempt.wav"), config)?;
//!
//! analyzer.start_analysis(None, None).await?;
//! let result = analyzer.stop_analysis("물 주세요").await?;
//!
//! println!("{} -> {}", result.transcript, result.pronunciation_score);
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod face;
pub mod fluency;
pub mod providers;
pub mod service;
pub mod transcription;

pub use audio::*;
pub use capture::*;
pub use config::*;
pub use error::*;
pub use face::{FaceTracker, Landmark, LipMetrics};
pub use fluency::FluencyMetrics;
pub use providers::{create_provider, TranscriptionProvider};
pub use service::*;
pub use transcription::*;
