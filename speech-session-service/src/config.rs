use serde::{Deserialize, Serialize};

use crate::error::{VoiceError, VoiceResult};

pub const DEFAULT_WHISPER_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";
pub const DEFAULT_LANGUAGE: &str = "ko";

/// Transcription backend settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranscriptionBackend {
    /// OpenAI-compatible `/v1/audio/transcriptions` endpoint. Also covers
    /// self-hosted Whisper servers that speak the same protocol.
    Whisper {
        api_url: String,
        api_key: Option<String>,
        model: String,
        language: String,
        timeout_secs: u64,
    },
    /// No transcription; every utterance scores against an empty transcript.
    Disabled,
}

/// Speech session configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpeechConfig {
    pub backend: TranscriptionBackend,
    /// Skip transcription and return a canned perfect result.
    pub dev_mode: bool,
    /// Artificial latency of the canned result.
    pub dev_delay_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: TranscriptionBackend::Whisper {
                api_url: DEFAULT_WHISPER_URL.to_string(),
                api_key: None,
                model: DEFAULT_WHISPER_MODEL.to_string(),
                language: DEFAULT_LANGUAGE.to_string(),
                timeout_secs: 30,
            },
            dev_mode: false,
            dev_delay_ms: 1200,
        }
    }
}

impl SpeechConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> VoiceResult<Self> {
        let defaults = Self::default();

        let dev_mode = std::env::var("SPEECH_DEV_MODE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.dev_mode);

        let dev_delay_ms = std::env::var("SPEECH_DEV_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.dev_delay_ms);

        let backend = match std::env::var("SPEECH_PROVIDER") {
            Ok(provider_type) => match provider_type.to_lowercase().as_str() {
                "whisper" | "openai" => Self::whisper_from_env(),
                "none" | "disabled" => TranscriptionBackend::Disabled,
                _ => {
                    return Err(VoiceError::Config(format!(
                        "Unknown speech provider: {}",
                        provider_type
                    )))
                }
            },
            Err(_) => Self::whisper_from_env(),
        };

        Ok(Self {
            backend,
            dev_mode,
            dev_delay_ms,
        })
    }

    fn whisper_from_env() -> TranscriptionBackend {
        TranscriptionBackend::Whisper {
            api_url: std::env::var("WHISPER_API_URL")
                .unwrap_or_else(|_| DEFAULT_WHISPER_URL.to_string()),
            api_key: std::env::var("WHISPER_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            model: std::env::var("WHISPER_MODEL")
                .unwrap_or_else(|_| DEFAULT_WHISPER_MODEL.to_string()),
            language: std::env::var("SPEECH_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string()),
            timeout_secs: std::env::var("WHISPER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Canned-result configuration for demos and integration tests.
    pub fn dev() -> Self {
        Self {
            dev_mode: true,
            dev_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_whisper_korean() {
        let config = SpeechConfig::default();
        assert!(!config.dev_mode);
        match config.backend {
            TranscriptionBackend::Whisper { model, language, .. } => {
                assert_eq!(model, "whisper-1");
                assert_eq!(language, "ko");
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[test]
    fn test_backend_serde_tag() {
        let json = serde_json::to_value(TranscriptionBackend::Disabled).unwrap();
        assert_eq!(json["type"], "disabled");
    }
}
