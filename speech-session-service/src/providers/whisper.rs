/// OpenAI Whisper provider
///
/// Uploads the recording as multipart form data to an OpenAI-compatible
/// `/v1/audio/transcriptions` endpoint and asks for `verbose_json`, which
/// carries the per-segment `no_speech_prob` used for confidence.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, StatusCode};
use tracing::debug;

use crate::audio::AudioArtifact;
use crate::config::TranscriptionBackend;
use crate::error::{VoiceError, VoiceResult};
use crate::providers::TranscriptionProvider;
use crate::transcription::TranscriptionPayload;

pub struct WhisperProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    language: String,
}

impl WhisperProvider {
    pub fn new(backend: &TranscriptionBackend) -> VoiceResult<Self> {
        let TranscriptionBackend::Whisper {
            api_url,
            api_key,
            model,
            language,
            timeout_secs,
        } = backend
        else {
            return Err(VoiceError::Config(
                "Whisper provider requires a whisper backend".to_string(),
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.clone(),
            api_key: api_key.clone(),
            model: model.clone(),
            language: language.clone(),
        })
    }

    fn form(&self, audio: &AudioArtifact) -> VoiceResult<multipart::Form> {
        let file = multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(&audio.mime_type)?;

        Ok(multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("response_format", "verbose_json"))
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperProvider {
    async fn transcribe(&self, audio: &AudioArtifact) -> VoiceResult<TranscriptionPayload> {
        if audio.is_empty() {
            return Err(VoiceError::Transcription("empty recording".to_string()));
        }

        debug!(
            audio_size = audio.bytes.len(),
            mime_type = %audio.mime_type,
            model = %self.model,
            "Sending audio to Whisper"
        );

        let mut request = self.client.post(&self.api_url).multipart(self.form(audio)?);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(VoiceError::Authentication(format!(
                "Whisper rejected credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Provider(format!(
                "Whisper returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let payload: TranscriptionPayload = serde_json::from_str(&body)?;
        debug!(segments = payload.segments.len(), "Whisper transcription received");
        Ok(payload)
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}
