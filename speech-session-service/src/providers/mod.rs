pub mod disabled;
pub mod whisper;

use std::sync::Arc;

use async_trait::async_trait;

use crate::audio::AudioArtifact;
use crate::config::TranscriptionBackend;
use crate::error::VoiceResult;
use crate::transcription::TranscriptionPayload;

/// Speech-to-text backend.
///
/// One request per utterance; the coordinator never has two in flight.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe one recorded utterance
    async fn transcribe(&self, audio: &AudioArtifact) -> VoiceResult<TranscriptionPayload>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Create a provider instance based on configuration
pub fn create_provider(backend: &TranscriptionBackend) -> VoiceResult<Arc<dyn TranscriptionProvider>> {
    match backend {
        TranscriptionBackend::Whisper { .. } => Ok(Arc::new(whisper::WhisperProvider::new(backend)?)),
        TranscriptionBackend::Disabled => Ok(Arc::new(disabled::DisabledProvider)),
    }
}
