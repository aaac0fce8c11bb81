use async_trait::async_trait;

use crate::audio::AudioArtifact;
use crate::error::{VoiceError, VoiceResult};
use crate::providers::TranscriptionProvider;
use crate::transcription::TranscriptionPayload;

/// Backend used when transcription is switched off. Every request fails,
/// which the coordinator turns into the empty fallback transcript.
pub struct DisabledProvider;

#[async_trait]
impl TranscriptionProvider for DisabledProvider {
    async fn transcribe(&self, _audio: &AudioArtifact) -> VoiceResult<TranscriptionPayload> {
        Err(VoiceError::Config("transcription is disabled".to_string()))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
