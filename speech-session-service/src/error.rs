use thiserror::Error;

/// Transcription backend failures. These never leave `stop_analysis`; the
/// coordinator logs them and scores the fallback payload instead.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

/// Microphone / capture device failures, split by what the user can do
/// about them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("No capture device found: {0}")]
    DeviceNotFound(String),

    #[error("Capture device busy: {0}")]
    DeviceBusy(String),

    #[error("Audio capture unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CaptureError::DeviceNotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::WouldBlock => CaptureError::DeviceBusy(err.to_string()),
            _ => CaptureError::Unavailable(err.to_string()),
        }
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

pub type SpeechResult<T> = Result<T, SpeechError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classes() {
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(CaptureError::from(not_found), CaptureError::DeviceNotFound(_)));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(CaptureError::from(denied), CaptureError::PermissionDenied(_)));

        let other = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(matches!(CaptureError::from(other), CaptureError::Unavailable(_)));
    }

    #[test]
    fn test_capture_error_is_transparent() {
        let err = SpeechError::from(CaptureError::DeviceBusy("in use".into()));
        assert_eq!(err.to_string(), "Capture device busy: in use");
    }
}
