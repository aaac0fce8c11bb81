// Logger configuration
use serde::{Deserialize, Serialize};

use crate::redactor::{PiiRedactor, RedactionConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// `EnvFilter` directive, e.g. `info` or `training_history=debug`.
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            redaction_enabled: true,
        }
    }
}

impl LoggerConfig {
    /// Read `REHAB_LOG_LEVEL`, `REHAB_LOG_JSON` and `REHAB_REDACT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            log_level: std::env::var("REHAB_LOG_LEVEL").unwrap_or(defaults.log_level),
            json: std::env::var("REHAB_LOG_JSON")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.json),
            redaction_enabled: std::env::var("REHAB_REDACT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.redaction_enabled),
        }
    }

    pub fn redactor(&self) -> PiiRedactor {
        if self.redaction_enabled {
            PiiRedactor::new(RedactionConfig::default())
        } else {
            PiiRedactor::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json);
        assert!(config.redactor().is_enabled());
    }

    #[test]
    fn test_redaction_toggle() {
        let config = LoggerConfig {
            redaction_enabled: false,
            ..Default::default()
        };
        assert!(!config.redactor().is_enabled());
    }
}
