use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sub-scores for K-WAB items the training steps do not administer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringDefaults {
    /// 명령 이행, out of 80.
    pub command_score: f64,
    pub object_naming_score: f64,
    pub word_fluency_score: f64,
    pub sentence_completion_score: f64,
    pub sentence_response_score: f64,
}

impl Default for ScoringDefaults {
    fn default() -> Self {
        Self {
            command_score: 40.0,
            object_naming_score: 40.0,
            word_fluency_score: 10.0,
            sentence_completion_score: 6.0,
            sentence_response_score: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// JSON document backing the file store; `None` keeps everything in
    /// memory.
    pub store_path: Option<PathBuf>,
    /// Most recent entries kept per patient; `None` keeps all.
    pub history_limit: Option<usize>,
    pub defaults: ScoringDefaults,
    /// Log patient keys as hashes.
    pub redact_identifiers: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            history_limit: None,
            defaults: ScoringDefaults::default(),
            redact_identifiers: true,
        }
    }
}

impl HistoryConfig {
    /// Read `REHAB_STORE_PATH`, `REHAB_HISTORY_LIMIT` and `REHAB_REDACT`.
    pub fn from_env() -> Self {
        Self {
            store_path: std::env::var("REHAB_STORE_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            history_limit: std::env::var("REHAB_HISTORY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0),
            defaults: ScoringDefaults::default(),
            redact_identifiers: std::env::var("REHAB_REDACT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
