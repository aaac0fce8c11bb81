//! Results reported by the six training steps
//!
//! 1. 청각 이해 (yes/no questions)
//! 2. 따라말하기 (repetition with lip tracking)
//! 3. 낱말-그림 매칭 (word recognition)
//! 4. 유창성 (situational spontaneous speech)
//! 5. 읽기 (reading aloud)
//! 6. 쓰기 (writing)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `part / whole`, zero when nothing was administered.
pub(crate) fn rate(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && part.is_finite() {
        part / whole
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YesNoItem {
    pub question: String,
    pub user_answer: Option<bool>,
    pub correct_answer: bool,
    pub is_correct: bool,
    /// Milliseconds.
    pub response_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step1Result {
    pub correct_answers: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub average_response_time: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<YesNoItem>,
}

impl Step1Result {
    pub fn new(correct_answers: u32, total_questions: u32) -> Self {
        Self {
            correct_answers,
            total_questions,
            average_response_time: 0.0,
            timestamp: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn correct_rate(&self) -> f64 {
        rate(f64::from(self.correct_answers), f64::from(self.total_questions))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepetitionItem {
    pub text: String,
    pub symmetry_score: f64,
    pub pronunciation_score: f64,
    pub audio_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Result {
    #[serde(default)]
    pub items: Vec<RepetitionItem>,
    #[serde(default)]
    pub average_symmetry: f64,
    pub average_pronunciation: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Step2Result {
    /// Averages are taken over `items`.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_items(items: Vec<RepetitionItem>) -> Self {
        let n = items.len().max(1) as f64;
        let average_symmetry = items.iter().map(|i| i.symmetry_score).sum::<f64>() / n;
        let average_pronunciation = items.iter().map(|i| i.pronunciation_score).sum::<f64>() / n;
        Self {
            items,
            average_symmetry,
            average_pronunciation,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step3Result {
    /// Per-item detail, kept as-is for the history record.
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    /// 0-100.
    pub score: f64,
    pub correct_count: u32,
    pub total_count: u32,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Step3Result {
    pub fn new(correct_count: u32, total_count: u32) -> Self {
        Self {
            items: Vec::new(),
            score: (rate(f64::from(correct_count), f64::from(total_count)) * 100.0).round(),
            correct_count,
            total_count,
            timestamp: Utc::now(),
        }
    }

    pub fn correct_rate(&self) -> f64 {
        rate(f64::from(self.correct_count), f64::from(self.total_count))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FluencyItem {
    pub situation: String,
    pub prompt: String,
    pub speech_duration: f64,
    pub silence_ratio: f64,
    pub average_amplitude: f64,
    pub peak_count: u32,
    /// 0-10.
    pub kwab_score: f64,
    /// 0-100.
    pub raw_score: f64,
}

/// Item score at or above which a situational prompt counts as answered.
pub const FLUENCY_PASS_SCORE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step4Result {
    #[serde(default)]
    pub items: Vec<FluencyItem>,
    pub average_kwab_score: f64,
    pub total_scenarios: u32,
    /// Same 0-10 scale as `average_kwab_score`.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub total_count: u32,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Step4Result {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn from_items(items: Vec<FluencyItem>) -> Self {
        let total = items.len() as u32;
        let average = rate(items.iter().map(|i| i.kwab_score).sum(), f64::from(total));
        let average = (average * 10.0).round() / 10.0;
        let passed = items.iter().filter(|i| i.kwab_score >= FLUENCY_PASS_SCORE).count() as u32;
        Self {
            items,
            average_kwab_score: average,
            total_scenarios: total,
            score: average,
            correct_count: passed,
            total_count: total,
            timestamp: Utc::now(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn passed_count(&self) -> u32 {
        self.items.iter().filter(|i| i.kwab_score >= FLUENCY_PASS_SCORE).count() as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingItem {
    pub text: String,
    pub audio_url: Option<String>,
    pub reading_score: Option<f64>,
    pub total_time: Option<f64>,
    pub words_per_minute: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step5Result {
    pub correct_answers: u32,
    pub total_questions: u32,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<ReadingItem>,
}

impl Step5Result {
    pub fn new(correct_answers: u32, total_questions: u32) -> Self {
        Self {
            correct_answers,
            total_questions,
            timestamp: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn correct_rate(&self) -> f64 {
        rate(f64::from(self.correct_answers), f64::from(self.total_questions))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WritingItem {
    pub word: String,
    pub expected_strokes: u32,
    /// Encoded drawing, usually a data URL.
    pub user_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step6Result {
    pub completed_tasks: u32,
    pub total_tasks: u32,
    /// 0-100.
    pub accuracy: f64,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<WritingItem>,
}

impl Step6Result {
    pub fn new(completed_tasks: u32, total_tasks: u32, accuracy: f64) -> Self {
        Self {
            completed_tasks,
            total_tasks,
            accuracy,
            timestamp: Utc::now(),
            items: Vec::new(),
        }
    }
}
