use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hangul::decompose;
use crate::similarity::similarity;

/// Expected vs. heard utterance for one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtterancePair {
    pub expected: String,
    pub actual: String,
}

impl UtterancePair {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Pronunciation metrics for one utterance. Accuracies are percentages in
/// `[0, 100]`; `speed_ratio` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationMetrics {
    /// Whole-utterance similarity on the normalized text.
    pub syllable_accuracy: f64,
    /// Alias of `syllable_accuracy`; there is no separate prosodic model.
    pub tonal_accuracy: f64,
    /// Normalized actual length over normalized expected length.
    pub speed_ratio: f64,
    /// Mean of consonant and vowel accuracy.
    pub clarity_score: f64,
    pub consonant_accuracy: f64,
    pub vowel_accuracy: f64,
}

/// Strip every whitespace character and lowercase the rest.
pub fn normalize_utterance(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Grades a spoken attempt against its target sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PronunciationAnalyzer;

impl PronunciationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn analyze_detailed(&self, expected: &str, actual: &str) -> PronunciationMetrics {
        let expected_clean = normalize_utterance(expected);
        let actual_clean = normalize_utterance(actual);

        let expected_parts = decompose(&expected_clean);
        let actual_parts = decompose(&actual_clean);

        let consonant_accuracy = similarity(&expected_parts.consonants, &actual_parts.consonants);
        let vowel_accuracy = similarity(&expected_parts.vowels, &actual_parts.vowels);
        let syllable_accuracy = similarity(&expected_clean, &actual_clean);

        let expected_len = expected_clean.chars().count().max(1);
        let speed_ratio = actual_clean.chars().count() as f64 / expected_len as f64;

        let clarity_score = (consonant_accuracy + vowel_accuracy) / 2.0;

        debug!(
            consonant_accuracy,
            vowel_accuracy,
            syllable_accuracy,
            clarity_score,
            "Pronunciation analyzed"
        );

        PronunciationMetrics {
            syllable_accuracy,
            tonal_accuracy: syllable_accuracy,
            speed_ratio,
            clarity_score,
            consonant_accuracy,
            vowel_accuracy,
        }
    }

    pub fn analyze_pair(&self, pair: &UtterancePair) -> PronunciationMetrics {
        self.analyze_detailed(&pair.expected, &pair.actual)
    }
}

/// Shorthand for `PronunciationAnalyzer::new().analyze_detailed(..)`.
pub fn analyze(expected: &str, actual: &str) -> PronunciationMetrics {
    PronunciationAnalyzer::new().analyze_detailed(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_utterance() {
        assert_eq!(normalize_utterance(" Hello  World\t"), "helloworld");
        assert_eq!(normalize_utterance("물 주세요"), "물주세요");
    }

    #[test]
    fn test_identical_utterance() {
        let m = analyze("물 주세요", "물주세요");
        assert_eq!(m.consonant_accuracy, 100.0);
        assert_eq!(m.vowel_accuracy, 100.0);
        assert_eq!(m.syllable_accuracy, 100.0);
        assert_eq!(m.clarity_score, 100.0);
        assert_eq!(m.speed_ratio, 1.0);
    }

    #[test]
    fn test_empty_actual_scores_zero() {
        let m = analyze("사과", "");
        assert_eq!(m.consonant_accuracy, 0.0);
        assert_eq!(m.vowel_accuracy, 0.0);
        assert_eq!(m.clarity_score, 0.0);
        assert_eq!(m.speed_ratio, 0.0);
    }

    #[test]
    fn test_empty_both_is_perfect() {
        let m = analyze("", "");
        assert_eq!(m.clarity_score, 100.0);
        assert_eq!(m.speed_ratio, 0.0);
    }

    #[test]
    fn test_vowel_error_only() {
        // 사과 vs 사고: same consonants, one vowel differs
        let m = analyze("사과", "사고");
        assert_eq!(m.consonant_accuracy, 100.0);
        assert_eq!(m.vowel_accuracy, 50.0);
        assert_eq!(m.clarity_score, 75.0);
    }

    #[test]
    fn test_tonal_is_syllable_alias() {
        let m = analyze("안녕하세요", "안녕하새요");
        assert_eq!(m.tonal_accuracy, m.syllable_accuracy);
        assert!((m.syllable_accuracy - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_case_folding_for_latin_text() {
        let m = analyze("TV", "tv");
        assert_eq!(m.clarity_score, 100.0);
    }
}
