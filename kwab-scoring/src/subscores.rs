//! Raw-count sub-scorers
//!
//! These convert behavioural counts into the point allocations of the
//! instrument before the domain inputs are assembled. Content delivery and
//! fluency come from the published criteria sheets and are table lookups.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::quotients::round2;

/// Counts for the 내용전달 (information content) criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDeliveryInput {
    /// Correct answers among the first six conversational questions.
    pub correct_answers: u32,
    /// Objects, people or actions named in the picture description.
    pub picture_description_items: u32,
    /// Picture described in complete sentences with a reasonable account.
    /// Lifts a 9 to the full 10.
    pub complete_picture_description: bool,
}

/// Score for answer counts no row covers, including five answers with a
/// rich picture description and more than six answers.
const CONTENT_FALLBACK: u8 = 4;

/// `(correct answers, picture items, score)`; first match wins.
const CONTENT_TABLE: [(u32, RangeInclusive<u32>, u8); 11] = [
    (0, 0..=u32::MAX, 0),
    (1, 0..=u32::MAX, 2),
    (2, 0..=u32::MAX, 3),
    (3, 1..=u32::MAX, 5),
    (3, 0..=0, 4),
    (4, 6..=u32::MAX, 7),
    (4, 1..=5, 6),
    (4, 0..=0, 4),
    (5, 0..=5, 8),
    (6, 10..=u32::MAX, 9),
    (6, 0..=9, 8),
];

pub fn score_content_delivery(input: &ContentDeliveryInput) -> u8 {
    let score = CONTENT_TABLE
        .iter()
        .find(|(answers, items, _)| {
            *answers == input.correct_answers && items.contains(&input.picture_description_items)
        })
        .map_or(CONTENT_FALLBACK, |(_, _, score)| *score);

    if score == 9 && input.complete_picture_description {
        10
    } else {
        score
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechRate {
    #[default]
    Normal,
    Slow,
    VerySlow,
}

/// Utterance length bucket used by the fluency criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceLength {
    Silent,
    /// Fewer than seven syllables per utterance.
    Short,
    Long,
}

impl UtteranceLength {
    pub const LONG_THRESHOLD: f64 = 7.0;

    pub fn of(syllables_per_utterance: f64) -> Self {
        if !syllables_per_utterance.is_finite() || syllables_per_utterance <= 0.0 {
            UtteranceLength::Silent
        } else if syllables_per_utterance < Self::LONG_THRESHOLD {
            UtteranceLength::Short
        } else {
            UtteranceLength::Long
        }
    }
}

/// Observations for the 유창성 (fluency) criteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FluencyInput {
    pub syllables_per_utterance: f64,
    pub has_complete_sentences: bool,
    /// Recorded with the sample; no row of the criteria sheet separates on it.
    pub has_word_finding_difficulty: bool,
    pub speech_rate: SpeechRate,
}

pub fn score_fluency(input: &FluencyInput) -> u8 {
    use SpeechRate::*;
    use UtteranceLength::*;

    let length = UtteranceLength::of(input.syllables_per_utterance);

    match (length, input.has_complete_sentences, input.has_word_finding_difficulty, input.speech_rate) {
        (Silent, _, _, _) => 0,
        (Short, false, _, _) => 4,
        (Long, true, _, _) => 5,
        (Short, true, _, Slow) => 7,
        (Short, true, _, Normal) => 9,
        (Short, true, _, VerySlow) => 5,
        (Long, false, _, _) => 5,
    }
}

/// Yes/no questions, 3 points each, at most 60.
pub fn score_yes_no(correct: u32) -> u32 {
    correct.saturating_mul(3).min(60)
}

/// Auditory word recognition, 1 point each, at most 60.
pub fn score_word_recognition(correct: u32) -> u32 {
    correct.min(60)
}

/// Repetition, 2 points per correctly repeated syllable, at most 100.
pub fn score_repetition(correct_syllables: u32) -> u32 {
    correct_syllables.saturating_mul(2).min(100)
}

/// Object naming: 3 correct, 2 phonemic paraphasia, 1 correct after a cue.
/// Item scores above 3 count as 3; the total is capped at 60.
pub fn score_object_naming(item_scores: &[u8]) -> u32 {
    item_scores
        .iter()
        .map(|s| u32::from((*s).min(3)))
        .sum::<u32>()
        .min(60)
}

/// Fluency averaged over the conversation and picture-description samples.
pub fn average_fluency(dialog: f64, picture: f64) -> f64 {
    round2((dialog + picture) / 2.0)
}
