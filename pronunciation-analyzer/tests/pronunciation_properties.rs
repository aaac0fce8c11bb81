//! Property and scenario tests for decomposition, similarity and analysis.

use pronunciation_analyzer::*;
use proptest::prelude::*;

fn syllable_string() -> impl Strategy<Value = String> {
    prop::collection::vec(SYLLABLE_BASE..=SYLLABLE_LAST, 0..12).prop_map(|codes| {
        codes
            .into_iter()
            .filter_map(char::from_u32)
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn vowel_count_matches_syllable_count(s in syllable_string()) {
        let d = decompose(&s);
        prop_assert_eq!(d.vowels.chars().count(), count_syllable_blocks(&s));
        for c in d.consonants.chars() {
            let is_lead = LEADS.contains(&c);
            let is_final = FINALS.iter().flatten().any(|f| *f == c);
            prop_assert!(is_lead || is_final, "unexpected consonant symbol {c}");
        }
    }

    #[test]
    fn similarity_is_bounded(a in ".{0,16}", b in ".{0,16}") {
        let s = similarity(&a, &b);
        prop_assert!((0.0..=100.0).contains(&s));
    }

    #[test]
    fn similarity_is_symmetric(a in ".{0,16}", b in ".{0,16}") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn similarity_with_self_is_perfect(a in ".{1,16}") {
        prop_assert_eq!(similarity(&a, &a), 100.0);
    }

    #[test]
    fn clarity_is_mean_of_channels(a in syllable_string(), b in syllable_string()) {
        let m = analyze(&a, &b);
        prop_assert_eq!(m.clarity_score, (m.consonant_accuracy + m.vowel_accuracy) / 2.0);
        prop_assert_eq!(m.tonal_accuracy, m.syllable_accuracy);
    }
}

#[test]
fn test_water_decomposition_scenario() {
    let d = decompose("물");
    assert!(d.consonants.contains('ㅁ'));
    assert!(d.consonants.contains('ㄹ'));
    assert_eq!(d.vowels, "ㅜ");
}

#[test]
fn test_apple_against_itself() {
    let m = PronunciationAnalyzer::new().analyze_detailed("사과", "사과");
    assert_eq!(m.consonant_accuracy, 100.0);
    assert_eq!(m.vowel_accuracy, 100.0);
    assert_eq!(m.clarity_score, 100.0);
}

#[test]
fn test_apple_against_banana() {
    let m = PronunciationAnalyzer::new().analyze_detailed("사과", "바나나");
    assert!(m.consonant_accuracy < 50.0, "consonants: {}", m.consonant_accuracy);
    assert!(m.vowel_accuracy < 50.0, "vowels: {}", m.vowel_accuracy);
    assert!(m.clarity_score > 0.0 && m.clarity_score < 100.0);
    assert!((m.speed_ratio - 1.5).abs() < 1e-9);
}

#[test]
fn test_utterance_pair_entry_point() {
    let pair = UtterancePair::new("물 주세요", "물 주세요");
    let m = PronunciationAnalyzer::new().analyze_pair(&pair);
    assert_eq!(m.clarity_score, 100.0);
}
