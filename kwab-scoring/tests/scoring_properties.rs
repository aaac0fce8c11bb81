//! End-to-end scoring scenarios and universal properties of the engine.

use kwab_scoring::*;
use proptest::prelude::*;

fn patient() -> PatientProfile {
    PatientProfile::new("테스트", 60, 12)
}

fn maxed_inputs() -> DomainInputs {
    DomainInputs {
        spontaneous_speech: SpontaneousSpeechInput {
            content_score: 10.0,
            fluency_score: 10.0,
        },
        auditory_comprehension: AuditoryComprehensionInput {
            yes_no_score: 60.0,
            word_recognition_score: 60.0,
            command_score: 80.0,
        },
        repetition: RepetitionInput { total_score: 100.0 },
        naming: NamingInput {
            object_naming_score: 60.0,
            word_fluency_score: 20.0,
            sentence_completion_score: 10.0,
            sentence_response_score: 10.0,
        },
        reading: ReadingInput { total_score: 100.0 },
        writing: WritingInput { total_score: 100.0 },
        praxis: None,
        construction: None,
    }
}

#[test]
fn test_aq_reference_calculation() {
    // yes/no 60 of a 200-point comprehension domain, everything else at ceiling:
    // 2 * (20 + 60/20 + 100/10 + 100/10) = 86
    let inputs = DomainInputs {
        auditory_comprehension: AuditoryComprehensionInput {
            yes_no_score: 60.0,
            word_recognition_score: 0.0,
            command_score: 0.0,
        },
        ..maxed_inputs()
    };
    let pack = calculate_kwab_scores(&patient(), &inputs);
    assert_eq!(pack.spontaneous_total, 20.0);
    assert_eq!(pack.comprehension_total, 60.0);
    assert_eq!(pack.aq, 86.0);
    assert_eq!(pack.severity, Severity::Mild);
}

#[test]
fn test_full_marks() {
    let pack = calculate_kwab_scores(&patient(), &maxed_inputs());
    assert_eq!(pack.aq, 100.0);
    assert_eq!(pack.lq, 100.0);
    // praxis and construction not administered: 70 of 90 weight points
    assert_eq!(pack.cq, 77.78);
    assert_eq!(pack.classification, ClassificationOutcome::NoAphasia);
    assert_eq!(pack.aphasia_type, None);
    assert_eq!(pack.severity, Severity::Normal);
    assert_eq!(pack.norm_comparison.diff, 2.79);
}

#[test]
fn test_wernicke_profile_with_reason() {
    let inputs = DomainInputs {
        spontaneous_speech: SpontaneousSpeechInput {
            content_score: 3.0,
            fluency_score: 8.0,
        },
        auditory_comprehension: AuditoryComprehensionInput {
            yes_no_score: 30.0,
            word_recognition_score: 25.0,
            command_score: 21.0,
        },
        repetition: RepetitionInput { total_score: 30.0 },
        naming: NamingInput {
            object_naming_score: 20.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let pack = calculate_kwab_scores(&patient(), &inputs);
    assert_eq!(pack.aphasia_type, Some(AphasiaType::Wernicke));
    assert!(pack.classification_reason.contains("유창성 8.0(보존)"));
    assert!(pack.classification_reason.contains("알아듣기 3.8(저하)"));
    assert!(pack.classification_reason.contains("베르니케 실어증"));
}

#[test]
fn test_boundary_factors_are_non_specific() {
    // fluency exactly 5 and comprehension exactly 140/20 = 7
    let inputs = DomainInputs {
        spontaneous_speech: SpontaneousSpeechInput {
            content_score: 4.0,
            fluency_score: 5.0,
        },
        auditory_comprehension: AuditoryComprehensionInput {
            yes_no_score: 60.0,
            word_recognition_score: 40.0,
            command_score: 40.0,
        },
        repetition: RepetitionInput { total_score: 30.0 },
        naming: NamingInput {
            object_naming_score: 30.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let pack = calculate_kwab_scores(&patient(), &inputs);
    assert_eq!(pack.classification, ClassificationOutcome::NonSpecific);
    assert_eq!(pack.aphasia_type, None);
    assert_eq!(pack.aphasia_label(), "비특이적");
}

#[test]
fn test_score_pack_serializes_camel_case() {
    let pack = calculate_kwab_scores(&patient(), &maxed_inputs());
    let json = serde_json::to_value(&pack).unwrap();
    assert_eq!(json["spontaneousTotal"], 20.0);
    assert_eq!(json["severity"], "normal");
    assert!(json["aphasiaType"].is_null());
    assert!(json["classificationBasis"]["fluency"].is_number());
}

fn domain_inputs() -> impl Strategy<Value = DomainInputs> {
    (
        (0.0..=10.0f64, 0.0..=10.0f64),
        (0.0..=60.0f64, 0.0..=60.0f64, 0.0..=80.0f64),
        0.0..=100.0f64,
        (0.0..=60.0f64, 0.0..=20.0f64, 0.0..=10.0f64, 0.0..=10.0f64),
    )
        .prop_map(|(ss, ac, rep, nam)| DomainInputs {
            spontaneous_speech: SpontaneousSpeechInput {
                content_score: ss.0,
                fluency_score: ss.1,
            },
            auditory_comprehension: AuditoryComprehensionInput {
                yes_no_score: ac.0,
                word_recognition_score: ac.1,
                command_score: ac.2,
            },
            repetition: RepetitionInput { total_score: rep },
            naming: NamingInput {
                object_naming_score: nam.0,
                word_fluency_score: nam.1,
                sentence_completion_score: nam.2,
                sentence_response_score: nam.3,
            },
            ..Default::default()
        })
}

fn bump(inputs: &DomainInputs, field: usize, delta: f64) -> DomainInputs {
    let mut out = *inputs;
    match field {
        0 => out.spontaneous_speech.content_score += delta,
        1 => out.spontaneous_speech.fluency_score += delta,
        2 => out.auditory_comprehension.yes_no_score += delta,
        3 => out.auditory_comprehension.word_recognition_score += delta,
        4 => out.auditory_comprehension.command_score += delta,
        5 => out.repetition.total_score += delta,
        6 => out.naming.object_naming_score += delta,
        7 => out.naming.word_fluency_score += delta,
        8 => out.naming.sentence_completion_score += delta,
        _ => out.naming.sentence_response_score += delta,
    }
    out
}

proptest! {
    #[test]
    fn aq_is_monotone_in_every_input(
        inputs in domain_inputs(),
        field in 0usize..10,
        delta in 0.0..50.0f64,
    ) {
        let before = calculate_kwab_scores(&patient(), &inputs).aq;
        let after = calculate_kwab_scores(&patient(), &bump(&inputs, field, delta)).aq;
        prop_assert!(after >= before, "field {} +{}: {} -> {}", field, delta, before, after);
    }

    #[test]
    fn quotients_stay_in_range(inputs in domain_inputs()) {
        let pack = calculate_kwab_scores(&patient(), &inputs);
        for q in [pack.aq, pack.lq, pack.cq] {
            prop_assert!((0.0..=100.0).contains(&q));
        }
        prop_assert!(pack.percentile <= 100);
    }

    #[test]
    fn severity_matches_its_lower_bound(aq in 0.0..=100.0f64) {
        let band = Severity::from_aq(aq);
        prop_assert!(aq >= band.lower_bound());
    }

    #[test]
    fn engine_never_panics_on_garbage(
        a in any::<f64>(),
        b in any::<f64>(),
        age in any::<u32>(),
        edu in any::<u32>(),
    ) {
        let inputs = DomainInputs {
            spontaneous_speech: SpontaneousSpeechInput { content_score: a, fluency_score: b },
            repetition: RepetitionInput { total_score: a },
            reading: ReadingInput { total_score: b },
            ..Default::default()
        };
        let pack = calculate_kwab_scores(&PatientProfile::new("x", age, edu), &inputs);
        prop_assert!(pack.aq.is_finite());
    }
}
