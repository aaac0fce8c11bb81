use tracing::debug;

use crate::classification::{classify, ClassificationBasis};
use crate::norms::{get_aq_normal_comparison, percentile};
use crate::quotients::{DomainTotals, AQ_WEIGHTS, CQ_WEIGHTS, LQ_WEIGHTS};
use crate::severity::Severity;
use crate::types::{DomainInputs, KwabScorePack, PatientProfile};

/// Score one assessment.
///
/// Inputs are sanitized first, so the computation always completes: invalid
/// or missing sub-scores contribute zero and oversized ones are capped.
pub fn calculate_kwab_scores(patient: &PatientProfile, inputs: &DomainInputs) -> KwabScorePack {
    let inputs = inputs.sanitized();
    let totals = DomainTotals::from_inputs(&inputs);

    let aq = AQ_WEIGHTS.apply(&totals);
    let lq = LQ_WEIGHTS.apply(&totals);
    let cq = CQ_WEIGHTS.apply(&totals);

    let basis = ClassificationBasis::from_totals(
        inputs.spontaneous_speech.fluency_score,
        totals.comprehension,
        totals.repetition,
        totals.naming,
    );
    let classification = classify(aq, &basis);
    let severity = Severity::from_aq(aq);

    debug!(
        aq,
        lq,
        cq,
        severity = severity.label(),
        classification = classification.outcome.label(),
        "K-WAB scores calculated"
    );

    KwabScorePack {
        spontaneous_speech: inputs.spontaneous_speech,
        auditory_comprehension: inputs.auditory_comprehension,
        repetition: inputs.repetition,
        naming: inputs.naming,
        reading: inputs.reading,
        writing: inputs.writing,
        praxis: inputs.praxis,
        construction: inputs.construction,
        spontaneous_total: totals.spontaneous,
        comprehension_total: totals.comprehension,
        repetition_total: totals.repetition,
        naming_total: totals.naming,
        aq,
        lq,
        cq,
        aphasia_type: classification.outcome.aphasia_type(),
        classification: classification.outcome,
        classification_basis: basis,
        classification_reason: classification.reason,
        severity,
        percentile: percentile(aq, patient.age, patient.education_years),
        norm_comparison: get_aq_normal_comparison(aq, patient.age, patient.education_years),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{AphasiaType, ClassificationOutcome};
    use crate::types::*;

    #[test]
    fn test_empty_assessment_scores_zero() {
        let pack = calculate_kwab_scores(&PatientProfile::default(), &DomainInputs::default());
        assert_eq!(pack.aq, 0.0);
        assert_eq!(pack.lq, 0.0);
        assert_eq!(pack.cq, 0.0);
        assert_eq!(pack.severity, Severity::VerySevere);
        assert_eq!(pack.aphasia_type, Some(AphasiaType::Global));
    }

    #[test]
    fn test_pack_carries_sanitized_inputs() {
        let inputs = DomainInputs {
            spontaneous_speech: SpontaneousSpeechInput {
                content_score: 14.0,
                fluency_score: f64::NAN,
            },
            ..Default::default()
        };
        let pack = calculate_kwab_scores(&PatientProfile::default(), &inputs);
        assert_eq!(pack.spontaneous_speech.content_score, 10.0);
        assert_eq!(pack.spontaneous_speech.fluency_score, 0.0);
        assert_eq!(pack.spontaneous_total, 10.0);
        assert_eq!(pack.aq, 20.0);
    }

    #[test]
    fn test_broca_profile() {
        let inputs = DomainInputs {
            spontaneous_speech: SpontaneousSpeechInput {
                content_score: 5.0,
                fluency_score: 3.0,
            },
            auditory_comprehension: AuditoryComprehensionInput {
                yes_no_score: 57.0,
                word_recognition_score: 55.0,
                command_score: 60.0,
            },
            repetition: RepetitionInput { total_score: 40.0 },
            naming: NamingInput {
                object_naming_score: 30.0,
                word_fluency_score: 5.0,
                sentence_completion_score: 6.0,
                sentence_response_score: 4.0,
            },
            ..Default::default()
        };
        let pack = calculate_kwab_scores(&PatientProfile::new("p", 58, 12), &inputs);

        // 2 * (8 + 172/20 + 40/10 + 45/10) = 50.2
        assert_eq!(pack.aq, 50.2);
        assert_eq!(pack.classification, ClassificationOutcome::Classified(AphasiaType::Broca));
        assert_eq!(pack.aphasia_label(), "브로카 실어증");
        assert_eq!(pack.severity, Severity::Severe);
        assert_eq!(pack.classification_basis.comprehension, 8.6);
        assert_eq!(pack.norm_comparison.mean, 97.21);
    }
}
