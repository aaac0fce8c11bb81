use serde::{Deserialize, Serialize};

use crate::classification::{AphasiaType, ClassificationBasis, ClassificationOutcome};
use crate::norms::NormComparison;
use crate::severity::Severity;

/// Clamp a caller-supplied sub-score into `[0, max]`.
///
/// NaN, infinities and negatives contribute nothing; values above the
/// instrument's allocation are capped at the allocation.
pub fn sanitize(value: f64, max: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        0.0
    } else {
        value.min(max)
    }
}

/// Demographics used for normative comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientProfile {
    pub name: String,
    pub birth_date: Option<String>,
    pub age: u32,
    pub education_years: u32,
}

impl PatientProfile {
    pub fn new(name: impl Into<String>, age: u32, education_years: u32) -> Self {
        Self {
            name: name.into(),
            birth_date: None,
            age,
            education_years,
        }
    }

    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }
}

/// 스스로 말하기: content delivery and fluency, each 0-10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpontaneousSpeechInput {
    pub content_score: f64,
    pub fluency_score: f64,
}

impl SpontaneousSpeechInput {
    pub const MAX_CONTENT: f64 = 10.0;
    pub const MAX_FLUENCY: f64 = 10.0;
    pub const MAX_TOTAL: f64 = 20.0;

    pub fn sanitized(&self) -> Self {
        Self {
            content_score: sanitize(self.content_score, Self::MAX_CONTENT),
            fluency_score: sanitize(self.fluency_score, Self::MAX_FLUENCY),
        }
    }

    pub fn total(&self) -> f64 {
        self.content_score + self.fluency_score
    }
}

/// 알아듣기: yes/no (0-60), auditory word recognition (0-60), sequential
/// commands (0-80).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditoryComprehensionInput {
    pub yes_no_score: f64,
    pub word_recognition_score: f64,
    pub command_score: f64,
}

impl AuditoryComprehensionInput {
    pub const MAX_YES_NO: f64 = 60.0;
    pub const MAX_WORD_RECOGNITION: f64 = 60.0;
    pub const MAX_COMMAND: f64 = 80.0;
    pub const MAX_TOTAL: f64 = 200.0;

    pub fn sanitized(&self) -> Self {
        Self {
            yes_no_score: sanitize(self.yes_no_score, Self::MAX_YES_NO),
            word_recognition_score: sanitize(
                self.word_recognition_score,
                Self::MAX_WORD_RECOGNITION,
            ),
            command_score: sanitize(self.command_score, Self::MAX_COMMAND),
        }
    }

    pub fn total(&self) -> f64 {
        self.yes_no_score + self.word_recognition_score + self.command_score
    }
}

/// 따라말하기, 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepetitionInput {
    pub total_score: f64,
}

impl RepetitionInput {
    pub const MAX_TOTAL: f64 = 100.0;

    pub fn sanitized(&self) -> Self {
        Self {
            total_score: sanitize(self.total_score, Self::MAX_TOTAL),
        }
    }

    pub fn total(&self) -> f64 {
        self.total_score
    }
}

/// 이름대기: object naming (0-60), word fluency (0-20), sentence completion
/// (0-10), responsive speech (0-10).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingInput {
    pub object_naming_score: f64,
    pub word_fluency_score: f64,
    pub sentence_completion_score: f64,
    pub sentence_response_score: f64,
}

impl NamingInput {
    pub const MAX_OBJECT_NAMING: f64 = 60.0;
    pub const MAX_WORD_FLUENCY: f64 = 20.0;
    pub const MAX_SENTENCE_COMPLETION: f64 = 10.0;
    pub const MAX_SENTENCE_RESPONSE: f64 = 10.0;
    pub const MAX_TOTAL: f64 = 100.0;

    pub fn sanitized(&self) -> Self {
        Self {
            object_naming_score: sanitize(self.object_naming_score, Self::MAX_OBJECT_NAMING),
            word_fluency_score: sanitize(self.word_fluency_score, Self::MAX_WORD_FLUENCY),
            sentence_completion_score: sanitize(
                self.sentence_completion_score,
                Self::MAX_SENTENCE_COMPLETION,
            ),
            sentence_response_score: sanitize(
                self.sentence_response_score,
                Self::MAX_SENTENCE_RESPONSE,
            ),
        }
    }

    pub fn total(&self) -> f64 {
        self.object_naming_score
            + self.word_fluency_score
            + self.sentence_completion_score
            + self.sentence_response_score
    }
}

/// 읽기, 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingInput {
    pub total_score: f64,
}

impl ReadingInput {
    pub const MAX_TOTAL: f64 = 100.0;

    pub fn sanitized(&self) -> Self {
        Self {
            total_score: sanitize(self.total_score, Self::MAX_TOTAL),
        }
    }
}

/// 쓰기, 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WritingInput {
    pub total_score: f64,
}

impl WritingInput {
    pub const MAX_TOTAL: f64 = 100.0;

    pub fn sanitized(&self) -> Self {
        Self {
            total_score: sanitize(self.total_score, Self::MAX_TOTAL),
        }
    }
}

/// 동작 (praxis), 0-60. Not administered by the training flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PraxisInput {
    pub total_score: f64,
}

impl PraxisInput {
    pub const MAX_TOTAL: f64 = 60.0;

    pub fn sanitized(&self) -> Self {
        Self {
            total_score: sanitize(self.total_score, Self::MAX_TOTAL),
        }
    }
}

/// 구성·시공간·계산, 0-100. Not administered by the training flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstructionInput {
    pub total_score: f64,
}

impl ConstructionInput {
    pub const MAX_TOTAL: f64 = 100.0;

    pub fn sanitized(&self) -> Self {
        Self {
            total_score: sanitize(self.total_score, Self::MAX_TOTAL),
        }
    }
}

/// Everything the scoring engine reads, one record per administered domain.
///
/// Missing fields deserialize as zero so a partial assessment still scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainInputs {
    pub spontaneous_speech: SpontaneousSpeechInput,
    pub auditory_comprehension: AuditoryComprehensionInput,
    pub repetition: RepetitionInput,
    pub naming: NamingInput,
    pub reading: ReadingInput,
    pub writing: WritingInput,
    pub praxis: Option<PraxisInput>,
    pub construction: Option<ConstructionInput>,
}

impl DomainInputs {
    /// Copy with every sub-score clamped to its documented range.
    pub fn sanitized(&self) -> Self {
        Self {
            spontaneous_speech: self.spontaneous_speech.sanitized(),
            auditory_comprehension: self.auditory_comprehension.sanitized(),
            repetition: self.repetition.sanitized(),
            naming: self.naming.sanitized(),
            reading: self.reading.sanitized(),
            writing: self.writing.sanitized(),
            praxis: self.praxis.map(|p| p.sanitized()),
            construction: self.construction.map(|c| c.sanitized()),
        }
    }
}

/// Result of one K-WAB computation.
///
/// Built once from a sanitized [`DomainInputs`] and never mutated; stored
/// verbatim inside the training session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KwabScorePack {
    pub spontaneous_speech: SpontaneousSpeechInput,
    pub auditory_comprehension: AuditoryComprehensionInput,
    pub repetition: RepetitionInput,
    pub naming: NamingInput,
    pub reading: ReadingInput,
    pub writing: WritingInput,
    pub praxis: Option<PraxisInput>,
    pub construction: Option<ConstructionInput>,

    pub spontaneous_total: f64,
    pub comprehension_total: f64,
    pub repetition_total: f64,
    pub naming_total: f64,

    pub aq: f64,
    pub lq: f64,
    pub cq: f64,

    pub aphasia_type: Option<AphasiaType>,
    pub classification: ClassificationOutcome,
    pub classification_basis: ClassificationBasis,
    pub classification_reason: String,

    pub severity: Severity,
    pub percentile: u8,
    pub norm_comparison: NormComparison,
}

impl KwabScorePack {
    /// Korean label of the classification outcome, e.g. "브로카 실어증".
    pub fn aphasia_label(&self) -> &'static str {
        self.classification.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_bounds() {
        assert_eq!(sanitize(f64::NAN, 10.0), 0.0);
        assert_eq!(sanitize(f64::INFINITY, 10.0), 0.0);
        assert_eq!(sanitize(-3.0, 10.0), 0.0);
        assert_eq!(sanitize(12.5, 10.0), 10.0);
        assert_eq!(sanitize(7.25, 10.0), 7.25);
    }

    #[test]
    fn test_domain_inputs_sanitized() {
        let inputs = DomainInputs {
            auditory_comprehension: AuditoryComprehensionInput {
                yes_no_score: 75.0,
                word_recognition_score: -1.0,
                command_score: f64::NAN,
            },
            praxis: Some(PraxisInput { total_score: 99.0 }),
            ..Default::default()
        }
        .sanitized();

        assert_eq!(inputs.auditory_comprehension.yes_no_score, 60.0);
        assert_eq!(inputs.auditory_comprehension.word_recognition_score, 0.0);
        assert_eq!(inputs.auditory_comprehension.command_score, 0.0);
        assert_eq!(inputs.praxis.map(|p| p.total_score), Some(60.0));
        assert!(inputs.construction.is_none());
    }

    #[test]
    fn test_missing_fields_deserialize_as_zero() {
        let inputs: DomainInputs =
            serde_json::from_str(r#"{"repetition":{"totalScore":80}}"#).unwrap();
        assert_eq!(inputs.repetition.total_score, 80.0);
        assert_eq!(inputs.naming.total(), 0.0);
        assert_eq!(inputs.spontaneous_speech.total(), 0.0);
    }

    #[test]
    fn test_patient_profile_camel_case() {
        let patient = PatientProfile::new("홍길동", 70, 6).with_birth_date("1955-03-01");
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["educationYears"], 6);
        assert_eq!(json["birthDate"], "1955-03-01");
    }
}
