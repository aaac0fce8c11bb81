//! Aphasia-type classification
//!
//! The WAB taxonomy tree is flattened into [`CLASSIFICATION_TABLE`], keyed on
//! whether each of fluency, comprehension, repetition and naming is intact.
//! A factor sitting exactly on its cutoff is [`Band::Boundary`]. Fluency,
//! comprehension and repetition are always consulted; naming only when those
//! three are intact. A consulted factor on its boundary makes the outcome
//! non-specific instead of picking a type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::severity::NORMAL_AQ_CUTOFF;

pub const FLUENCY_CUTOFF: f64 = 5.0;
pub const COMPREHENSION_CUTOFF: f64 = 7.0;
pub const REPETITION_CUTOFF: f64 = 7.0;
pub const NAMING_CUTOFF: f64 = 7.0;

const BOUNDARY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AphasiaType {
    Global,
    Broca,
    MixedTranscortical,
    TranscorticalMotor,
    Wernicke,
    TranscorticalSensory,
    Conduction,
    Anomic,
}

impl AphasiaType {
    pub fn label(&self) -> &'static str {
        match self {
            AphasiaType::Global => "전실어증",
            AphasiaType::Broca => "브로카 실어증",
            AphasiaType::MixedTranscortical => "혼합 초피질 실어증",
            AphasiaType::TranscorticalMotor => "초피질 운동 실어증",
            AphasiaType::Wernicke => "베르니케 실어증",
            AphasiaType::TranscorticalSensory => "초피질 감각 실어증",
            AphasiaType::Conduction => "전도 실어증",
            AphasiaType::Anomic => "명칭 실어증",
        }
    }
}

impl fmt::Display for AphasiaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final decision of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// AQ at or above the normal cutoff.
    NoAphasia,
    Classified(AphasiaType),
    /// A factor sits on its cutoff, or the profile matches no type.
    NonSpecific,
}

impl ClassificationOutcome {
    pub fn aphasia_type(&self) -> Option<AphasiaType> {
        match self {
            ClassificationOutcome::Classified(t) => Some(*t),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassificationOutcome::NoAphasia => "실어증 없음",
            ClassificationOutcome::Classified(t) => t.label(),
            ClassificationOutcome::NonSpecific => "비특이적",
        }
    }
}

/// The four factors on a 0-10 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationBasis {
    pub fluency: f64,
    pub comprehension: f64,
    pub repetition: f64,
    pub naming: f64,
}

impl ClassificationBasis {
    /// Derive the factors from sanitized domain totals.
    ///
    /// Comprehension is out of 200, repetition and naming out of 100.
    pub fn from_totals(fluency: f64, comprehension: f64, repetition: f64, naming: f64) -> Self {
        Self {
            fluency,
            comprehension: comprehension / 20.0,
            repetition: repetition / 10.0,
            naming: naming / 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Impaired,
    Intact,
    Boundary,
}

impl Band {
    pub fn of(value: f64, cutoff: f64) -> Self {
        if (value - cutoff).abs() < BOUNDARY_EPSILON {
            Band::Boundary
        } else if value > cutoff {
            Band::Intact
        } else {
            Band::Impaired
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Band::Impaired => "저하",
            Band::Intact => "보존",
            Band::Boundary => "경계값",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Factor {
    Fluency,
    Comprehension,
    Repetition,
    Naming,
}

impl Factor {
    fn label(&self) -> &'static str {
        match self {
            Factor::Fluency => "유창성",
            Factor::Comprehension => "알아듣기",
            Factor::Repetition => "따라말하기",
            Factor::Naming => "이름대기",
        }
    }
}

/// One row: intact flags for (fluency, comprehension, repetition, naming).
struct TableRow {
    fluent: bool,
    comprehends: bool,
    repeats: bool,
    names: bool,
    aphasia_type: Option<AphasiaType>,
}

const fn row(
    fluent: bool,
    comprehends: bool,
    repeats: bool,
    names: bool,
    aphasia_type: Option<AphasiaType>,
) -> TableRow {
    TableRow {
        fluent,
        comprehends,
        repeats,
        names,
        aphasia_type,
    }
}

/// Every combination of intact/impaired factors. Naming only separates
/// anomic aphasia from an unclassifiable all-intact profile.
const CLASSIFICATION_TABLE: [TableRow; 16] = [
    row(false, false, false, false, Some(AphasiaType::Global)),
    row(false, false, false, true, Some(AphasiaType::Global)),
    row(false, false, true, false, Some(AphasiaType::MixedTranscortical)),
    row(false, false, true, true, Some(AphasiaType::MixedTranscortical)),
    row(false, true, false, false, Some(AphasiaType::Broca)),
    row(false, true, false, true, Some(AphasiaType::Broca)),
    row(false, true, true, false, Some(AphasiaType::TranscorticalMotor)),
    row(false, true, true, true, Some(AphasiaType::TranscorticalMotor)),
    row(true, false, false, false, Some(AphasiaType::Wernicke)),
    row(true, false, false, true, Some(AphasiaType::Wernicke)),
    row(true, false, true, false, Some(AphasiaType::TranscorticalSensory)),
    row(true, false, true, true, Some(AphasiaType::TranscorticalSensory)),
    row(true, true, false, false, Some(AphasiaType::Conduction)),
    row(true, true, false, true, Some(AphasiaType::Conduction)),
    row(true, true, true, false, Some(AphasiaType::Anomic)),
    row(true, true, true, true, None),
];

/// Outcome plus the human-readable reason recorded in the score pack.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub outcome: ClassificationOutcome,
    pub reason: String,
}

pub fn classify(aq: f64, basis: &ClassificationBasis) -> Classification {
    if aq >= NORMAL_AQ_CUTOFF {
        return Classification {
            outcome: ClassificationOutcome::NoAphasia,
            reason: format!("AQ {aq:.2} ≥ {NORMAL_AQ_CUTOFF} → 정상 범위"),
        };
    }

    let primary = [
        (Factor::Fluency, basis.fluency, Band::of(basis.fluency, FLUENCY_CUTOFF)),
        (
            Factor::Comprehension,
            basis.comprehension,
            Band::of(basis.comprehension, COMPREHENSION_CUTOFF),
        ),
        (
            Factor::Repetition,
            basis.repetition,
            Band::of(basis.repetition, REPETITION_CUTOFF),
        ),
    ];
    let naming = (Factor::Naming, basis.naming, Band::of(basis.naming, NAMING_CUTOFF));

    let describe = |consulted: &[(Factor, f64, Band)]| -> String {
        consulted
            .iter()
            .map(|(factor, value, band)| format!("{} {value:.1}({})", factor.label(), band.label()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    if primary.iter().any(|(_, _, band)| *band == Band::Boundary) {
        let outcome = ClassificationOutcome::NonSpecific;
        return Classification {
            reason: format!("{} → 경계값으로 {}", describe(&primary), outcome.label()),
            outcome,
        };
    }

    let [fluent, comprehends, repeats] = primary.map(|(_, _, band)| band == Band::Intact);
    let naming_consulted = fluent && comprehends && repeats;

    let mut consulted = primary.to_vec();
    if naming_consulted {
        consulted.push(naming);
        if naming.2 == Band::Boundary {
            let outcome = ClassificationOutcome::NonSpecific;
            return Classification {
                reason: format!("{} → 경계값으로 {}", describe(&consulted), outcome.label()),
                outcome,
            };
        }
    }

    let names = naming.2 == Band::Intact;
    let found = CLASSIFICATION_TABLE.iter().find(|r| {
        r.fluent == fluent
            && r.comprehends == comprehends
            && r.repeats == repeats
            && (!naming_consulted || r.names == names)
    });

    let outcome = match found.and_then(|r| r.aphasia_type) {
        Some(t) => ClassificationOutcome::Classified(t),
        None => ClassificationOutcome::NonSpecific,
    };

    Classification {
        reason: format!("{} → {}", describe(&consulted), outcome.label()),
        outcome,
    }
}
