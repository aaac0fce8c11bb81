//! Weighted quotient tables
//!
//! Each quotient is `Σ(domain/max · weight) / Σweight · 100`, so a patient at
//! ceiling on every counted domain scores exactly 100. The AQ row reproduces
//! the WAB formula `2 · (SS + AC/20 + Rep/10 + Nam/10)`.

use serde::{Deserialize, Serialize};

use crate::types::{
    AuditoryComprehensionInput, ConstructionInput, DomainInputs, NamingInput, PraxisInput,
    ReadingInput, RepetitionInput, SpontaneousSpeechInput, WritingInput,
};

/// Per-domain totals of a sanitized assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainTotals {
    pub spontaneous: f64,
    pub comprehension: f64,
    pub repetition: f64,
    pub naming: f64,
    pub reading: f64,
    pub writing: f64,
    pub praxis: f64,
    pub construction: f64,
}

impl DomainTotals {
    /// Totals of `inputs`, which must already be sanitized.
    pub fn from_inputs(inputs: &DomainInputs) -> Self {
        Self {
            spontaneous: inputs.spontaneous_speech.total(),
            comprehension: inputs.auditory_comprehension.total(),
            repetition: inputs.repetition.total(),
            naming: inputs.naming.total(),
            reading: inputs.reading.total_score,
            writing: inputs.writing.total_score,
            praxis: inputs.praxis.map_or(0.0, |p| p.total_score),
            construction: inputs.construction.map_or(0.0, |c| c.total_score),
        }
    }

    fn normalized(&self) -> [f64; 8] {
        [
            self.spontaneous / SpontaneousSpeechInput::MAX_TOTAL,
            self.comprehension / AuditoryComprehensionInput::MAX_TOTAL,
            self.repetition / RepetitionInput::MAX_TOTAL,
            self.naming / NamingInput::MAX_TOTAL,
            self.reading / ReadingInput::MAX_TOTAL,
            self.writing / WritingInput::MAX_TOTAL,
            self.praxis / PraxisInput::MAX_TOTAL,
            self.construction / ConstructionInput::MAX_TOTAL,
        ]
    }
}

/// Relative weight of each domain in one quotient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotientWeights {
    pub spontaneous: f64,
    pub comprehension: f64,
    pub repetition: f64,
    pub naming: f64,
    pub reading: f64,
    pub writing: f64,
    pub praxis: f64,
    pub construction: f64,
}

/// Aphasia Quotient.
pub const AQ_WEIGHTS: QuotientWeights = QuotientWeights {
    spontaneous: 40.0,
    comprehension: 20.0,
    repetition: 20.0,
    naming: 20.0,
    reading: 0.0,
    writing: 0.0,
    praxis: 0.0,
    construction: 0.0,
};

/// Language Quotient (Shewan).
pub const LQ_WEIGHTS: QuotientWeights = QuotientWeights {
    spontaneous: 20.0,
    comprehension: 20.0,
    repetition: 10.0,
    naming: 10.0,
    reading: 20.0,
    writing: 20.0,
    praxis: 0.0,
    construction: 0.0,
};

/// Cortical Quotient.
pub const CQ_WEIGHTS: QuotientWeights = QuotientWeights {
    spontaneous: 20.0,
    comprehension: 10.0,
    repetition: 10.0,
    naming: 10.0,
    reading: 10.0,
    writing: 10.0,
    praxis: 10.0,
    construction: 10.0,
};

impl QuotientWeights {
    fn as_array(&self) -> [f64; 8] {
        [
            self.spontaneous,
            self.comprehension,
            self.repetition,
            self.naming,
            self.reading,
            self.writing,
            self.praxis,
            self.construction,
        ]
    }

    pub fn total_weight(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Quotient on a 0-100 scale, rounded to two decimals.
    pub fn apply(&self, totals: &DomainTotals) -> f64 {
        let weight_sum = self.total_weight();
        if weight_sum <= 0.0 {
            return 0.0;
        }

        let weighted: f64 = self
            .as_array()
            .iter()
            .zip(totals.normalized())
            .map(|(weight, fraction)| weight * fraction)
            .sum();

        round2(weighted / weight_sum * 100.0).clamp(0.0, 100.0)
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
