use std::fmt;

use serde::{Deserialize, Serialize};

/// AQ at or above this is within the normal range.
pub const NORMAL_AQ_CUTOFF: f64 = 93.8;

/// AQ severity band. Each band includes its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
    VerySevere,
}

/// `(lower bound, band)` from the top down.
const SEVERITY_BANDS: [(f64, Severity); 4] = [
    (NORMAL_AQ_CUTOFF, Severity::Normal),
    (76.0, Severity::Mild),
    (51.0, Severity::Moderate),
    (26.0, Severity::Severe),
];

impl Severity {
    pub fn from_aq(aq: f64) -> Self {
        SEVERITY_BANDS
            .iter()
            .find(|(lower, _)| aq >= *lower)
            .map_or(Severity::VerySevere, |(_, band)| *band)
    }

    pub fn lower_bound(&self) -> f64 {
        SEVERITY_BANDS
            .iter()
            .find(|(_, band)| band == self)
            .map_or(0.0, |(lower, _)| *lower)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "정상",
            Severity::Mild => "경도",
            Severity::Moderate => "중등도",
            Severity::Severe => "중증",
            Severity::VerySevere => "최중증",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
