//! Normative AQ data for healthy Korean adults
//!
//! Rows are keyed by age band and education band. Demographics outside the
//! tabulated ranges fall into the nearest band.

use serde::{Deserialize, Serialize};

use crate::quotients::round2;

/// Age at which the older norm group starts.
pub const OLDER_AGE: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "15-65")]
    Adult,
    #[serde(rename = "65+")]
    Older,
}

impl AgeBand {
    pub fn for_age(age: u32) -> Self {
        if age >= OLDER_AGE {
            AgeBand::Older
        } else {
            AgeBand::Adult
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationBand {
    #[serde(rename = "0")]
    None,
    #[serde(rename = "1-6")]
    Elementary,
    #[serde(rename = "7+")]
    Secondary,
}

impl EducationBand {
    pub fn for_years(years: u32) -> Self {
        match years {
            0 => EducationBand::None,
            1..=6 => EducationBand::Elementary,
            _ => EducationBand::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRow {
    pub age_band: AgeBand,
    pub education_band: EducationBand,
    pub mean: f64,
    pub sd: f64,
}

pub const NORM_TABLE: [NormRow; 6] = [
    NormRow {
        age_band: AgeBand::Adult,
        education_band: EducationBand::None,
        mean: 90.73,
        sd: 4.40,
    },
    NormRow {
        age_band: AgeBand::Adult,
        education_band: EducationBand::Elementary,
        mean: 94.47,
        sd: 4.11,
    },
    NormRow {
        age_band: AgeBand::Adult,
        education_band: EducationBand::Secondary,
        mean: 97.21,
        sd: 2.25,
    },
    NormRow {
        age_band: AgeBand::Older,
        education_band: EducationBand::None,
        mean: 88.09,
        sd: 5.87,
    },
    NormRow {
        age_band: AgeBand::Older,
        education_band: EducationBand::Elementary,
        mean: 94.39,
        sd: 9.82,
    },
    NormRow {
        age_band: AgeBand::Older,
        education_band: EducationBand::Secondary,
        mean: 94.91,
        sd: 5.00,
    },
];

pub fn norm_for(age: u32, education_years: u32) -> NormRow {
    let age_band = AgeBand::for_age(age);
    let education_band = EducationBand::for_years(education_years);
    NORM_TABLE
        .iter()
        .copied()
        .find(|row| row.age_band == age_band && row.education_band == education_band)
        .unwrap_or(NORM_TABLE[0])
}

/// Patient AQ against the matching norm group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormComparison {
    pub mean: f64,
    pub sd: f64,
    /// `aq - mean`, two decimals.
    pub diff: f64,
}

pub fn get_aq_normal_comparison(aq: f64, age: u32, education_years: u32) -> NormComparison {
    let norm = norm_for(age, education_years);
    NormComparison {
        mean: norm.mean,
        sd: norm.sd,
        diff: round2(aq - norm.mean),
    }
}

/// Where an AQ falls relative to the norm group's standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SdBand {
    #[serde(rename = "≥ -1SD")]
    WithinOneSd,
    #[serde(rename = "-1SD ~ -2SD")]
    OneToTwoSd,
    #[serde(rename = "< -2SD")]
    BelowTwoSd,
}

impl SdBand {
    pub fn label(&self) -> &'static str {
        match self {
            SdBand::WithinOneSd => "≥ -1SD",
            SdBand::OneToTwoSd => "-1SD ~ -2SD",
            SdBand::BelowTwoSd => "< -2SD",
        }
    }
}

pub fn sd_band(aq: f64, age: u32, education_years: u32) -> SdBand {
    let norm = norm_for(age, education_years);
    if aq >= norm.mean - norm.sd {
        SdBand::WithinOneSd
    } else if aq >= norm.mean - 2.0 * norm.sd {
        SdBand::OneToTwoSd
    } else {
        SdBand::BelowTwoSd
    }
}

/// Percentile within the norm group, `round(50 + 50·tanh(z/2))`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentile(aq: f64, age: u32, education_years: u32) -> u8 {
    let norm = norm_for(age, education_years);
    if norm.sd <= 0.0 || !aq.is_finite() {
        return 50;
    }
    let z = (aq - norm.mean) / norm.sd;
    (50.0 + 50.0 * (z / 2.0).tanh()).round().clamp(0.0, 100.0) as u8
}
