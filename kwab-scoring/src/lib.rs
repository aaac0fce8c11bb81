//! K-WAB clinical scoring engine
//!
//! Turns the six domain results of a Korean Western Aphasia Battery
//! administration into the aphasia, language and cortical quotients, a
//! severity band, a normative percentile and an aphasia-type classification.
//!
//! Everything here is a pure function of its inputs. Out-of-range
//! sub-scores are clamped at the boundary ([`types::sanitize`]) rather than
//! rejected, so a partially administered battery still produces a result.
//!
//! # Example
//!
//! ```rust
//! use kwab_scoring::{calculate_kwab_scores, DomainInputs, PatientProfile, Severity};
//!
//! let patient = PatientProfile::new("홍길동", 67, 9);
//! let pack = calculate_kwab_scores(&patient, &DomainInputs::default());
//! assert_eq!(pack.aq, 0.0);
//! assert_eq!(pack.severity, Severity::VerySevere);
//! ```

pub mod classification;
pub mod engine;
pub mod norms;
pub mod quotients;
pub mod severity;
pub mod subscores;
pub mod types;

pub use classification::{
    classify, AphasiaType, Band, Classification, ClassificationBasis, ClassificationOutcome,
};
pub use engine::calculate_kwab_scores;
pub use norms::{get_aq_normal_comparison, norm_for, percentile, sd_band, NormComparison, SdBand};
pub use quotients::{DomainTotals, QuotientWeights, AQ_WEIGHTS, CQ_WEIGHTS, LQ_WEIGHTS};
pub use severity::{Severity, NORMAL_AQ_CUTOFF};
pub use subscores::*;
pub use types::*;
