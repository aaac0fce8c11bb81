//! Pronunciation scoring for speech rehabilitation exercises
//!
//! Compares what a patient was asked to say with what the transcription
//! service heard, and grades the attempt on the Korean syllable structure.
//!
//! # Pipeline
//!
//! 1. **Decomposition** ([`hangul`]) - every precomposed Hangul syllable is
//!    split into its lead consonant, vowel and optional final consonant.
//!    Consonants and vowels are collected into two separate channels.
//! 2. **Similarity** ([`similarity`]) - a normalized Levenshtein similarity
//!    in `[0, 100]` between two symbol sequences.
//! 3. **Analysis** ([`analyzer`]) - consonant accuracy, vowel accuracy,
//!    whole-utterance syllable accuracy and the combined clarity score.
//!
//! Every function in this crate is total: empty or non-Korean input yields a
//! well-defined score rather than an error.
//!
//! # Example
//!
//! ```rust
//! use pronunciation_analyzer::PronunciationAnalyzer;
//!
//! let analyzer = PronunciationAnalyzer::new();
//! let metrics = analyzer.analyze_detailed("사과", "사과");
//! assert_eq!(metrics.clarity_score, 100.0);
//! ```

pub mod analyzer;
pub mod hangul;
pub mod similarity;

pub use analyzer::*;
pub use hangul::*;
pub use similarity::*;
