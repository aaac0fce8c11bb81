//! Training session progress and per-patient history
//!
//! A patient works through six steps at a chosen place. Each saved step
//! result is converted into K-WAB domain inputs, the whole score pack is
//! recomputed, and the session is written back to a [`KeyValueStore`]. The
//! sixth step finalizes the session and appends a [`TrainingHistoryEntry`]
//! to the patient's history, from which AQ trends are read.
//!
//! # Storage Keys
//!
//! - `kwab_training_session:{patientKey}:{place}` - in-progress session
//! - `kwab_training_history:{patientKey}` - completed sessions, oldest first
//!
//! where `patientKey` is `name|birthDate|age|educationYears`, trimmed and
//! lowercased.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use kwab_scoring::PatientProfile;
//! use training_history::*;
//!
//! # fn main() -> Result<(), SessionError> {
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//! let patient = PatientProfile::new("김철수", 74, 6);
//!
//! let mut manager = SessionManager::open(store.clone(), &patient, "공원")?;
//! manager.save_step1_result(Step1Result::new(8, 10))?;
//! assert_eq!(get_resume_path(store.as_ref(), &patient, "공원")?, "/step-2?place=%EA%B3%B5%EC%9B%90&step1=8");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod keys;
pub mod resume;
pub mod session;
pub mod steps;
pub mod store;

pub use config::*;
pub use error::*;
pub use history::{get_aq_trend_for, get_history_for, AqTrend, StepDetails, StepScores, TrainingHistoryEntry};
pub use keys::{history_key, patient_key, session_key};
pub use resume::get_resume_path;
pub use session::{clear_all_sessions, clear_session_for, has_active_session, SessionManager, TrainingSession};
pub use steps::*;
pub use store::{FileStore, KeyValueStore, MemoryStore};
