use std::sync::Arc;

use chrono::{DateTime, Utc};
use kwab_scoring::{
    calculate_kwab_scores, AuditoryComprehensionInput, DomainInputs, KwabScorePack, NamingInput, PatientProfile,
    ReadingInput, RepetitionInput, SpontaneousSpeechInput, WritingInput,
};
use logger_redacted::PiiRedactor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{HistoryConfig, ScoringDefaults};
use crate::error::{SessionError, SessionResult, StorageResult};
use crate::history::{append_entry, restore_missing_entry, TrainingHistoryEntry};
use crate::keys::{is_session_key, patient_key, session_key};
use crate::steps::{rate, Step1Result, Step2Result, Step3Result, Step4Result, Step5Result, Step6Result};
use crate::store::{read_json, write_json, KeyValueStore};

pub const STEP_COUNT: usize = 6;

/// One patient's progress through the six steps at one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub session_id: Uuid,
    pub patient: PatientProfile,
    /// Training scenario, e.g. "공원" or "마트".
    pub place: String,
    pub patient_key: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step1: Option<Step1Result>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step2: Option<Step2Result>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step3: Option<Step3Result>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step4: Option<Step4Result>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step5: Option<Step5Result>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step6: Option<Step6Result>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwab_scores: Option<KwabScorePack>,
}

impl TrainingSession {
    pub fn new(patient: &PatientProfile, place: &str) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            patient: patient.clone(),
            place: place.to_string(),
            patient_key: patient_key(patient),
            started_at: Utc::now(),
            completed_at: None,
            step1: None,
            step2: None,
            step3: None,
            step4: None,
            step5: None,
            step6: None,
            kwab_scores: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Saved flags for steps 1 through 6.
    pub fn steps_done(&self) -> [bool; STEP_COUNT] {
        [
            self.step1.is_some(),
            self.step2.is_some(),
            self.step3.is_some(),
            self.step4.is_some(),
            self.step5.is_some(),
            self.step6.is_some(),
        ]
    }

    /// First step without a result, 1-based.
    pub fn next_step(&self) -> Option<usize> {
        self.steps_done().iter().position(|done| !done).map(|i| i + 1)
    }

    /// Percentage of the six steps with a saved result.
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_rate(&self) -> f64 {
        let done = self.steps_done().iter().filter(|d| **d).count();
        done as f64 / STEP_COUNT as f64 * 100.0
    }

    /// Map step results onto the K-WAB domains. Steps not yet saved score
    /// zero; items no step administers take `defaults`.
    pub fn domain_inputs(&self, defaults: &ScoringDefaults) -> DomainInputs {
        let spontaneous_speech = self.step4.as_ref().map_or_else(SpontaneousSpeechInput::default, |s| {
            SpontaneousSpeechInput {
                content_score: (rate(f64::from(s.passed_count()), f64::from(s.total_scenarios)) * 10.0).round(),
                fluency_score: s.average_kwab_score,
            }
        });

        let auditory_comprehension = AuditoryComprehensionInput {
            yes_no_score: self.step1.as_ref().map_or(0.0, |s| s.correct_rate() * 60.0),
            word_recognition_score: self.step3.as_ref().map_or(0.0, |s| s.correct_rate() * 60.0),
            command_score: defaults.command_score,
        };

        DomainInputs {
            spontaneous_speech,
            auditory_comprehension,
            repetition: RepetitionInput {
                total_score: self.step2.as_ref().map_or(0.0, |s| s.average_pronunciation.round()),
            },
            naming: NamingInput {
                object_naming_score: defaults.object_naming_score,
                word_fluency_score: defaults.word_fluency_score,
                sentence_completion_score: defaults.sentence_completion_score,
                sentence_response_score: defaults.sentence_response_score,
            },
            reading: ReadingInput {
                total_score: self.step5.as_ref().map_or(0.0, |s| (s.correct_rate() * 100.0).round()),
            },
            writing: WritingInput {
                total_score: self.step6.as_ref().map_or(0.0, |s| s.accuracy.round()),
            },
            praxis: None,
            construction: None,
        }
    }
}

/// Accumulates step results for one patient and place, rescoring and
/// persisting after every change.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    config: HistoryConfig,
    redactor: PiiRedactor,
    storage_key: String,
    session: TrainingSession,
}

impl SessionManager {
    pub fn open(store: Arc<dyn KeyValueStore>, patient: &PatientProfile, place: &str) -> SessionResult<Self> {
        Self::open_with(store, patient, place, HistoryConfig::default())
    }

    /// Resume the stored session for `patient` at `place`, or start a new
    /// one. A finalized session is not resumed; if its history entry is
    /// missing the entry is written first.
    pub fn open_with(
        store: Arc<dyn KeyValueStore>,
        patient: &PatientProfile,
        place: &str,
        config: HistoryConfig,
    ) -> SessionResult<Self> {
        let redactor = if config.redact_identifiers {
            PiiRedactor::default()
        } else {
            PiiRedactor::disabled()
        };
        let storage_key = session_key(patient, place);

        let existing = match read_json::<TrainingSession>(store.as_ref(), &storage_key)? {
            Some(stored) if stored.is_finalized() => {
                if restore_missing_entry(store.as_ref(), &stored, config.history_limit)? {
                    warn!(
                        patient = %redactor.identifier(&stored.patient_key),
                        place,
                        "Restored missing history entry of a finalized session"
                    );
                }
                None
            }
            stored => stored,
        };
        let resumed = existing.is_some();
        let session = existing.unwrap_or_else(|| TrainingSession::new(patient, place));

        let manager = Self {
            store,
            config,
            redactor,
            storage_key,
            session,
        };

        if resumed {
            info!(
                patient = %manager.patient_id(),
                place,
                completion = manager.completion_rate(),
                "Resumed training session"
            );
        } else {
            manager.persist()?;
            info!(patient = %manager.patient_id(), place, "Started training session");
        }

        Ok(manager)
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn kwab_scores(&self) -> Option<&KwabScorePack> {
        self.session.kwab_scores.as_ref()
    }

    pub fn completion_rate(&self) -> f64 {
        self.session.completion_rate()
    }

    pub fn save_step1_result(&mut self, result: Step1Result) -> SessionResult<()> {
        self.record(1, |s| s.step1 = Some(result))
    }

    pub fn save_step2_result(&mut self, result: Step2Result) -> SessionResult<()> {
        self.record(2, |s| s.step2 = Some(result))
    }

    pub fn save_step3_result(&mut self, result: Step3Result) -> SessionResult<()> {
        self.record(3, |s| s.step3 = Some(result))
    }

    pub fn save_step4_result(&mut self, result: Step4Result) -> SessionResult<()> {
        self.record(4, |s| s.step4 = Some(result))
    }

    pub fn save_step5_result(&mut self, result: Step5Result) -> SessionResult<()> {
        self.record(5, |s| s.step5 = Some(result))
    }

    /// The last step also finalizes the session.
    pub fn save_step6_result(&mut self, result: Step6Result) -> SessionResult<TrainingHistoryEntry> {
        self.record(6, |s| s.step6 = Some(result))?;
        self.finalize()
    }

    /// Stamp completion and append the session to the patient's history.
    /// Further saves are rejected.
    ///
    /// History is written before the finalized session record. If either
    /// write fails the session stays open and `finalize` can be retried.
    pub fn finalize(&mut self) -> SessionResult<TrainingHistoryEntry> {
        self.ensure_open()?;

        self.session.completed_at = Some(Utc::now());
        self.rescore();

        let (entry, kept) = match self.write_history_and_persist() {
            Ok(written) => written,
            Err(e) => {
                self.session.completed_at = None;
                warn!(patient = %self.patient_id(), error = %e, "Finalize failed, session left open");
                return Err(e);
            }
        };

        info!(
            patient = %self.patient_id(),
            place = %self.session.place,
            aq = entry.aq,
            history_entries = kept,
            "Training session finalized"
        );
        Ok(entry)
    }

    fn write_history_and_persist(&self) -> SessionResult<(TrainingHistoryEntry, usize)> {
        let entry = TrainingHistoryEntry::from_session(&self.session)?;
        let kept = append_entry(self.store.as_ref(), &entry, self.config.history_limit)?;
        self.persist()?;
        Ok((entry, kept))
    }

    fn ensure_open(&self) -> SessionResult<()> {
        if self.session.is_finalized() {
            return Err(SessionError::AlreadyFinalized(self.session.session_id));
        }
        Ok(())
    }

    fn record(&mut self, step: usize, apply: impl FnOnce(&mut TrainingSession)) -> SessionResult<()> {
        self.ensure_open()?;
        apply(&mut self.session);
        self.rescore();
        self.persist()?;

        debug!(
            patient = %self.patient_id(),
            step,
            aq = self.session.kwab_scores.as_ref().map_or(0.0, |k| k.aq),
            "Step result saved"
        );
        Ok(())
    }

    fn rescore(&mut self) {
        let inputs = self.session.domain_inputs(&self.config.defaults);
        self.session.kwab_scores = Some(calculate_kwab_scores(&self.session.patient, &inputs));
    }

    fn persist(&self) -> SessionResult<()> {
        write_json(self.store.as_ref(), &self.storage_key, &self.session)?;
        Ok(())
    }

    fn patient_id(&self) -> String {
        self.redactor.identifier(&self.session.patient_key)
    }
}

/// Drop the stored session for `patient` at `place`. History is kept.
pub fn clear_session_for(store: &dyn KeyValueStore, patient: &PatientProfile, place: &str) -> StorageResult<()> {
    store.remove(&session_key(patient, place))
}

/// Drop every stored session of every patient; returns how many.
pub fn clear_all_sessions(store: &dyn KeyValueStore) -> StorageResult<usize> {
    let keys: Vec<String> = store.keys()?.into_iter().filter(|k| is_session_key(k)).collect();
    for key in &keys {
        store.remove(key)?;
    }
    if !keys.is_empty() {
        info!(sessions = keys.len(), "Cleared stored training sessions");
    }
    Ok(keys.len())
}

/// Whether any session record exists in `store`.
pub fn has_active_session(store: &dyn KeyValueStore) -> StorageResult<bool> {
    Ok(store.keys()?.iter().any(|k| is_session_key(k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::error::StorageError;
    use crate::history::get_history_for;
    use crate::keys::HISTORY_STORAGE_PREFIX;
    use crate::resume::get_resume_path;
    use crate::store::MemoryStore;

    fn patient() -> PatientProfile {
        PatientProfile::new("김철수", 74, 6).with_birth_date("1950-03-02")
    }

    fn fluency(scores: &[f64]) -> Step4Result {
        use crate::steps::FluencyItem;
        Step4Result::from_items(
            scores
                .iter()
                .map(|s| FluencyItem {
                    kwab_score: *s,
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_domain_inputs_conversion() {
        let mut session = TrainingSession::new(&patient(), "공원");
        session.step1 = Some(Step1Result::new(8, 10));
        session.step2 = Some(Step2Result {
            items: Vec::new(),
            average_symmetry: 0.0,
            average_pronunciation: 72.6,
            timestamp: Utc::now(),
        });
        session.step3 = Some(Step3Result::new(5, 10));
        session.step4 = Some(fluency(&[8.0, 6.0, 3.0, 7.0]));
        session.step5 = Some(Step5Result::new(3, 4));
        session.step6 = Some(Step6Result::new(5, 5, 88.4));

        let inputs = session.domain_inputs(&ScoringDefaults::default());
        assert!((inputs.auditory_comprehension.yes_no_score - 48.0).abs() < 1e-9);
        assert!((inputs.auditory_comprehension.word_recognition_score - 30.0).abs() < 1e-9);
        assert_eq!(inputs.auditory_comprehension.command_score, 40.0);
        assert_eq!(inputs.repetition.total_score, 73.0);
        assert_eq!(inputs.spontaneous_speech.fluency_score, 6.0);
        // 3 of 4 prompts passed
        assert_eq!(inputs.spontaneous_speech.content_score, 8.0);
        assert_eq!(inputs.naming.object_naming_score, 40.0);
        assert_eq!(inputs.reading.total_score, 75.0);
        assert_eq!(inputs.writing.total_score, 88.0);
    }

    #[test]
    fn test_empty_session_inputs() {
        let session = TrainingSession::new(&patient(), "공원");
        let inputs = session.domain_inputs(&ScoringDefaults::default());
        assert_eq!(inputs.spontaneous_speech, SpontaneousSpeechInput::default());
        assert_eq!(inputs.auditory_comprehension.yes_no_score, 0.0);
        assert_eq!(inputs.repetition.total_score, 0.0);
        assert_eq!(session.next_step(), Some(1));
        assert_eq!(session.completion_rate(), 0.0);
    }

    #[test]
    fn test_zero_scenarios_content_is_zero() {
        let mut session = TrainingSession::new(&patient(), "공원");
        session.step4 = Some(fluency(&[]));
        let inputs = session.domain_inputs(&ScoringDefaults::default());
        assert_eq!(inputs.spontaneous_speech.content_score, 0.0);
    }

    #[test]
    fn test_saves_rescore_and_persist() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut manager = SessionManager::open(store.clone(), &patient(), "공원").unwrap();
        assert!(has_active_session(store.as_ref()).unwrap());

        manager.save_step1_result(Step1Result::new(10, 10)).unwrap();
        let aq_after_one = manager.kwab_scores().unwrap().aq;
        manager.save_step2_result(Step2Result::from_items(Vec::new())).unwrap();
        assert!(manager.kwab_scores().unwrap().aq >= aq_after_one - 1e-9);

        let reopened = SessionManager::open(store, &patient(), "공원").unwrap();
        assert_eq!(reopened.session().session_id, manager.session().session_id);
        assert!((reopened.completion_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_rejects_further_saves() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut manager = SessionManager::open(store.clone(), &patient(), "마트").unwrap();
        manager.save_step1_result(Step1Result::new(6, 10)).unwrap();

        let entry = manager.finalize().unwrap();
        assert_eq!(entry.session_id, manager.session().session_id);
        assert_eq!(entry.step_scores.step1, 60);
        assert!(manager.session().is_finalized());

        let err = manager.save_step2_result(Step2Result::from_items(Vec::new())).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyFinalized(id) if id == entry.session_id));
        assert!(matches!(manager.finalize(), Err(SessionError::AlreadyFinalized(_))));

        // a finalized record is not resumed
        let next = SessionManager::open(store, &patient(), "마트").unwrap();
        assert_ne!(next.session().session_id, entry.session_id);
    }

    /// Memory store whose history writes fail while `reject_history` is set.
    #[derive(Default)]
    struct HistoryQuotaStore {
        inner: MemoryStore,
        reject_history: AtomicBool,
    }

    impl KeyValueStore for HistoryQuotaStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if self.reject_history.load(Ordering::SeqCst) && key.starts_with(HISTORY_STORAGE_PREFIX) {
                return Err(StorageError::Io(io::Error::new(io::ErrorKind::Other, "quota")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> StorageResult<Vec<String>> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_failed_history_write_keeps_session_open() {
        let quota = Arc::new(HistoryQuotaStore::default());
        let store: Arc<dyn KeyValueStore> = quota.clone();
        let mut manager = SessionManager::open(store.clone(), &patient(), "park").unwrap();
        manager.save_step1_result(Step1Result::new(8, 10)).unwrap();

        quota.reject_history.store(true, Ordering::SeqCst);
        let err = manager.finalize().unwrap_err();
        assert!(err.to_string().contains("quota"), "{err}");
        assert!(!manager.session().is_finalized());
        assert!(get_history_for(store.as_ref(), &patient()).unwrap().is_empty());
        assert_eq!(
            get_resume_path(store.as_ref(), &patient(), "park").unwrap(),
            "/step-2?place=park&step1=8"
        );

        // a fresh open resumes the unfinished work
        let reopened = SessionManager::open(store.clone(), &patient(), "park").unwrap();
        assert_eq!(reopened.session().session_id, manager.session().session_id);
        assert!(reopened.session().step1.is_some());

        quota.reject_history.store(false, Ordering::SeqCst);
        let entry = manager.finalize().unwrap();
        assert_eq!(entry.step_scores.step1, 80);
        assert_eq!(get_history_for(store.as_ref(), &patient()).unwrap(), vec![entry]);
        assert!(get_resume_path(store.as_ref(), &patient(), "park").unwrap().starts_with("/result?"));
    }

    #[test]
    fn test_open_restores_missing_history_entry() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut finished = TrainingSession::new(&patient(), "park");
        finished.step1 = Some(Step1Result::new(7, 10));
        finished.completed_at = Some(Utc::now());
        write_json(store.as_ref(), &session_key(&patient(), "park"), &finished).unwrap();

        let manager = SessionManager::open(store.clone(), &patient(), "park").unwrap();
        assert_ne!(manager.session().session_id, finished.session_id);

        let history = get_history_for(store.as_ref(), &patient()).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].session_id, finished.session_id);
        assert_eq!(history[0].step_scores.step1, 70);

        // already present: not appended twice
        SessionManager::open(store.clone(), &patient(), "park").unwrap();
        assert_eq!(get_history_for(store.as_ref(), &patient()).unwrap().len(), 1);
    }

    #[test]
    fn test_trimmed_entry_is_not_restored() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let config = HistoryConfig::default().with_history_limit(1);

        let mut park = SessionManager::open_with(store.clone(), &patient(), "park", config.clone()).unwrap();
        park.finalize().unwrap();
        let mut mart = SessionManager::open_with(store.clone(), &patient(), "mart", config.clone()).unwrap();
        let latest = mart.finalize().unwrap();

        SessionManager::open_with(store.clone(), &patient(), "park", config).unwrap();
        let history = get_history_for(store.as_ref(), &patient()).unwrap();
        assert_eq!(history, vec![latest]);
    }

    #[test]
    fn test_clear_sessions() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        SessionManager::open(store.clone(), &patient(), "공원").unwrap();
        SessionManager::open(store.clone(), &patient(), "마트").unwrap();
        store.set("unrelated", "1").unwrap();

        clear_session_for(store.as_ref(), &patient(), "공원").unwrap();
        assert!(has_active_session(store.as_ref()).unwrap());

        assert_eq!(clear_all_sessions(store.as_ref()).unwrap(), 1);
        assert!(!has_active_session(store.as_ref()).unwrap());
        assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("1"));
    }
}
