use kwab_scoring::PatientProfile;

use crate::error::StorageResult;
use crate::keys::session_key;
use crate::session::TrainingSession;
use crate::store::{read_json, KeyValueStore};

/// Progress values carried in the route query, one per step.
struct ProgressParams {
    step1: String,
    step2: String,
    step3: String,
    step4: String,
    step5: String,
    step6: String,
}

impl ProgressParams {
    fn from_session(session: &TrainingSession) -> Self {
        Self {
            step1: session.step1.as_ref().map_or(0, |s| s.correct_answers).to_string(),
            step2: session
                .step2
                .as_ref()
                .map_or(0.0, |s| s.average_pronunciation.round())
                .to_string(),
            step3: session.step3.as_ref().map_or(0.0, |s| s.score).to_string(),
            step4: session.step4.as_ref().map_or(0.0, |s| s.score).to_string(),
            step5: session
                .step5
                .as_ref()
                .map_or(0.0, |s| (s.correct_rate() * 100.0).round())
                .to_string(),
            step6: session.step6.as_ref().map_or(0.0, |s| s.accuracy).to_string(),
        }
    }
}

fn start_path(place: &str) -> String {
    format!("/step-1?place={place}")
}

/// Route at which the patient should continue training at `place`.
///
/// Points at the first step without a saved result, carrying the earlier
/// steps' scores as query parameters, or at `/result` once all six are in
/// or the session was finalized. Missing or unreadable sessions start over
/// at step 1.
pub fn get_resume_path(store: &dyn KeyValueStore, patient: &PatientProfile, place: &str) -> StorageResult<String> {
    let p = urlencoding::encode(place);

    let Some(session) = read_json::<TrainingSession>(store, &session_key(patient, place))? else {
        return Ok(start_path(&p));
    };
    let s = ProgressParams::from_session(&session);

    if session.is_finalized() {
        return Ok(result_path(&p, &s));
    }

    let path = match session.next_step() {
        Some(1) => start_path(&p),
        Some(2) => format!("/step-2?place={p}&step1={}", s.step1),
        Some(3) => format!("/step-3?place={p}&step1={}&step2={}", s.step1, s.step2),
        Some(4) => format!("/step-4?place={p}&step1={}&step2={}&step3={}", s.step1, s.step2, s.step3),
        Some(5) => format!("/step-5?place={p}&step3={}&step4={}", s.step3, s.step4),
        Some(_) => format!(
            "/step-6?place={p}&step1={}&step2={}&step3={}&step4={}&step5={}",
            s.step1, s.step2, s.step3, s.step4, s.step5
        ),
        None => result_path(&p, &s),
    };
    Ok(path)
}

fn result_path(place: &str, s: &ProgressParams) -> String {
    format!(
        "/result?place={place}&step1={}&step2={}&step3={}&step4={}&step5={}&step6={}",
        s.step1, s.step2, s.step3, s.step4, s.step5, s.step6
    )
}
