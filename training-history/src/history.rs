//! Completed-session history per patient

use chrono::{DateTime, Utc};
use kwab_scoring::PatientProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::SessionResult;
use crate::keys::{history_key, patient_key};
use crate::session::TrainingSession;
use crate::store::{read_json, write_json, KeyValueStore};

/// Per-step results on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepScores {
    pub step1: u8,
    pub step2: u8,
    pub step3: u8,
    pub step4: u8,
    pub step5: u8,
    pub step6: u8,
}

/// Item-level records of each step, copied from the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDetails {
    pub step1: Vec<serde_json::Value>,
    pub step2: Vec<serde_json::Value>,
    pub step3: Vec<serde_json::Value>,
    pub step4: Vec<serde_json::Value>,
    pub step5: Vec<serde_json::Value>,
    pub step6: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingHistoryEntry {
    pub history_id: Uuid,
    pub session_id: Uuid,
    pub patient_key: String,
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    pub age: u32,
    pub education_years: u32,
    pub place: String,
    pub completed_at: DateTime<Utc>,
    pub aq: f64,
    #[serde(default)]
    pub step_scores: StepScores,
    #[serde(default)]
    pub step_details: StepDetails,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

fn details<T: Serialize>(items: Option<&Vec<T>>) -> SessionResult<Vec<serde_json::Value>> {
    items
        .into_iter()
        .flatten()
        .map(|item| serde_json::to_value(item).map_err(Into::into))
        .collect()
}

impl StepScores {
    pub fn from_session(session: &TrainingSession) -> Self {
        Self {
            step1: session.step1.as_ref().map_or(0, |s| percent(s.correct_rate() * 100.0)),
            step2: session.step2.as_ref().map_or(0, |s| percent(s.average_pronunciation)),
            step3: session.step3.as_ref().map_or(0, |s| percent(s.score)),
            step4: session.step4.as_ref().map_or(0, |s| percent(s.score * 10.0)),
            step5: session.step5.as_ref().map_or(0, |s| percent(s.correct_rate() * 100.0)),
            step6: session.step6.as_ref().map_or(0, |s| percent(s.accuracy)),
        }
    }
}

impl TrainingHistoryEntry {
    /// Snapshot a finalized session. Sessions that were never scored record
    /// an AQ of zero.
    pub fn from_session(session: &TrainingSession) -> SessionResult<Self> {
        let step_details = StepDetails {
            step1: details(session.step1.as_ref().map(|s| &s.items))?,
            step2: details(session.step2.as_ref().map(|s| &s.items))?,
            step3: session.step3.as_ref().map(|s| s.items.clone()).unwrap_or_default(),
            step4: details(session.step4.as_ref().map(|s| &s.items))?,
            step5: details(session.step5.as_ref().map(|s| &s.items))?,
            step6: details(session.step6.as_ref().map(|s| &s.items))?,
        };

        Ok(Self {
            history_id: Uuid::new_v4(),
            session_id: session.session_id,
            patient_key: session.patient_key.clone(),
            patient_name: session.patient.name.clone(),
            birth_date: session.patient.birth_date.clone(),
            age: session.patient.age,
            education_years: session.patient.education_years,
            place: session.place.clone(),
            completed_at: session.completed_at.unwrap_or_else(Utc::now),
            aq: session.kwab_scores.as_ref().map_or(0.0, |k| k.aq),
            step_scores: StepScores::from_session(session),
            step_details,
        })
    }
}

/// Latest two entries and the AQ change between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqTrend {
    pub latest: Option<TrainingHistoryEntry>,
    pub previous: Option<TrainingHistoryEntry>,
    /// `latest.aq - previous.aq`, one decimal.
    pub delta: Option<f64>,
    pub count: usize,
}

fn load(store: &dyn KeyValueStore, key: &str) -> SessionResult<Vec<TrainingHistoryEntry>> {
    Ok(read_json(store, key)?.unwrap_or_default())
}

/// Append `entry`, replacing any earlier entry of the same session, and
/// trim to the newest `limit` entries.
pub(crate) fn append_entry(
    store: &dyn KeyValueStore,
    entry: &TrainingHistoryEntry,
    limit: Option<usize>,
) -> SessionResult<usize> {
    let key = history_key(&entry.patient_key);
    let mut rows = load(store, &key)?;
    rows.retain(|row| row.session_id != entry.session_id);
    rows.push(entry.clone());

    if let Some(limit) = limit {
        let excess = rows.len().saturating_sub(limit);
        rows.drain(..excess);
    }

    write_json(store, &key, &rows)?;
    debug!(entries = rows.len(), "History updated");
    Ok(rows.len())
}

/// Append the entry of a finalized `session` when history lacks it and it
/// was not trimmed away by `limit`. Returns whether an entry was written.
pub(crate) fn restore_missing_entry(
    store: &dyn KeyValueStore,
    session: &TrainingSession,
    limit: Option<usize>,
) -> SessionResult<bool> {
    let Some(completed_at) = session.completed_at else {
        return Ok(false);
    };
    let rows = load(store, &history_key(&session.patient_key))?;
    if rows.iter().any(|row| row.session_id == session.session_id) {
        return Ok(false);
    }

    let full = limit.is_some_and(|limit| rows.len() >= limit);
    let trimmed = full && rows.first().is_some_and(|oldest| completed_at < oldest.completed_at);
    if trimmed {
        return Ok(false);
    }

    append_entry(store, &TrainingHistoryEntry::from_session(session)?, limit)?;
    Ok(true)
}

/// Every completed session of `patient`, oldest first, across all places.
pub fn get_history_for(store: &dyn KeyValueStore, patient: &PatientProfile) -> SessionResult<Vec<TrainingHistoryEntry>> {
    load(store, &history_key(&patient_key(patient)))
}

/// AQ movement over the patient's history, optionally limited to one place.
pub fn get_aq_trend_for(
    store: &dyn KeyValueStore,
    patient: &PatientProfile,
    place: Option<&str>,
) -> SessionResult<AqTrend> {
    let mut rows: Vec<_> = get_history_for(store, patient)?
        .into_iter()
        .filter(|row| place.map_or(true, |p| row.place == p))
        .collect();

    let count = rows.len();
    let latest = rows.pop();
    let previous = rows.pop();
    let delta = match (&latest, &previous) {
        (Some(l), Some(p)) => Some(((l.aq - p.aq) * 10.0).round() / 10.0),
        _ => None,
    };

    Ok(AqTrend {
        latest,
        previous,
        delta,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn entry(session: u128, place: &str, aq: f64) -> TrainingHistoryEntry {
        TrainingHistoryEntry {
            history_id: Uuid::new_v4(),
            session_id: Uuid::from_u128(session),
            patient_key: "김철수||74|6".to_string(),
            patient_name: "김철수".to_string(),
            birth_date: None,
            age: 74,
            education_years: 6,
            place: place.to_string(),
            completed_at: Utc::now(),
            aq,
            step_scores: StepScores::default(),
            step_details: StepDetails::default(),
        }
    }

    fn patient() -> PatientProfile {
        PatientProfile::new("김철수", 74, 6)
    }

    #[test]
    fn test_append_dedups_session() {
        let store = MemoryStore::new();
        append_entry(&store, &entry(1, "공원", 50.0), None).unwrap();
        append_entry(&store, &entry(2, "공원", 55.0), None).unwrap();
        append_entry(&store, &entry(1, "공원", 52.0), None).unwrap();

        let rows = get_history_for(&store, &patient()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].session_id, Uuid::from_u128(2));
        assert_eq!(rows[1].aq, 52.0);
    }

    #[test]
    fn test_limit_keeps_newest() {
        let store = MemoryStore::new();
        for i in 0..5 {
            append_entry(&store, &entry(i, "마트", f64::from(i as u8)), Some(3)).unwrap();
        }
        let rows = get_history_for(&store, &patient()).unwrap();
        let aqs: Vec<f64> = rows.iter().map(|r| r.aq).collect();
        assert_eq!(aqs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trend_by_place() {
        let store = MemoryStore::new();
        append_entry(&store, &entry(1, "공원", 50.0), None).unwrap();
        append_entry(&store, &entry(2, "마트", 61.0), None).unwrap();
        append_entry(&store, &entry(3, "공원", 58.46), None).unwrap();

        let all = get_aq_trend_for(&store, &patient(), None).unwrap();
        assert_eq!(all.count, 3);
        assert_eq!(all.delta, Some(-2.5));

        let park = get_aq_trend_for(&store, &patient(), Some("공원")).unwrap();
        assert_eq!(park.count, 2);
        assert_eq!(park.delta, Some(8.5));
        assert_eq!(park.previous.unwrap().aq, 50.0);
    }

    #[test]
    fn test_trend_single_and_empty() {
        let store = MemoryStore::new();
        let empty = get_aq_trend_for(&store, &patient(), None).unwrap();
        assert_eq!(empty, AqTrend::default());

        append_entry(&store, &entry(1, "공원", 50.0), None).unwrap();
        let one = get_aq_trend_for(&store, &patient(), None).unwrap();
        assert_eq!(one.count, 1);
        assert!(one.latest.is_some());
        assert!(one.previous.is_none());
        assert_eq!(one.delta, None);
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let store = MemoryStore::new();
        store.set(&history_key("김철수||74|6"), "[{\"nope\":").unwrap();
        assert!(get_history_for(&store, &patient()).unwrap().is_empty());
    }
}
