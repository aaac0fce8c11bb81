use kwab_scoring::PatientProfile;

pub const SESSION_STORAGE_PREFIX: &str = "kwab_training_session";
pub const HISTORY_STORAGE_PREFIX: &str = "kwab_training_history";

/// `name|birth_date|age|education_years`, each part trimmed and lowercased.
pub fn patient_key(patient: &PatientProfile) -> String {
    let normalize = |v: &str| v.trim().to_lowercase();
    [
        normalize(&patient.name),
        normalize(patient.birth_date.as_deref().unwrap_or_default()),
        patient.age.to_string(),
        patient.education_years.to_string(),
    ]
    .join("|")
}

/// Key of the in-progress session for one patient at one place.
pub fn session_key(patient: &PatientProfile, place: &str) -> String {
    format!("{SESSION_STORAGE_PREFIX}:{}:{place}", patient_key(patient))
}

pub fn history_key(patient_key: &str) -> String {
    format!("{HISTORY_STORAGE_PREFIX}:{patient_key}")
}

pub(crate) fn is_session_key(key: &str) -> bool {
    key.strip_prefix(SESSION_STORAGE_PREFIX)
        .is_some_and(|rest| rest.starts_with(':'))
}
