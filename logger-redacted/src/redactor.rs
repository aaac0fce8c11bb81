use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern compiles");
    // 900101-1234567
    static ref RRN_REGEX: Regex = Regex::new(r"\b\d{6}-?[1-4]\d{6}\b").expect("registration number pattern compiles");
    // 1950-03-02, 1950.03.02, 1950/03/02
    static ref DATE_REGEX: Regex =
        Regex::new(r"\b(?:19|20)\d{2}[-./](?:0[1-9]|1[0-2])[-./](?:0[1-9]|[12]\d|3[01])\b").expect("date pattern compiles");
    // 010-1234-5678, 02 123 4567, 01012345678
    static ref PHONE_REGEX: Regex = Regex::new(r"\b0\d{1,2}[-.\s]?\d{3,4}[-.\s]?\d{4}\b").expect("phone pattern compiles");
}

/// Which kinds of personal data are scrubbed from free text.
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_registration_numbers: bool,
    pub redact_dates: bool,
    /// Replace matches with a short hash instead of a fixed mask so the same
    /// value can be followed across log lines.
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            redact_registration_numbers: true,
            redact_dates: true,
            hash_for_correlation: true,
        }
    }
}

/// Short, stable pseudonym for a patient identifier.
///
/// First 8 bytes of SHA-256, base64 encoded. Not reversible, but identical
/// inputs always give the same output.
pub fn hash_identifier(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    general_purpose::URL_SAFE_NO_PAD.encode(&digest[..8])
}

/// Scrubs personal data from log text and pseudonymizes patient keys.
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// A redactor that passes everything through untouched.
    pub fn disabled() -> Self {
        Self::new(RedactionConfig {
            enabled: false,
            ..RedactionConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Log-safe form of a patient key or name.
    pub fn identifier(&self, value: &str) -> String {
        if self.config.enabled {
            format!("patient:{}", hash_identifier(value))
        } else {
            value.to_string()
        }
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // Registration numbers and dates go first; the phone pattern would
        // otherwise eat parts of them.
        if self.config.redact_registration_numbers {
            result = self.replace(&RRN_REGEX, &result, "RRN", "******-*******");
        }
        if self.config.redact_dates {
            result = self.replace(&DATE_REGEX, &result, "DATE", "****-**-**");
        }
        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }
        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", "***-****-****");
        }

        result
    }

    fn replace(&self, pattern: &Regex, text: &str, tag: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                if self.config.hash_for_correlation {
                    format!("{tag}[{}]", hash_identifier(&caps[0]))
                } else {
                    mask.to_string()
                }
            })
            .into_owned()
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", hash_identifier(email));
                }
                match email.split_once('@') {
                    Some((user, domain)) => {
                        let u: String = user.chars().take(1).collect();
                        let d: String = domain.chars().take(1).collect();
                        format!("{u}***@{d}***")
                    }
                    None => "***@***".to_string(),
                }
            })
            .into_owned()
    }
}
