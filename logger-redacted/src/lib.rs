//! Logging setup for the rehabilitation workspace
//!
//! Installs a `tracing` subscriber (plain text or JSON lines) and provides
//! [`PiiRedactor`] for keeping patient data out of log output. Patient keys
//! contain names and birth dates, so every crate logs them through
//! [`PiiRedactor::identifier`] rather than verbatim.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: kim@example.com → k***@e***
//! - **Phone Numbers**: 010-1234-5678 → ***-****-****
//! - **Resident Registration Numbers**: 500302-1234567 → ******-*******
//! - **Dates**: 1950-03-02 → ****-**-**
//!
//! With `hash_for_correlation` (the default) matches become short hashes
//! such as `PHONE[x1Yz...]` instead of fixed masks.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig};
//! use tracing::info;
//!
//! let config = LoggerConfig::from_env();
//! init_tracing(&config).ok();
//!
//! let redactor = config.redactor();
//! info!(patient = %redactor.identifier("김철수|1950-03-02|74|6"), "Session opened");
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;

/// Install the global subscriber. `RUST_LOG` wins over `config.log_level`
/// when set. Output goes to stderr so command output stays clean.
pub fn init_tracing(config: &LoggerConfig) -> LoggerResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
