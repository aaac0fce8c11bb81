//! `rehab` - operator CLI for the rehabilitation scoring workspace
//!
//! Usage:
//!   rehab pronounce --expected "물 주세요" --actual "물 주새요"
//!   rehab score --name 김철수 --age 74 --education 6 --input inputs.json
//!   rehab save-step --name 김철수 --age 74 --education 6 --place 공원 --step 1 --input step1.json
//!   rehab trend --name 김철수 --age 74 --education 6
//!
//! Settings come from the environment (a `.env` file is loaded first); see
//! `SpeechConfig::from_env`, `HistoryConfig::from_env` and
//! `LoggerConfig::from_env`.

mod cli;
mod commands;

use clap::Parser;
use logger_redacted::{init_tracing, LoggerConfig};
use training_history::HistoryConfig;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let logger = LoggerConfig {
        log_level: cli.log_level.clone(),
        json: cli.log_json || LoggerConfig::from_env().json,
        ..LoggerConfig::from_env()
    };
    init_tracing(&logger)?;

    let mut history = HistoryConfig::from_env();
    if cli.store.is_some() {
        history.store_path = cli.store.clone();
    }
    history.redact_identifiers = logger.redaction_enabled;

    commands::run(cli.command, &history).await
}
