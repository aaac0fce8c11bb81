use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use kwab_scoring::{calculate_kwab_scores, get_aq_normal_comparison, percentile, sd_band, DomainInputs, Severity};
use parking_lot::Mutex;
use pronunciation_analyzer::{analyze, decompose};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use speech_session_service::{FluencyMetrics, SpeechAnalyzer, SpeechConfig, WavFileCapture};
use tracing::{info, warn};
use training_history::{
    clear_all_sessions, clear_session_for, get_aq_trend_for, get_history_for, get_resume_path, FileStore,
    HistoryConfig, KeyValueStore, MemoryStore, SessionManager, Step1Result, Step2Result, Step3Result, Step4Result,
    Step5Result, Step6Result,
};

use crate::cli::{Command, PatientArgs};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse JSON from `path`, or stdin when `path` is `-`.
fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn open_store(config: &HistoryConfig) -> Result<Arc<dyn KeyValueStore>> {
    match &config.store_path {
        Some(path) => {
            let store = FileStore::open(path).with_context(|| format!("opening store {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("No store path configured; sessions last only for this command");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn open_session(store: Arc<dyn KeyValueStore>, patient: &PatientArgs, place: &str, config: &HistoryConfig) -> Result<SessionManager> {
    Ok(SessionManager::open_with(store, &patient.profile(), place, config.clone())?)
}

pub async fn run(command: Command, config: &HistoryConfig) -> Result<()> {
    match command {
        Command::Pronounce { expected, actual } => print_json(&analyze(&expected, &actual)),

        Command::Decompose { text } => print_json(&decompose(&text)),

        Command::Score { patient, input } => {
            let inputs: DomainInputs = read_input(&input)?;
            let pack = calculate_kwab_scores(&patient.profile(), &inputs);
            info!(aq = pack.aq, outcome = pack.aphasia_label(), "Scored assessment");
            print_json(&pack)
        }

        Command::Norm { aq, age, education } => print_json(&json!({
            "comparison": get_aq_normal_comparison(aq, age, education),
            "percentile": percentile(aq, age, education),
            "sdBand": sd_band(aq, age, education).label(),
            "severity": Severity::from_aq(aq).label(),
        })),

        Command::AnalyzeWav {
            file,
            expected,
            dev,
            min_duration,
        } => analyze_wav(&file, &expected, dev, min_duration).await,

        Command::SaveStep {
            patient,
            place,
            step,
            input,
        } => {
            let mut manager = open_session(open_store(config)?, &patient, &place, config)?;
            match step {
                1 => manager.save_step1_result(read_input::<Step1Result>(&input)?)?,
                2 => manager.save_step2_result(read_input::<Step2Result>(&input)?)?,
                3 => manager.save_step3_result(read_input::<Step3Result>(&input)?)?,
                4 => manager.save_step4_result(read_input::<Step4Result>(&input)?)?,
                5 => manager.save_step5_result(read_input::<Step5Result>(&input)?)?,
                6 => {
                    let entry = manager.save_step6_result(read_input::<Step6Result>(&input)?)?;
                    return print_json(&entry);
                }
                other => bail!("no such step: {other}"),
            }
            print_json(&json!({
                "completionRate": manager.completion_rate(),
                "kwabScores": manager.kwab_scores(),
            }))
        }

        Command::Finalize { patient, place } => {
            let mut manager = open_session(open_store(config)?, &patient, &place, config)?;
            print_json(&manager.finalize()?)
        }

        Command::Resume { patient, place } => {
            let store = open_store(config)?;
            println!("{}", get_resume_path(store.as_ref(), &patient.profile(), &place)?);
            Ok(())
        }

        Command::History { patient } => {
            let store = open_store(config)?;
            print_json(&get_history_for(store.as_ref(), &patient.profile())?)
        }

        Command::Trend { patient, place } => {
            let store = open_store(config)?;
            print_json(&get_aq_trend_for(store.as_ref(), &patient.profile(), place.as_deref())?)
        }

        Command::Clear { patient, place } => {
            let store = open_store(config)?;
            clear_session_for(store.as_ref(), &patient.profile(), &place)?;
            Ok(())
        }

        Command::ClearAll => {
            let store = open_store(config)?;
            let removed = clear_all_sessions(store.as_ref())?;
            println!("{removed}");
            Ok(())
        }
    }
}

async fn analyze_wav(file: &Path, expected: &str, dev: bool, min_duration: f64) -> Result<()> {
    let mut config = SpeechConfig::from_env()?;
    config.dev_mode |= dev;

    let levels = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&levels);

    let mut analyzer = SpeechAnalyzer::new(WavFileCapture::new(file), config)?;
    analyzer
        .start_analysis(
            Some(Box::new(move |level: f64| sink.lock().push(level))),
            None,
        )
        .await?;
    let result = analyzer.stop_analysis(expected).await?;

    let levels = levels.lock().clone();
    #[allow(clippy::cast_precision_loss)]
    let seconds = result.duration_ms as f64 / 1000.0;
    let fluency = FluencyMetrics::from_levels(&levels, seconds, min_duration);

    print_json(&json!({
        "analysis": result,
        "fluency": fluency,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientArgs {
        PatientArgs {
            name: "김철수".to_string(),
            birth_date: None,
            age: 74,
            education: 6,
        }
    }

    #[tokio::test]
    async fn test_save_step_and_resume_through_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("store.json");
        let step_path = dir.path().join("step1.json");
        std::fs::write(&step_path, r#"{"correctAnswers":9,"totalQuestions":10}"#).unwrap();

        let config = HistoryConfig {
            store_path: Some(store_path),
            ..HistoryConfig::default()
        };

        run(
            Command::SaveStep {
                patient: patient(),
                place: "park".to_string(),
                step: 1,
                input: step_path,
            },
            &config,
        )
        .await
        .unwrap();

        let store = open_store(&config).unwrap();
        assert_eq!(
            get_resume_path(store.as_ref(), &patient().profile(), "park").unwrap(),
            "/step-2?place=park&step1=9"
        );
    }

    #[tokio::test]
    async fn test_score_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("inputs.json");
        std::fs::write(&input, "{not json").unwrap();

        let err = run(
            Command::Score {
                patient: patient(),
                input,
            },
            &HistoryConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("parsing"));
    }
}
