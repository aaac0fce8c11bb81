use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kwab_scoring::PatientProfile;

/// Aphasia rehabilitation scoring tools
#[derive(Parser, Debug)]
#[command(name = "rehab")]
#[command(about = "Pronunciation scoring, K-WAB scoring and training history")]
#[command(version)]
pub struct Cli {
    /// JSON document holding sessions and history
    #[arg(long, global = true, env = "REHAB_STORE_PATH")]
    pub store: Option<PathBuf>,

    /// Log filter directive
    #[arg(long, global = true, env = "REHAB_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct PatientArgs {
    /// Patient name
    #[arg(long)]
    pub name: String,

    /// Birth date, e.g. 1950-03-02
    #[arg(long)]
    pub birth_date: Option<String>,

    #[arg(long)]
    pub age: u32,

    /// Years of formal education
    #[arg(long)]
    pub education: u32,
}

impl PatientArgs {
    pub fn profile(&self) -> PatientProfile {
        PatientProfile {
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            age: self.age,
            education_years: self.education,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a transcript against the expected sentence
    Pronounce {
        #[arg(long)]
        expected: String,
        #[arg(long)]
        actual: String,
    },

    /// Split text into consonant and vowel channels
    Decompose { text: String },

    /// Compute K-WAB quotients, severity and type from domain inputs (JSON)
    Score {
        #[command(flatten)]
        patient: PatientArgs,

        /// File with `DomainInputs` JSON, `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },

    /// Compare an AQ with the age/education norm group
    Norm {
        #[arg(long)]
        aq: f64,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        education: u32,
    },

    /// Replay a WAV recording through transcription and scoring
    AnalyzeWav {
        #[arg(long)]
        file: PathBuf,

        /// Sentence the patient was asked to say
        #[arg(long)]
        expected: String,

        /// Skip transcription and return a canned result
        #[arg(long, env = "SPEECH_DEV_MODE")]
        dev: bool,

        /// Expected answer length for the fluency estimate, in seconds
        #[arg(long, default_value = "10")]
        min_duration: f64,
    },

    /// Save one step result (JSON) into the patient's current session
    SaveStep {
        #[command(flatten)]
        patient: PatientArgs,

        #[arg(long)]
        place: String,

        /// Step number, 1-6
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
        step: u8,

        /// File with the step result JSON, `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },

    /// Finalize the current session without waiting for step 6
    Finalize {
        #[command(flatten)]
        patient: PatientArgs,
        #[arg(long)]
        place: String,
    },

    /// Route at which the patient should continue
    Resume {
        #[command(flatten)]
        patient: PatientArgs,
        #[arg(long)]
        place: String,
    },

    /// All completed sessions of a patient
    History {
        #[command(flatten)]
        patient: PatientArgs,
    },

    /// Latest AQ change
    Trend {
        #[command(flatten)]
        patient: PatientArgs,
        #[arg(long)]
        place: Option<String>,
    },

    /// Remove the patient's in-progress session at one place
    Clear {
        #[command(flatten)]
        patient: PatientArgs,
        #[arg(long)]
        place: String,
    },

    /// Remove every stored in-progress session
    ClearAll,
}
