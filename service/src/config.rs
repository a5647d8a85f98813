use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use meeting_auth::providers::{DEFAULT_ASSEMBLYAI_BASE_URL, DEFAULT_HUGGING_FACE_BASE_URL};

/// Summarization model used when `HF_SUMMARY_MODEL` is not set.
pub const DEFAULT_SUMMARY_MODEL: &str = "sshleifer/distilbart-cnn-12-6";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// How partial chunk summaries are reduced to one final summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Summarize the joined chunk summaries once, whatever their length.
    SinglePass,
    /// Re-chunk the joined summaries until they fit one chunk, then summarize once.
    Recursive,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MergeStrategyParseError;

impl FromStr for MergeStrategy {
    type Err = MergeStrategyParseError;
    fn from_str(value: &str) -> Result<MergeStrategy, Self::Err> {
        match value.to_lowercase().as_str() {
            "single-pass" | "single_pass" => Ok(MergeStrategy::SinglePass),
            "recursive" => Ok(MergeStrategy::Recursive),
            _ => Err(MergeStrategyParseError),
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MergeStrategy::SinglePass => write!(f, "single-pass"),
            MergeStrategy::Recursive => write!(f, "recursive"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The meeting recording to transcribe and summarize (mp3, wav or m4a).
    pub audio_file: Option<PathBuf>,

    /// Write the final summary to this plain-text file.
    #[arg(short, long, env)]
    pub summary_output: Option<PathBuf>,

    /// The API key to use when calling the AssemblyAI API.
    #[arg(long, env)]
    assemblyai_api_key: Option<String>,

    /// The base URL of the AssemblyAI API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_ASSEMBLYAI_BASE_URL)]
    assemblyai_base_url: String,

    /// The API key to use when calling the Hugging Face Inference API.
    #[arg(long, env)]
    huggingface_api_key: Option<String>,

    /// The base URL of the Hugging Face Inference API.
    #[arg(long, env, default_value = DEFAULT_HUGGING_FACE_BASE_URL)]
    huggingface_base_url: String,

    /// The Hugging Face model used to summarize transcript chunks.
    #[arg(long, env, default_value = DEFAULT_SUMMARY_MODEL)]
    pub hf_summary_model: String,

    /// Maximum number of characters in each transcript chunk sent to the model.
    #[arg(long, env, default_value_t = 4000)]
    pub chunk_size: usize,

    /// Number of model calls attempted per chunk before falling back to an extractive summary.
    #[arg(long, env, default_value_t = 3)]
    pub summary_retries: u32,

    /// Seconds to wait after a failed or unusable model response.
    #[arg(long, env, default_value_t = 3)]
    pub retry_delay_secs: u64,

    /// Seconds to wait after a network fault while calling the model.
    #[arg(long, env, default_value_t = 2)]
    pub transport_retry_delay_secs: u64,

    /// Timeout in seconds for each summarization request.
    #[arg(long, env, default_value_t = 90)]
    pub summarization_timeout_secs: u64,

    /// Timeout in seconds for each transcription request (upload, job creation, poll).
    #[arg(long, env, default_value_t = 60)]
    pub transcription_timeout_secs: u64,

    /// Seconds between transcription status polls.
    #[arg(long, env, default_value_t = 5)]
    pub poll_interval_secs: u64,

    /// Maximum number of status polls before the transcription is reported as timed out.
    #[arg(long, env, default_value_t = 120)]
    pub max_poll_attempts: u32,

    /// How partial chunk summaries are merged into the final summary.
    #[arg(
        long,
        env,
        default_value_t = MergeStrategy::SinglePass,
        value_parser = clap::builder::PossibleValuesParser::new(["single-pass", "recursive"])
            .map(|s| s.parse::<MergeStrategy>().unwrap()),
    )]
    pub merge_strategy: MergeStrategy,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Parse from an explicit argument list, ignoring the process arguments.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::try_parse_from(args)
    }

    /// Returns the AssemblyAI API key, if configured.
    pub fn assemblyai_api_key(&self) -> Option<SecretString> {
        self.assemblyai_api_key.clone().map(SecretString::new)
    }

    /// Returns the AssemblyAI API base URL.
    pub fn assemblyai_base_url(&self) -> &str {
        &self.assemblyai_base_url
    }

    /// Returns the Hugging Face API key, if configured.
    pub fn huggingface_api_key(&self) -> Option<SecretString> {
        self.huggingface_api_key.clone().map(SecretString::new)
    }

    /// Returns the Hugging Face Inference API base URL.
    pub fn huggingface_base_url(&self) -> &str {
        &self.huggingface_base_url
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn transport_retry_delay(&self) -> Duration {
        Duration::from_secs(self.transport_retry_delay_secs)
    }

    pub fn summarization_timeout(&self) -> Duration {
        Duration::from_secs(self.summarization_timeout_secs)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = Config::from_args(["meeting_summarizer"]).unwrap();

        assert_eq!(config.audio_file, None);
        assert_eq!(config.hf_summary_model, DEFAULT_SUMMARY_MODEL);
        assert_eq!(config.chunk_size, 4000);
        assert_eq!(config.summary_retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(3));
        assert_eq!(config.transport_retry_delay(), Duration::from_secs(2));
        assert_eq!(config.summarization_timeout(), Duration::from_secs(90));
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.merge_strategy, MergeStrategy::SinglePass);
        assert_eq!(config.log_level_filter, LevelFilter::Info);
    }

    #[test]
    fn test_default_base_urls_come_from_provider_presets() {
        let config = Config::from_args(["meeting_summarizer"]).unwrap();

        assert_eq!(
            config.assemblyai_base_url(),
            meeting_auth::providers::assemblyai_config().base_url
        );
        assert_eq!(
            config.huggingface_base_url(),
            meeting_auth::providers::hugging_face_config().base_url
        );
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::from_args([
            "meeting_summarizer",
            "standup.mp3",
            "--assemblyai-api-key",
            "aai_123",
            "--chunk-size",
            "1000",
            "--merge-strategy",
            "recursive",
            "--summary-output",
            "summary.txt",
        ])
        .unwrap();

        assert_eq!(config.audio_file, Some(PathBuf::from("standup.mp3")));
        assert_eq!(
            config.assemblyai_api_key().unwrap().expose_secret(),
            "aai_123"
        );
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.merge_strategy, MergeStrategy::Recursive);
        assert_eq!(config.summary_output, Some(PathBuf::from("summary.txt")));
    }

    #[test]
    fn test_unknown_merge_strategy_is_rejected() {
        let result = Config::from_args(["meeting_summarizer", "--merge-strategy", "pairwise"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_strategy_round_trips_through_display() {
        for strategy in [MergeStrategy::SinglePass, MergeStrategy::Recursive] {
            assert_eq!(strategy.to_string().parse::<MergeStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_rust_env_parse_is_case_insensitive() {
        assert_eq!("PRODUCTION".parse::<RustEnv>(), Ok(RustEnv::Production));
        assert_eq!("staging".parse::<RustEnv>(), Ok(RustEnv::Staging));
        assert_eq!("qa".parse::<RustEnv>(), Err(RustEnvParseError));
    }
}
