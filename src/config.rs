use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::llm::request::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SEED, DEFAULT_TEMPERATURE, MAX_TOP_LOGPROBS};
use crate::uncertainty::DEFAULT_LOGPROB_THRESHOLD;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "OPENAI_BASE_URL";
pub const ORG_ID_VAR: &str = "OPENAI_ORG_ID";
pub const CONFIG_PATH_VAR: &str = "PHENOMENOLOGIST_CONFIG";
pub const MODEL_VAR: &str = "PHENOMENOLOGIST_MODEL";
pub const THRESHOLD_VAR: &str = "PHENOMENOLOGIST_THRESHOLD";
pub const MAX_TOKENS_VAR: &str = "PHENOMENOLOGIST_MAX_TOKENS";
pub const TEMPERATURE_VAR: &str = "PHENOMENOLOGIST_TEMPERATURE";
pub const SEED_VAR: &str = "PHENOMENOLOGIST_SEED";
pub const TOP_LOGPROBS_VAR: &str = "PHENOMENOLOGIST_TOP_LOGPROBS";

/// Top-k alternatives requested per token unless overridden.
pub const DEFAULT_TOP_LOGPROBS: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to read .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

/// Everything a run needs: the credential plus generation defaults.
///
/// Precedence, lowest first: built-in defaults, the TOML file named by
/// `PHENOMENOLOGIST_CONFIG`, a `.env` file (only through
/// [`Settings::from_env_and_dotenv`]), then exported environment variables.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub api_base: Option<String>,
    pub organization: Option<String>,
    pub model: String,
    pub logprob_threshold: f64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub seed: i64,
    pub top_logprobs: u8,
}

// Keeps the key out of logs and panic messages.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("organization", &self.organization)
            .field("model", &self.model)
            .field("logprob_threshold", &self.logprob_threshold)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("seed", &self.seed)
            .field("top_logprobs", &self.top_logprobs)
            .finish()
    }
}

/// Optional overrides read from the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileSettings {
    api_key: Option<String>,
    api_base: Option<String>,
    organization: Option<String>,
    model: Option<String>,
    logprob_threshold: Option<f64>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    seed: Option<i64>,
    top_logprobs: Option<u8>,
}

impl FileSettings {
    pub(crate) fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Settings::from_env`], with a `.env` file in the working directory
    /// (or a parent) filling in variables that are not exported. The process
    /// environment itself is left untouched.
    pub fn from_env_and_dotenv() -> Result<Self, ConfigError> {
        let dotenv = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_dotenv(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(variables = dotenv.len(), ".env values loaded");
        Self::from_lookup(with_dotenv(|key| std::env::var(key).ok(), dotenv))
    }

    /// Load settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match non_blank(lookup(CONFIG_PATH_VAR)) {
            Some(path) => {
                let path = PathBuf::from(path);
                debug!(path = %path.display(), "reading config file");
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
                FileSettings::from_toml(&text)?
            }
            None => FileSettings::default(),
        };
        Self::resolve(file, lookup)
    }

    pub(crate) fn resolve<F>(file: FileSettings, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_blank(lookup(API_KEY_VAR))
            .or(non_blank(file.api_key))
            .ok_or_else(|| {
                ConfigError::MissingConfig(format!("please set the {API_KEY_VAR} environment variable"))
            })?;

        let settings = Settings {
            api_key,
            api_base: non_blank(lookup(API_BASE_VAR)).or(non_blank(file.api_base)),
            organization: non_blank(lookup(ORG_ID_VAR)).or(non_blank(file.organization)),
            model: non_blank(lookup(MODEL_VAR))
                .or(non_blank(file.model))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            logprob_threshold: parse_var(&lookup, THRESHOLD_VAR)?
                .or(file.logprob_threshold)
                .unwrap_or(DEFAULT_LOGPROB_THRESHOLD),
            max_tokens: parse_var(&lookup, MAX_TOKENS_VAR)?
                .or(file.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: parse_var(&lookup, TEMPERATURE_VAR)?
                .or(file.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            seed: parse_var(&lookup, SEED_VAR)?
                .or(file.seed)
                .unwrap_or(DEFAULT_SEED),
            top_logprobs: parse_var(&lookup, TOP_LOGPROBS_VAR)?
                .or(file.top_logprobs)
                .unwrap_or(DEFAULT_TOP_LOGPROBS),
        };
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !self.logprob_threshold.is_finite() {
            return Err(ConfigError::InvalidConfig("logprob_threshold must be a finite number".into()));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidConfig(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidConfig("max_tokens must be positive".into()));
        }
        if self.top_logprobs > MAX_TOP_LOGPROBS {
            return Err(ConfigError::InvalidConfig(format!(
                "top_logprobs must be between 0 and {MAX_TOP_LOGPROBS}"
            )));
        }
        Ok(())
    }
}

/// Parse `.env` content into name/value pairs.
pub fn dotenv_values<R: Read>(reader: R) -> Result<HashMap<String, String>, ConfigError> {
    collect_dotenv(dotenvy::from_read_iter(reader))
}

fn collect_dotenv<I>(iter: I) -> Result<HashMap<String, String>, ConfigError>
where
    I: Iterator<Item = Result<(String, String), dotenvy::Error>>,
{
    Ok(iter.collect::<Result<HashMap<_, _>, _>>()?)
}

/// `lookup` first, then the `.env` values.
pub fn with_dotenv<F>(lookup: F, dotenv: HashMap<String, String>) -> impl Fn(&str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    move |key| lookup(key).or_else(|| dotenv.get(key).cloned())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match non_blank(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidConfig(format!("{key}={raw:?}: {e}"))),
        None => Ok(None),
    }
}
