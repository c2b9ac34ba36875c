use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::MiningConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ingest: IngestConfig,
    pub mining: MiningConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub ratings_path: PathBuf,
    pub rules_path: PathBuf,
    /// Ratings at or above this value count as purchases.
    pub rating_threshold: f64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub ratings_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub rating_threshold: Option<f64>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ingest: IngestConfig {
                ratings_path: PathBuf::from("fashion_products.csv"),
                rules_path: PathBuf::from("rules.json"),
                rating_threshold: 4.0,
            },
            mining: MiningConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("lookbook.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(ingest) = patch.ingest {
            if let Some(ratings_path) = ingest.ratings_path {
                self.ingest.ratings_path = ratings_path;
            }
            if let Some(rules_path) = ingest.rules_path {
                self.ingest.rules_path = rules_path;
            }
            if let Some(rating_threshold) = ingest.rating_threshold {
                self.ingest.rating_threshold = rating_threshold;
            }
        }

        if let Some(mining) = patch.mining {
            if let Some(min_support) = mining.min_support {
                self.mining.min_support = min_support;
            }
            if let Some(min_lift) = mining.min_lift {
                self.mining.min_lift = min_lift;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("LOOKBOOK_RATINGS_PATH") {
            self.ingest.ratings_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("LOOKBOOK_RULES_PATH") {
            self.ingest.rules_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("LOOKBOOK_RATING_THRESHOLD") {
            self.ingest.rating_threshold = parse_f64("LOOKBOOK_RATING_THRESHOLD", &value)?;
        }

        if let Some(value) = read_env("LOOKBOOK_MIN_SUPPORT") {
            self.mining.min_support = parse_f64("LOOKBOOK_MIN_SUPPORT", &value)?;
        }
        if let Some(value) = read_env("LOOKBOOK_MIN_LIFT") {
            self.mining.min_lift = parse_f64("LOOKBOOK_MIN_LIFT", &value)?;
        }

        let log_level =
            read_env("LOOKBOOK_LOGGING_LEVEL").or_else(|| read_env("LOOKBOOK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("LOOKBOOK_LOGGING_FORMAT").or_else(|| read_env("LOOKBOOK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(ratings_path) = overrides.ratings_path {
            self.ingest.ratings_path = ratings_path;
        }
        if let Some(rules_path) = overrides.rules_path {
            self.ingest.rules_path = rules_path;
        }
        if let Some(rating_threshold) = overrides.rating_threshold {
            self.ingest.rating_threshold = rating_threshold;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ingest(&self.ingest)?;
        validate_mining(&self.mining)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("lookbook.toml"), PathBuf::from("config/lookbook.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_ingest(ingest: &IngestConfig) -> Result<(), ConfigError> {
    if ingest.ratings_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("ingest.ratings_path must not be empty".to_string()));
    }
    if ingest.rules_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("ingest.rules_path must not be empty".to_string()));
    }

    let threshold = ingest.rating_threshold;
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 5.0 {
        return Err(ConfigError::Validation(
            "ingest.rating_threshold must be in range (0, 5] on the ratings scale".to_string(),
        ));
    }

    Ok(())
}

fn validate_mining(mining: &MiningConfig) -> Result<(), ConfigError> {
    mining.validate().map_err(|error| ConfigError::Validation(error.to_string()))
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    ingest: Option<IngestPatch>,
    mining: Option<MiningPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct IngestPatch {
    ratings_path: Option<PathBuf>,
    rules_path: Option<PathBuf>,
    rating_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct MiningPatch {
    min_support: Option<f64>,
    min_lift: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
