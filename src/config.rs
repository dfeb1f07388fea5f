//! Configuration management for stacklens
//!
//! Settings load from environment variables with fallback defaults.
//!
//! # Environment Variables
//!
//! - `STACKLENS_CACHE_ENABLED`: Enable the result cache (true|false) - default: "true"
//! - `STACKLENS_CACHE_TTL`: Cache entry lifetime in seconds - default: "3600"
//! - `STACKLENS_CACHE_MAX_SIZE`: Maximum cached results - default: "1000"
//! - `STACKLENS_MAX_INPUT_BYTES`: Largest accepted input text - default: "1048576" (1 MiB)
//! - `STACKLENS_STRIP_CODE_COMMENTS`: Strip comments from code-like input - default: "true"
//! - `STACKLENS_STATE_PATH`: Registry state file - default: `<data dir>/stacklens/tech_state.json`
//! - `STACKLENS_ENRICHMENT_URL`: Markdown technology list used by `refresh` - default: unset
//! - `STACKLENS_ENRICHMENT_TIMEOUT`: Enrichment deadline in seconds - default: "10"
//! - `STACKLENS_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use stacklens::StacklensConfig;
//!
//! let config = StacklensConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_CACHE_ENABLED: bool = true;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_MAX_SIZE: usize = 1000;
const DEFAULT_MAX_INPUT_BYTES: usize = 1_048_576;
const DEFAULT_STRIP_CODE_COMMENTS: bool = true;
const DEFAULT_ENRICHMENT_TIMEOUT_SECS: u64 = 10;
const MAX_ENRICHMENT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LOG_LEVEL: &str = "info";
const STATE_FILE_NAME: &str = "tech_state.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StacklensConfig {
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    pub cache_max_size: usize,
    pub max_input_bytes: usize,
    /// Strip comments before matching when the input looks like source code.
    pub strip_code_comments: bool,
    /// `None` keeps the registry in memory only.
    pub state_path: Option<PathBuf>,
    pub enrichment_url: Option<String>,
    pub enrichment_timeout_secs: u64,
    pub log_level: String,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn env_parse_strict<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::ParseError {
                field: key.to_string(),
                error: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("stacklens").join(STATE_FILE_NAME))
}

impl Default for StacklensConfig {
    /// Loads from `STACKLENS_*` environment variables, falling back to
    /// [`StacklensConfig::builtin`] values.
    fn default() -> Self {
        let builtin = Self::builtin();

        Self {
            cache_enabled: env_parse("STACKLENS_CACHE_ENABLED").unwrap_or(builtin.cache_enabled),
            cache_ttl_secs: env_parse("STACKLENS_CACHE_TTL").unwrap_or(builtin.cache_ttl_secs),
            cache_max_size: env_parse("STACKLENS_CACHE_MAX_SIZE")
                .unwrap_or(builtin.cache_max_size),
            max_input_bytes: env_parse("STACKLENS_MAX_INPUT_BYTES")
                .unwrap_or(builtin.max_input_bytes),
            strip_code_comments: env_parse("STACKLENS_STRIP_CODE_COMMENTS")
                .unwrap_or(builtin.strip_code_comments),
            state_path: env_nonempty("STACKLENS_STATE_PATH")
                .map(PathBuf::from)
                .or_else(default_state_path),
            enrichment_url: env_nonempty("STACKLENS_ENRICHMENT_URL"),
            enrichment_timeout_secs: env_parse("STACKLENS_ENRICHMENT_TIMEOUT")
                .unwrap_or(builtin.enrichment_timeout_secs),
            log_level: env::var("STACKLENS_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
                .to_lowercase(),
        }
    }
}

impl StacklensConfig {
    /// Built-in defaults, ignoring the environment. No state file.
    pub fn builtin() -> Self {
        Self {
            cache_enabled: DEFAULT_CACHE_ENABLED,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_max_size: DEFAULT_CACHE_MAX_SIZE,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            strip_code_comments: DEFAULT_STRIP_CODE_COMMENTS,
            state_path: None,
            enrichment_url: None,
            enrichment_timeout_secs: DEFAULT_ENRICHMENT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Like `default()`, but a set variable that fails to parse is an error
    /// instead of silently falling back.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = env_parse_strict("STACKLENS_CACHE_ENABLED")? {
            config.cache_enabled = v;
        }
        if let Some(v) = env_parse_strict("STACKLENS_CACHE_TTL")? {
            config.cache_ttl_secs = v;
        }
        if let Some(v) = env_parse_strict("STACKLENS_CACHE_MAX_SIZE")? {
            config.cache_max_size = v;
        }
        if let Some(v) = env_parse_strict("STACKLENS_MAX_INPUT_BYTES")? {
            config.max_input_bytes = v;
        }
        if let Some(v) = env_parse_strict("STACKLENS_STRIP_CODE_COMMENTS")? {
            config.strip_code_comments = v;
        }
        if let Some(v) = env_parse_strict("STACKLENS_ENRICHMENT_TIMEOUT")? {
            config.enrichment_timeout_secs = v;
        }

        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for a zero cache TTL or size,
    /// a zero input limit, an enrichment timeout outside 1..=120 seconds, or
    /// an unknown log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Cache TTL must be at least 1 second".to_string(),
            ));
        }
        if self.cache_max_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "Cache max size must be at least 1".to_string(),
            ));
        }
        if self.max_input_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max input size must be at least 1 byte".to_string(),
            ));
        }
        if self.enrichment_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Enrichment timeout must be at least 1 second".to_string(),
            ));
        }
        if self.enrichment_timeout_secs > MAX_ENRICHMENT_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(format!(
                "Enrichment timeout cannot exceed {} seconds",
                MAX_ENRICHMENT_TIMEOUT_SECS
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for StacklensConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stacklens Configuration:")?;
        writeln!(f, "  Cache Enabled: {}", self.cache_enabled)?;
        writeln!(f, "  Cache TTL: {}s", self.cache_ttl_secs)?;
        writeln!(f, "  Cache Max Size: {}", self.cache_max_size)?;
        writeln!(f, "  Max Input: {} bytes", self.max_input_bytes)?;
        writeln!(f, "  Strip Code Comments: {}", self.strip_code_comments)?;
        match self.state_path {
            Some(ref path) => writeln!(f, "  State Path: {}", path.display())?,
            None => writeln!(f, "  State Path: (in memory)")?,
        }
        if let Some(ref url) = self.enrichment_url {
            writeln!(f, "  Enrichment URL: {}", url)?;
        }
        writeln!(f, "  Enrichment Timeout: {}s", self.enrichment_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
