//! Structured logging setup for stacklens
//!
//! Logs go to stderr through a `tracing` subscriber so that command output on
//! stdout stays machine-readable. `RUST_LOG` directives are honored on top of
//! the configured level, and `STACKLENS_LOG_JSON=true` switches to JSON lines.
//!
//! # Example
//!
//! ```no_run
//! use stacklens::util::{init_logging, LoggingConfig};
//!
//! init_logging(LoggingConfig::for_cli(Some("debug"), false, false));
//! tracing::debug!(technologies = 3, "Analysis complete");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Dependencies whose logs are capped at WARN unless `RUST_LOG` says otherwise
const QUIET_CRATES: &[&str] = &["h2", "hyper", "hyper_util", "reqwest"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for `stacklens` targets
    pub level: Level,

    /// Emit JSON lines instead of the console format
    pub use_json: bool,

    /// Include the module target (e.g., stacklens::analysis) in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Resolves the level for a CLI invocation
    ///
    /// An explicit `--log-level` wins, then `--verbose` (DEBUG), then
    /// `--quiet` (ERROR), then `STACKLENS_LOG_LEVEL`. `STACKLENS_LOG_JSON`
    /// selects JSON output in every case.
    pub fn for_cli(log_level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        let level = match log_level {
            Some(level_str) => parse_level(level_str),
            None if verbose => Level::DEBUG,
            None if quiet => Level::ERROR,
            None => parse_level(
                &env::var("STACKLENS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            ),
        };

        Self {
            level,
            use_json: json_from_env(),
            ..Default::default()
        }
    }
}

fn json_from_env() -> bool {
    env::var("STACKLENS_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

/// Parses a log level, case-insensitively. Unknown values fall back to
/// `INFO` with a note on stderr.
///
/// ```
/// use stacklens::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("DEBUG"), Level::DEBUG);
/// assert_eq!(parse_level("chatty"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut directives = vec![format!("stacklens={}", config.level)];

        // Without RUST_LOG, keep HTTP client internals quiet
        if env::var("RUST_LOG").is_err() {
            directives.extend(QUIET_CRATES.iter().map(|c| format!("{}=warn", c)));
        }

        let filter = build_filter(&directives);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target),
                )
                .init();
        }
    });
}

/// Builds an `EnvFilter` from `RUST_LOG` plus the given directives.
///
/// Directives that fail to parse are reported on stderr and skipped.
fn build_filter(directives: &[String]) -> EnvFilter {
    directives
        .iter()
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            match directive.parse() {
                Ok(parsed) => filter.add_directive(parsed),
                Err(e) => {
                    eprintln!("Ignoring log directive '{}': {}", directive, e);
                    filter
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
        assert_eq!(parse_level("INFO"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_invalid() {
        assert_eq!(parse_level("invalid"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
        assert!(config.include_target);
    }

    #[test]
    #[serial]
    fn test_for_cli_precedence() {
        env::remove_var("STACKLENS_LOG_JSON");
        assert_eq!(LoggingConfig::for_cli(Some("warn"), true, false).level, Level::WARN);
        assert_eq!(LoggingConfig::for_cli(None, true, true).level, Level::DEBUG);
        assert_eq!(LoggingConfig::for_cli(None, false, true).level, Level::ERROR);
        assert!(!LoggingConfig::for_cli(None, false, false).use_json);
    }

    #[test]
    #[serial]
    fn test_for_cli_reads_env() {
        env::set_var("STACKLENS_LOG_LEVEL", "trace");
        env::set_var("STACKLENS_LOG_JSON", "true");
        let config = LoggingConfig::for_cli(None, false, false);
        env::remove_var("STACKLENS_LOG_LEVEL");
        env::remove_var("STACKLENS_LOG_JSON");

        assert_eq!(config.level, Level::TRACE);
        assert!(config.use_json);
    }

    #[test]
    fn test_build_filter_skips_bad_directives() {
        let filter = build_filter(&["stacklens=debug".to_string(), "stacklens=loud".to_string()]);
        assert!(filter.to_string().contains("stacklens=debug"));
    }
}
