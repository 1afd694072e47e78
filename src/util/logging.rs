//! Structured logging setup for mutorch
//!
//! Logging uses the `tracing` ecosystem, but no subscriber is installed
//! process-wide by the library. Instead a [`Logger`] wraps a
//! [`tracing::Dispatch`] and is handed to every component at construction.
//! Components route their events through it with [`Logger::scope`] (sync
//! code) or [`Logger::attach`] (futures).
//!
//! # Example
//!
//! ```no_run
//! use mutorch::util::{Logger, LoggingConfig};
//! use tracing::{info, Level};
//!
//! let logger = Logger::from_config(&LoggingConfig::with_level(Level::DEBUG));
//! logger.scope(|| info!(solution = "App.sln", "Resolving workspace"));
//! ```

use std::env;
use std::future::Future;
use tracing::instrument::{WithDispatch, WithSubscriber};
use tracing::{Dispatch, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Configuration for building a [`Logger`]
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format (for structured logging in production)
    pub use_json: bool,

    /// Include the module target (e.g., mutorch::workspace) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Include thread ID and name in logs
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }

    /// Reads `MUTORCH_LOG_LEVEL` and `MUTORCH_LOG_JSON`, falling back to defaults
    pub fn from_env() -> Self {
        let level_str = env::var("MUTORCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let level = parse_level(&level_str);

        let use_json = env::var("MUTORCH_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// Case-insensitive; unknown values fall back to `Level::INFO`.
///
/// ```
/// use mutorch::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
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

/// Explicitly passed logging handle
///
/// Cloning is cheap; all clones share the same underlying subscriber.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Logger that discards every event
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Builds a subscriber from `config` without installing it globally
    ///
    /// `RUST_LOG` directives are honoured on top of the configured level.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = format!("mutorch={}", config.level).parse() {
            filter = filter.add_directive(directive);
        }

        let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if config.use_json {
            fmt::layer()
                .json()
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread_ids)
                .with_thread_names(config.include_thread_ids)
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            fmt::layer()
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread_ids)
                .with_thread_names(config.include_thread_ids)
                .with_writer(std::io::stderr)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);
        Self::new(Dispatch::new(subscriber))
    }

    /// Runs `f` with this logger as the default subscriber
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Routes every event emitted while polling `future` to this logger
    pub fn attach<F: Future>(&self, future: F) -> WithDispatch<F> {
        future.with_subscriber(self.dispatch.clone())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_parse_level_case_insensitive() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
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
        assert!(!config.include_location);
        assert!(!config.include_thread_ids);
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.use_json);
        assert!(config.include_location);
        assert!(config.include_thread_ids);
    }

    #[test]
    fn test_development_config() {
        let config = LoggingConfig::development();
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.use_json);
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("MUTORCH_LOG_LEVEL", "warn");
        env::set_var("MUTORCH_LOG_JSON", "true");

        let config = LoggingConfig::from_env();

        env::remove_var("MUTORCH_LOG_LEVEL");
        env::remove_var("MUTORCH_LOG_JSON");

        assert_eq!(config.level, Level::WARN);
        assert!(config.use_json);
    }

    #[test]
    fn test_scope_returns_closure_value() {
        let logger = Logger::disabled();
        let value = logger.scope(|| {
            tracing::info!("discarded");
            42
        });
        assert_eq!(value, 42);
    }

    #[test]
    fn test_from_config_builds_both_formats() {
        let pretty = Logger::from_config(&LoggingConfig::development());
        let json = Logger::from_config(&LoggingConfig::production());
        pretty.scope(|| tracing::debug!("pretty"));
        json.scope(|| tracing::info!("json"));
    }

    #[tokio::test]
    async fn test_attach_wraps_future() {
        let logger = Logger::disabled();
        let value = logger.attach(async { 7 }).await;
        assert_eq!(value, 7);
    }
}
