//! Logging setup for serpack binaries and tests.
//!
//! Only available with the `logging` feature. Libraries embedding serpack
//! should install their own subscriber; serpack itself only emits tracing
//! events.

use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Verbosity for build output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    /// Entry, proxy and chunk emission (default)
    #[default]
    Info,
    /// Resolution decisions and the dependency index dump
    Debug,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {other}")),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Install a global subscriber at `level`. `RUST_LOG` directives still apply
/// on top. Only the first call in a process has any effect.
///
/// ```rust,no_run
/// use serpack_bundler::logging::{LogLevel, init_logging};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| install(level));
}

/// Install a global subscriber driven by `RUST_LOG`, defaulting to info.
pub fn init_logging_from_env() {
    INIT.call_once(|| install(LogLevel::Info));
}

fn install(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.level_filter().into())
        .from_env_lossy();

    // try_init: a host may already own the global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).without_time())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("OFF".parse::<LogLevel>().unwrap(), LogLevel::Silent);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn displays_as_filter() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Silent.to_string(), "off");
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
