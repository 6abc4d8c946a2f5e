//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration. Every flag can also be supplied through a `SAFESCAN_*`
//! environment variable (or a `.env` file loaded by the binary).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    DB_PATH, DEFAULT_BIND, DEFAULT_SCAN_TIMEOUT_SECS, DEFAULT_USER_AGENT, MAX_SCAN_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Service configuration.
///
/// Parsed from the command line by the binary, or constructed directly by
/// library users and tests.
///
/// # Examples
///
/// ```no_run
/// use safescan::Config;
///
/// let config = Config {
///     scan_timeout_secs: 5,
///     block_private_targets: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "safescan",
    version,
    about = "Checks websites for HTTPS and common security headers."
)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "SAFESCAN_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Database path (SQLite file)
    #[arg(long, env = "SAFESCAN_DB_PATH", value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Hard deadline for a single scan, in seconds
    #[arg(long, env = "SAFESCAN_SCAN_TIMEOUT_SECS", default_value_t = DEFAULT_SCAN_TIMEOUT_SECS)]
    pub scan_timeout_secs: u64,

    /// HTTP User-Agent header value sent with probes
    #[arg(long, env = "SAFESCAN_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Refuse to scan localhost, private, link-local and reserved addresses
    #[arg(long, env = "SAFESCAN_BLOCK_PRIVATE_TARGETS", default_value_t = false)]
    pub block_private_targets: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, env = "SAFESCAN_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, env = "SAFESCAN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            db_path: PathBuf::from(DB_PATH),
            scan_timeout_secs: DEFAULT_SCAN_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            block_private_targets: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and which values are accepted
    pub message: String,
}

impl Config {
    /// Scan deadline as a `Duration`.
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    /// Checks values that clap cannot express as types.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.scan_timeout_secs == 0 {
            return Err(ConfigValidationError {
                field: "scan_timeout_secs",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.scan_timeout_secs > MAX_SCAN_TIMEOUT_SECS {
            return Err(ConfigValidationError {
                field: "scan_timeout_secs",
                message: format!(
                    "must be at most {} seconds (got {})",
                    MAX_SCAN_TIMEOUT_SECS, self.scan_timeout_secs
                ),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "user_agent",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan_timeout(), Duration::from_secs(8));
        assert!(!config.block_private_targets);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = Config {
            scan_timeout_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "scan_timeout_secs");
        assert!(err.message.contains("greater than 0"));
    }

    #[test]
    fn test_excessive_timeout_rejected() {
        let config = Config {
            scan_timeout_secs: MAX_SCAN_TIMEOUT_SECS + 1,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "scan_timeout_secs");
        assert!(err.message.contains("120"));
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let config = Config {
            user_agent: "   ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "user_agent");
        assert_eq!(err.to_string(), "invalid user_agent: must not be empty");
    }

    #[test]
    fn test_parse_cli_flags() {
        let config = Config::try_parse_from([
            "safescan",
            "--bind",
            "0.0.0.0:8080",
            "--scan-timeout-secs",
            "3",
            "--block-private-targets",
            "--log-format",
            "json",
        ])
        .expect("flags should parse");
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.scan_timeout_secs, 3);
        assert!(config.block_private_targets);
        assert!(matches!(config.log_format, LogFormat::Json));
    }

    #[test]
    fn test_parse_rejects_bad_bind_address() {
        assert!(Config::try_parse_from(["safescan", "--bind", "not-an-address"]).is_err());
    }
}
