//! Error type definitions.
//!
//! This module defines the scan error taxonomy, the probe and storage errors
//! underneath it, and the outcome enums counted by `ScanStats`.

use std::time::Duration;

use axum::http::StatusCode;
use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::{
    MSG_BLOCKED_TARGET, MSG_FETCH_FAILED, MSG_INTERNAL_ERROR, MSG_INVALID_URL, MSG_MALFORMED_URL,
    MSG_SCAN_TIMEOUT, MSG_UNSUPPORTED_SCHEME,
};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A scan result could not be serialized for storage.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Transport-level failure classes for a probe.
///
/// Derived from the `reqwest::Error` predicates; see
/// [`categorize_reqwest_error`](super::categorize_reqwest_error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum NetworkErrorKind {
    Connect,
    Timeout,
    Redirect,
    Request,
    Body,
    Builder,
    Other,
}

impl NetworkErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorKind::Connect => "connect error",
            NetworkErrorKind::Timeout => "transport timeout",
            NetworkErrorKind::Redirect => "redirect error",
            NetworkErrorKind::Request => "request error",
            NetworkErrorKind::Body => "body error",
            NetworkErrorKind::Builder => "request builder error",
            NetworkErrorKind::Other => "other error",
        }
    }
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures of a single probe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The URL does not use http or https; nothing was sent.
    #[error("Refusing to probe non-http(s) URL: {0}")]
    InvalidUrl(String),

    /// No response arrived before the deadline; the request was cancelled.
    #[error("Probe timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// DNS, connection, TLS or other transport failure.
    #[error("Probe failed ({kind}): {diagnostic}")]
    NetworkError {
        kind: NetworkErrorKind,
        diagnostic: String,
    },
}

/// Scan failures as reported to the caller.
///
/// `Display` yields the client-facing message; `status_code` yields the HTTP
/// status the scan endpoint answers with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// URL missing, empty or not a string.
    #[error("{}", MSG_INVALID_URL)]
    InvalidInput,

    /// URL does not parse.
    #[error("{}", MSG_MALFORMED_URL)]
    MalformedUrl,

    /// URL parses but its scheme is not http or https.
    #[error("{}", MSG_UNSUPPORTED_SCHEME)]
    UnsupportedScheme,

    /// Target host is local or private and private targets are blocked.
    #[error("{}", MSG_BLOCKED_TARGET)]
    BlockedTarget(String),

    /// The probe exceeded its deadline.
    #[error("{}", MSG_SCAN_TIMEOUT)]
    Timeout,

    /// The probe failed at the transport level.
    #[error("{}", MSG_FETCH_FAILED)]
    NetworkError(String),

    /// Anything unexpected during validation, probing or classification.
    #[error("{}", MSG_INTERNAL_ERROR)]
    Internal(String),
}

impl ScanError {
    /// HTTP status for this error class.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScanError::InvalidInput
            | ScanError::MalformedUrl
            | ScanError::UnsupportedScheme
            | ScanError::BlockedTarget(_) => StatusCode::BAD_REQUEST,
            ScanError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ScanError::NetworkError(_) => StatusCode::BAD_GATEWAY,
            ScanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors caused by the request rather than the target or the service.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Outcome counter this error is recorded under.
    pub fn outcome(&self) -> ScanOutcome {
        match self {
            ScanError::InvalidInput
            | ScanError::MalformedUrl
            | ScanError::UnsupportedScheme
            | ScanError::BlockedTarget(_) => ScanOutcome::Rejected,
            ScanError::Timeout => ScanOutcome::TimedOut,
            ScanError::NetworkError(_) => ScanOutcome::NetworkFailed,
            ScanError::Internal(_) => ScanOutcome::InternalError,
        }
    }
}

impl From<ProbeError> for ScanError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::InvalidUrl(_) => ScanError::UnsupportedScheme,
            ProbeError::Timeout(_) => ScanError::Timeout,
            ProbeError::NetworkError { kind, diagnostic } => {
                ScanError::NetworkError(format!("{kind}: {diagnostic}"))
            }
        }
    }
}

/// Terminal state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ScanOutcome {
    Succeeded,
    Rejected,
    TimedOut,
    NetworkFailed,
    InternalError,
}

impl ScanOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanOutcome::Succeeded => "succeeded",
            ScanOutcome::Rejected => "rejected",
            ScanOutcome::TimedOut => "timed_out",
            ScanOutcome::NetworkFailed => "network_failed",
            ScanOutcome::InternalError => "internal_error",
        }
    }
}

/// Result of the best-effort history write that follows an authenticated scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum HistoryWriteOutcome {
    Saved,
    Failed,
    /// Write not attempted because the circuit breaker is open
    Skipped,
}

impl HistoryWriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryWriteOutcome::Saved => "saved",
            HistoryWriteOutcome::Failed => "failed",
            HistoryWriteOutcome::Skipped => "skipped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        for err in [
            ScanError::InvalidInput,
            ScanError::MalformedUrl,
            ScanError::UnsupportedScheme,
            ScanError::BlockedTarget("127.0.0.1".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert!(err.is_client_error());
            assert_eq!(err.outcome(), ScanOutcome::Rejected);
        }
    }

    #[test]
    fn test_gateway_statuses() {
        assert_eq!(ScanError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ScanError::NetworkError("connect error: refused".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ScanError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages_distinct() {
        let messages = [
            ScanError::InvalidInput.to_string(),
            ScanError::MalformedUrl.to_string(),
            ScanError::UnsupportedScheme.to_string(),
        ];
        assert_eq!(messages[0], "Invalid URL");
        assert_eq!(messages[1], "Malformed URL");
        assert_eq!(messages[2], "URL must start with http:// or https://");
    }

    #[test]
    fn test_network_error_hides_diagnostic_from_message() {
        let err = ScanError::from(ProbeError::NetworkError {
            kind: NetworkErrorKind::Connect,
            diagnostic: "dns error: no such host".into(),
        });
        assert_eq!(err.to_string(), "Failed to fetch site.");
        match err {
            ScanError::NetworkError(diag) => {
                assert_eq!(diag, "connect error: dns error: no such host")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_probe_timeout_maps_to_scan_timeout() {
        let err = ScanError::from(ProbeError::Timeout(Duration::from_secs(8)));
        assert_eq!(err, ScanError::Timeout);
        assert!(err.to_string().starts_with("Scan timed out."));
    }
}
