//! Error categorization.
//!
//! Maps `reqwest` transport errors onto the probe error taxonomy.

use super::types::{NetworkErrorKind, ProbeError};

/// Categorizes a `reqwest::Error` into a `NetworkErrorKind`.
///
/// Probes never call `error_for_status`, so HTTP status codes are not errors
/// here; only the transport predicates are consulted.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> NetworkErrorKind {
    if error.is_builder() {
        NetworkErrorKind::Builder
    } else if error.is_redirect() {
        NetworkErrorKind::Redirect
    } else if error.is_timeout() {
        NetworkErrorKind::Timeout
    } else if error.is_connect() {
        NetworkErrorKind::Connect
    } else if error.is_request() {
        NetworkErrorKind::Request
    } else if error.is_body() || error.is_decode() {
        NetworkErrorKind::Body
    } else {
        NetworkErrorKind::Other
    }
}

/// Converts a transport error into `ProbeError::NetworkError`.
///
/// The diagnostic walks the source chain so DNS and TLS causes, which reqwest
/// wraps, end up in the log line.
pub fn network_error_from_reqwest(error: &reqwest::Error) -> ProbeError {
    let mut diagnostic = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        diagnostic.push_str(": ");
        diagnostic.push_str(&cause.to_string());
        source = cause.source();
    }
    ProbeError::NetworkError {
        kind: categorize_reqwest_error(error),
        diagnostic,
    }
}
