//! Classification types.

use serde::{Deserialize, Serialize};

/// Signals reported for every scanned site, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "CSP")]
    Csp,
    #[serde(rename = "HSTS")]
    Hsts,
    #[serde(rename = "XFO")]
    XFrameOptions,
}

impl Signal {
    /// Display name used in summary messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Signal::Https => "HTTPS",
            Signal::Csp => "CSP",
            Signal::Hsts => "HSTS",
            Signal::XFrameOptions => "X-Frame-Options",
        }
    }

    /// Lower-case response header backing this signal, if any
    pub fn header_name(&self) -> Option<&'static str> {
        match self {
            Signal::Https => None,
            Signal::Csp => Some(crate::config::HEADER_CONTENT_SECURITY_POLICY),
            Signal::Hsts => Some(crate::config::HEADER_STRICT_TRANSPORT_SECURITY),
            Signal::XFrameOptions => Some(crate::config::HEADER_X_FRAME_OPTIONS),
        }
    }
}

/// Severity of a summary item.
///
/// Missing HTTPS is an `Issue`; a missing hardening header is only a `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Pass,
    Warning,
    Issue,
}

/// One classified signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub signal: Signal,
    pub level: Level,
    pub message: String,
}

impl SummaryItem {
    pub(crate) fn new(signal: Signal, level: Level, message: impl Into<String>) -> Self {
        SummaryItem {
            signal,
            level,
            message: message.into(),
        }
    }
}
