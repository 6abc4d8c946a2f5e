//! Configuration constants.
//!
//! Defaults and limits shared by the scanner, the HTTP surface and storage.

use std::time::Duration;

/// Hard deadline for a single probe, in seconds.
/// A probe that has not produced response headers by then is cancelled.
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 8;
/// Upper bound accepted for `--scan-timeout-secs`.
pub const MAX_SCAN_TIMEOUT_SECS: u64 = 120;

pub const DB_PATH: &str = "./safescan.db";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default User-Agent string for probe requests.
pub const DEFAULT_USER_AGENT: &str = concat!("SafeScan/", env!("CARGO_PKG_VERSION"));

/// Maximum URL length accepted for a scan (2048 characters).
/// This matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

// Redirect handling
/// Maximum number of redirect hops the probe client follows
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Separator used when a response repeats a header name.
pub const HEADER_VALUE_SEPARATOR: &str = ", ";

// Sessions
/// Cookie carrying the session token when no bearer token is sent.
pub const SESSION_COOKIE_NAME: &str = "safescan_session";
/// Lifetime of sessions minted through `SessionIdentityProvider::issue_session`.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

// History write circuit breaker
/// Consecutive history write failures before writes are skipped
pub const HISTORY_WRITE_FAILURE_THRESHOLD: u32 = 5;
/// How long history writes stay disabled once the breaker opens
pub const HISTORY_WRITE_COOLDOWN: Duration = Duration::from_secs(60);

// Client-facing messages
pub const MSG_INVALID_URL: &str = "Invalid URL";
pub const MSG_MALFORMED_URL: &str = "Malformed URL";
pub const MSG_UNSUPPORTED_SCHEME: &str = "URL must start with http:// or https://";
pub const MSG_BLOCKED_TARGET: &str = "URL points to a private or local address";
pub const MSG_SCAN_TIMEOUT: &str =
    "Scan timed out. The site may be slow or unresponsive. Please try again later.";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch site.";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";
pub const MSG_NOT_AUTHENTICATED: &str = "Not authenticated";
pub const MSG_MISSING_SCAN_ID: &str = "Missing scan id";
pub const MSG_INVALID_NOTES: &str = "Notes must be a string or null";
pub const MSG_NOT_FOUND_OR_NOT_AUTHORIZED: &str = "Not found or not authorized";
