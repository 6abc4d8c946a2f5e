//! safescan library: website security-header scanning
//!
//! This library checks a site for HTTPS and three hardening headers
//! (Content-Security-Policy, Strict-Transport-Security and X-Frame-Options),
//! keeps a per-user history of scans in SQLite and serves both over HTTP.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use safescan::{classify, Level};
//!
//! let mut headers = BTreeMap::new();
//! headers.insert("strict-transport-security".to_string(), "max-age=100".to_string());
//!
//! let levels: Vec<Level> = classify(true, &headers).into_iter().map(|i| i.level).collect();
//! assert_eq!(levels, vec![Level::Pass, Level::Warning, Level::Pass, Level::Warning]);
//! ```
//!
//! # Requirements
//!
//! Probing, storage and the server require a Tokio runtime.

pub mod config;
mod error_handling;
pub mod initialization;
mod models;
mod probe;
mod scan;
mod security;
pub mod server;
pub mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    DatabaseError, HistoryWriteOutcome, InitializationError, NetworkErrorKind, ProbeError,
    ScanError, ScanOutcome, ScanStats,
};
pub use models::{Identity, ScanRecord, ScanRequest, ScanResult};
pub use probe::{normalize_headers, HttpProber, ProbeOutcome, SiteProber};
pub use scan::{ScanResponse, Scanner};
pub use security::{classify, ensure_public_target, validate_scan_url, Level, Signal, SummaryItem};
pub use server::{build_app_state, router, start_server, AppState};
