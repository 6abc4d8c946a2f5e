//! Error handling and scan statistics.
//!
//! This module provides:
//! - The scan error taxonomy and its HTTP status mapping
//! - Probe, database and initialization error types
//! - Categorization of transport errors
//! - Thread-safe counters for scan outcomes
//!
//! Scan errors are grouped into:
//! - **Client errors** (400): missing, malformed, unsupported or blocked URLs
//! - **Gateway errors** (502/504): the target failed or was too slow
//! - **Internal errors** (500): anything unexpected
//!
//! History write failures never become scan errors; they are logged and counted.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, network_error_from_reqwest};
pub use stats::ScanStats;
pub use types::{
    DatabaseError, HistoryWriteOutcome, InitializationError, NetworkErrorKind, ProbeError,
    ScanError, ScanOutcome,
};
