//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of the
//! service:
//! - Logger
//! - HTTP client used by the prober
//!
//! The database pool lives in `storage::pool`.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
