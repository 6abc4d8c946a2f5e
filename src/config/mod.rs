//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, messages)
//! - HTTP header name constants
//! - CLI option types, parsing and validation

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, ConfigValidationError, LogFormat, LogLevel};
