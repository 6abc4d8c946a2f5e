//! Security classification and URL validation.
//!
//! This module turns a probed site into a fixed four-item summary:
//! - HTTPS in use (missing HTTPS is an issue)
//! - Content-Security-Policy present
//! - Strict-Transport-Security present
//! - X-Frame-Options present (each missing header is a warning)
//!
//! It also validates scan URLs before anything touches the network.

mod analysis;
mod types;
mod url_validation;

pub use analysis::classify;
pub use types::{Level, Signal, SummaryItem};
pub use url_validation::{ensure_public_target, validate_scan_url};
