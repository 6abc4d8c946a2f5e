//! HTTP handlers.

mod history;
mod metrics;
mod scan;
mod status;

pub use history::{delete_handler, edit_handler, history_handler};
pub use metrics::metrics_handler;
pub use scan::scan_handler;
pub use status::status_handler;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::ErrorResponse;

/// `{"error": message}` with the given status.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
