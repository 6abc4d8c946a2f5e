//! Scan handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;

use super::super::types::AppState;
use crate::models::ScanRequest;

/// `POST /api/scan`
///
/// The body is parsed by hand so that malformed JSON gets the same
/// `{success:false, error}` shape as every other rejected scan.
pub async fn scan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // A broken session store must not break scanning; fall back to anonymous.
    let identity = match state.identity.current_identity(&headers).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Identity lookup failed, scanning anonymously: {e}");
            None
        }
    };

    let response = match ScanRequest::from_json(&body) {
        Ok(request) => state.scanner.run_scan(&request, identity.as_ref()).await,
        Err(err) => state.scanner.reject(err),
    };

    (response.status, Json(response.result)).into_response()
}
