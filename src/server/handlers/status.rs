//! JSON status handler.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use strum::IntoEnumIterator;

use super::super::types::{AppState, HistoryWriteCounts, StatusResponse};
use crate::error_handling::{HistoryWriteOutcome, NetworkErrorKind, ScanOutcome};

/// JSON status endpoint with scan counters
pub async fn status_handler(State(state): State<AppState>) -> Response {
    let stats = &state.stats;

    let scans: BTreeMap<&'static str, usize> = ScanOutcome::iter()
        .map(|outcome| (outcome.as_str(), stats.outcome_count(outcome)))
        .collect();
    let network_errors: BTreeMap<&'static str, usize> = NetworkErrorKind::iter()
        .map(|kind| (kind.as_str(), stats.network_error_count(kind)))
        .collect();

    let response = StatusResponse {
        uptime_seconds: stats.uptime_seconds(),
        total_scans: stats.total_scans(),
        scans,
        network_errors,
        history_writes: HistoryWriteCounts {
            saved: stats.history_write_count(HistoryWriteOutcome::Saved),
            failed: stats.history_write_count(HistoryWriteOutcome::Failed),
            skipped: stats.history_write_count(HistoryWriteOutcome::Skipped),
            circuit: state.scanner.breaker().state().as_str(),
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}
