//! Prometheus metrics handler.

use std::fmt::Write;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use strum::IntoEnumIterator;

use super::super::types::AppState;
use crate::error_handling::{HistoryWriteOutcome, NetworkErrorKind, ScanOutcome};
use crate::storage::BreakerState;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let stats = &state.stats;
    let mut metrics = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(
        metrics,
        "# HELP safescan_uptime_seconds Seconds since the service started\n\
         # TYPE safescan_uptime_seconds gauge\n\
         safescan_uptime_seconds {}\n",
        stats.uptime_seconds()
    );

    let _ = writeln!(
        metrics,
        "# HELP safescan_scans_total Scans by terminal outcome\n\
         # TYPE safescan_scans_total counter"
    );
    for outcome in ScanOutcome::iter() {
        let _ = writeln!(
            metrics,
            "safescan_scans_total{{outcome=\"{}\"}} {}",
            outcome.as_str(),
            stats.outcome_count(outcome)
        );
    }

    let _ = writeln!(
        metrics,
        "\n# HELP safescan_probe_network_errors_total Probe transport failures by class\n\
         # TYPE safescan_probe_network_errors_total counter"
    );
    for kind in NetworkErrorKind::iter() {
        let _ = writeln!(
            metrics,
            "safescan_probe_network_errors_total{{kind=\"{}\"}} {}",
            kind.as_str().replace(' ', "_"),
            stats.network_error_count(kind)
        );
    }

    let _ = writeln!(
        metrics,
        "\n# HELP safescan_history_writes_total Scan history writes by result\n\
         # TYPE safescan_history_writes_total counter"
    );
    for outcome in HistoryWriteOutcome::iter() {
        let _ = writeln!(
            metrics,
            "safescan_history_writes_total{{result=\"{}\"}} {}",
            outcome.as_str(),
            stats.history_write_count(outcome)
        );
    }

    let _ = writeln!(
        metrics,
        "\n# HELP safescan_history_circuit_open Whether history writes are currently skipped\n\
         # TYPE safescan_history_circuit_open gauge\n\
         safescan_history_circuit_open {}",
        u8::from(state.scanner.breaker().state() == BreakerState::Open)
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    )
        .into_response()
}
