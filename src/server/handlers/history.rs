//! Scan history handlers.
//!
//! All three endpoints require an identity. Edit and delete answer 404 both
//! for missing records and for records owned by someone else.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info};

use super::super::types::{AppState, HistoryMutation, HistoryResponse, NotesChange, OkResponse};
use super::error_response;
use crate::config::{
    MSG_INTERNAL_ERROR, MSG_INVALID_NOTES, MSG_MISSING_SCAN_ID, MSG_NOT_AUTHENTICATED,
    MSG_NOT_FOUND_OR_NOT_AUTHORIZED,
};
use crate::error_handling::DatabaseError;
use crate::models::Identity;

/// Resolves the caller, or the response to send instead.
async fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, Response> {
    match state.identity.current_identity(headers).await {
        Ok(Some(identity)) => Ok(identity),
        Ok(None) => Err(error_response(StatusCode::UNAUTHORIZED, MSG_NOT_AUTHENTICATED)),
        Err(e) => {
            error!("Identity lookup failed: {e}");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                MSG_INTERNAL_ERROR,
            ))
        }
    }
}

fn storage_failure(action: &str, e: DatabaseError) -> Response {
    error!("Failed to {action}: {e}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR)
}

/// Answer for a mutation that reported whether it touched a record.
fn mutation_response(applied: bool) -> Response {
    if applied {
        (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, MSG_NOT_FOUND_OR_NOT_AUTHORIZED)
    }
}

/// `GET /api/history`
pub async fn history_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    match state.history.list_by_owner(&identity.id).await {
        Ok(records) => {
            let scans = records.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(HistoryResponse { scans })).into_response()
        }
        Err(e) => storage_failure("list scan history", e),
    }
}

/// `PATCH /api/history/edit`
///
/// A body without a `notes` key leaves the notes as they are; `null` clears them.
pub async fn edit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let mutation = HistoryMutation::from_json(&body);
    let Some(scan_id) = mutation.scan_id() else {
        return error_response(StatusCode::BAD_REQUEST, MSG_MISSING_SCAN_ID);
    };

    let outcome = match &mutation.notes {
        NotesChange::Invalid => {
            return error_response(StatusCode::BAD_REQUEST, MSG_INVALID_NOTES);
        }
        NotesChange::Keep => state.history.owns(scan_id, &identity.id).await,
        NotesChange::Clear => state.history.update_notes(scan_id, &identity.id, None).await,
        NotesChange::Set(notes) => {
            state
                .history
                .update_notes(scan_id, &identity.id, Some(notes))
                .await
        }
    };

    match outcome {
        Ok(applied) => {
            if applied {
                info!("Updated notes of scan {scan_id}");
            }
            mutation_response(applied)
        }
        Err(e) => storage_failure("update scan notes", e),
    }
}

/// `DELETE /api/history/delete`
pub async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let mutation = HistoryMutation::from_json(&body);
    let Some(scan_id) = mutation.scan_id() else {
        return error_response(StatusCode::BAD_REQUEST, MSG_MISSING_SCAN_ID);
    };

    match state.history.delete(scan_id, &identity.id).await {
        Ok(applied) => {
            if applied {
                info!("Deleted scan {scan_id}");
            }
            mutation_response(applied)
        }
        Err(e) => storage_failure("delete scan", e),
    }
}
