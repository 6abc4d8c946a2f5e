//! Server state and wire types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error_handling::ScanStats;
use crate::models::ScanRecord;
use crate::scan::Scanner;
use crate::storage::{HistoryStore, IdentityProvider};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub history: Arc<dyn HistoryStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub stats: Arc<ScanStats>,
}

/// What an edit asks for the notes of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesChange {
    /// `notes` key absent
    Keep,
    /// `"notes": null`
    Clear,
    Set(String),
    /// `notes` present but neither a string nor null
    Invalid,
}

/// Body of `PATCH /api/history/edit` and `DELETE /api/history/delete`.
///
/// Fields are read one by one from the raw JSON so a bad `notes` value does
/// not hide a valid `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMutation {
    id: Option<String>,
    pub notes: NotesChange,
}

impl HistoryMutation {
    /// Parses a request body. Anything that isn't a JSON object yields no id.
    pub fn from_json(body: &[u8]) -> Self {
        let value: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();

        let id = match value.get("id") {
            Some(serde_json::Value::String(id)) if !id.is_empty() => Some(id.clone()),
            _ => None,
        };
        let notes = match value.get("notes") {
            None => NotesChange::Keep,
            Some(serde_json::Value::Null) => NotesChange::Clear,
            Some(serde_json::Value::String(notes)) => NotesChange::Set(notes.clone()),
            Some(_) => NotesChange::Invalid,
        };

        HistoryMutation { id, notes }
    }

    /// The record id, if present as a non-empty string.
    pub fn scan_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// One entry of `GET /api/history`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    /// Serialized `ScanResult`, as stored
    pub result: String,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<ScanRecord> for HistoryEntry {
    fn from(record: ScanRecord) -> Self {
        HistoryEntry {
            id: record.id,
            url: record.url,
            result: record.result,
            created_at: record.created_at,
            notes: record.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub scans: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON response for `/status`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub uptime_seconds: f64,
    pub total_scans: usize,
    pub scans: std::collections::BTreeMap<&'static str, usize>,
    pub network_errors: std::collections::BTreeMap<&'static str, usize>,
    pub history_writes: HistoryWriteCounts,
}

#[derive(Debug, Serialize)]
pub struct HistoryWriteCounts {
    pub saved: usize,
    pub failed: usize,
    pub skipped: usize,
    /// State of the history write circuit breaker
    pub circuit: &'static str,
}
